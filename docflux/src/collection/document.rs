use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::collection::DocId;
use crate::common::{Value, DOC_ID, FIELD_SEPARATOR};
use crate::errors::{DocfluxError, DocfluxResult, ErrorKind};
use std::fmt::{Debug, Display};

type PathVec<'a> = SmallVec<[&'a str; 8]>;

/// Represents a document exchanged with the store.
///
/// A document is composed of key-value pairs. The key is always a [String]
/// and the value is a [Value]. Keys preserve their insertion order, which is
/// significant for display and projection but not for equality: two documents
/// with the same fields in different order are equal.
///
/// Nested documents are supported. The key of a nested field is a [String]
/// separated by `.`, so `document.get("a.b")` retrieves the value of `b`
/// inside the nested document `a`. Numeric segments index into arrays:
/// `document.get("arr.1")` retrieves the second element of `arr`.
///
/// The field `_id` is reserved for the store-assigned [DocId] and cannot be
/// set manually.
///
/// # Examples
///
/// ```ignore
/// let mut doc = Document::new();
/// doc.put("name", "Alice")?;
/// doc.put("address.city", "New York")?;
/// assert_eq!(doc.get("address.city")?, Value::from("New York"));
/// ```
#[derive(Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Document {
    data: IndexMap<String, Value>,
}

impl Document {
    /// Creates a new empty document.
    pub fn new() -> Self {
        Document {
            data: IndexMap::new(),
        }
    }

    /// Checks if the document is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the number of top-level fields in the document.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Associates the specified [Value] with the specified key in this
    /// document.
    ///
    /// If the key already exists, its value is updated in place and the
    /// field keeps its original position. Keys containing the field
    /// separator address embedded fields: `put("user.name", ...)` creates
    /// or updates the nested document `user`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// * The key is empty
    /// * The key is the reserved `_id` field and the value is not a [DocId]
    pub fn put<T: Into<Value>>(&mut self, key: &str, value: T) -> DocfluxResult<()> {
        if key.is_empty() {
            log::error!("Document does not support empty key");
            return Err(DocfluxError::new(
                "Document does not support empty key",
                ErrorKind::InvalidOperation,
            ));
        }

        let value = value.into();

        // validate the _id field
        if key == DOC_ID && !value.is_id() {
            log::error!("Document id is a store generated field and cannot be set manually");
            return Err(DocfluxError::new(
                "Document id is a store generated field and cannot be set manually",
                ErrorKind::InvalidOperation,
            ));
        }

        if key.contains(FIELD_SEPARATOR) {
            let splits: PathVec = key.split(FIELD_SEPARATOR).collect();
            self.deep_put(&splits, value)
        } else {
            self.data.insert(key.to_string(), value);
            Ok(())
        }
    }

    /// Returns the [Value] to which the specified key is associated, or
    /// [Value::Null] if this document contains no mapping for the key.
    ///
    /// Embedded fields are addressed with the field separator
    /// (`"location.address.zip"`); numeric segments index into arrays
    /// (`"items.0"`).
    pub fn get(&self, key: &str) -> DocfluxResult<Value> {
        if key.is_empty() {
            log::error!("Document does not support empty key");
            return Err(DocfluxError::new(
                "Document does not support empty key",
                ErrorKind::InvalidOperation,
            ));
        }
        Ok(self.lookup(key).unwrap_or(Value::Null))
    }

    /// Checks whether the document contains a mapping for the key, embedded
    /// paths included. A field explicitly set to [Value::Null] is present.
    pub fn has_field(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    /// Removes the mapping for the key from this document, if present.
    /// Embedded fields are addressed with the field separator.
    pub fn remove(&mut self, key: &str) -> DocfluxResult<()> {
        if key.is_empty() {
            log::error!("Document does not support empty key");
            return Err(DocfluxError::new(
                "Document does not support empty key",
                ErrorKind::InvalidOperation,
            ));
        }
        if let Some((prefix, leaf)) = key.rsplit_once(FIELD_SEPARATOR) {
            if let Some(Value::Document(mut nested)) = self.lookup(prefix) {
                nested.data.shift_remove(leaf);
                return self.put_raw(prefix, Value::Document(nested));
            }
            Ok(())
        } else {
            self.data.shift_remove(key);
            Ok(())
        }
    }

    /// Returns the top-level field names in insertion order.
    pub fn fields(&self) -> Vec<String> {
        self.data.keys().cloned().collect()
    }

    /// Returns an iterator over the top-level (field, value) pairs in
    /// insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.data.iter()
    }

    /// Returns the store-assigned id of this document, if it has one.
    pub fn id(&self) -> Option<DocId> {
        match self.data.get(DOC_ID) {
            Some(Value::Id(id)) => Some(*id),
            _ => None,
        }
    }

    /// Stamps the store-assigned id. Only the store may do this.
    pub(crate) fn put_id(&mut self, id: DocId) {
        self.data.insert(DOC_ID.to_string(), Value::Id(id));
    }

    /// Inserts bypassing reserved-field validation; used internally where the
    /// path has already been validated.
    pub(crate) fn put_raw(&mut self, key: &str, value: Value) -> DocfluxResult<()> {
        if key.contains(FIELD_SEPARATOR) {
            let splits: PathVec = key.split(FIELD_SEPARATOR).collect();
            self.deep_put(&splits, value)
        } else {
            self.data.insert(key.to_string(), value);
            Ok(())
        }
    }

    fn deep_put(&mut self, path: &[&str], value: Value) -> DocfluxResult<()> {
        let (first, rest) = match path.split_first() {
            Some(split) => split,
            None => return Ok(()),
        };
        if first.is_empty() {
            log::error!("Document does not support empty path segment");
            return Err(DocfluxError::new(
                "Document does not support empty path segment",
                ErrorKind::InvalidOperation,
            ));
        }
        if rest.is_empty() {
            self.data.insert(first.to_string(), value);
            return Ok(());
        }

        let mut nested = match self.data.get(*first) {
            Some(Value::Document(doc)) => doc.clone(),
            _ => Document::new(),
        };
        nested.deep_put(rest, value)?;
        self.data.insert(first.to_string(), Value::Document(nested));
        Ok(())
    }

    fn lookup(&self, key: &str) -> Option<Value> {
        if !key.contains(FIELD_SEPARATOR) {
            return self.data.get(key).cloned();
        }
        let splits: PathVec = key.split(FIELD_SEPARATOR).collect();
        deep_lookup(&Value::Document(self.clone()), &splits)
    }
}

fn deep_lookup(value: &Value, path: &[&str]) -> Option<Value> {
    let (first, rest) = path.split_first()?;
    let next = match value {
        Value::Document(doc) => doc.data.get(*first).cloned()?,
        Value::Array(array) => {
            let index: usize = first.parse().ok()?;
            array.get(index).cloned()?
        }
        _ => return None,
    };
    if rest.is_empty() {
        Some(next)
    } else {
        deep_lookup(&next, rest)
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", key, value)?;
        }
        write!(f, "}}")
    }
}

impl Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

/// Strips the quotes `stringify!` adds around string-literal keys in the
/// `doc!` macro.
pub fn normalize(key: &str) -> String {
    key.trim_matches('"').to_string()
}

/// Creates a [Document] from a list of key-value pairs.
///
/// Keys can be bare identifiers or string literals; values can be literals,
/// expressions in parentheses, nested `{ ... }` documents, or `[ ... ]`
/// arrays.
///
/// # Examples
///
/// ```rust
/// use docflux::doc;
///
/// // Empty document
/// let empty = doc!{};
///
/// // Simple key-value pairs
/// let simple = doc!{
///     name: "Alice",
///     age: 30
/// };
///
/// // Nested documents and arrays
/// let complex = doc!{
///     user: {
///         name: "Charlie",
///         tags: ["admin", "user"]
///     },
///     values: [1, 2, 3]
/// };
/// ```
#[macro_export]
macro_rules! doc {
    // match an empty document
    () => {
        $crate::collection::Document::new()
    };

    // match a document with key value pairs
    ($($key:tt : $value:tt),* $(,)?) => {
        {
            #[allow(unused_imports)]
            use $crate::doc_value;

            let mut doc = $crate::collection::Document::new();
            $(
                doc.put(&$crate::collection::normalize(stringify!($key)), $crate::doc_value!($value))
                .expect(&format!("Failed to put value {} in document", stringify!($value)));
            )*
            doc
        }
    };
}

/// Helper macro to convert values for the doc! macro.
/// Handles nested documents, arrays, and expressions.
#[macro_export]
macro_rules! doc_value {
    // match a nested document
    ({ $($key:tt : $value:tt),* $(,)? }) => {
        {
            $crate::common::Value::Document($crate::doc!{ $($key : $value),* })
        }
    };

    // match an array of values
    ([ $($value:tt),* $(,)? ]) => {
        $crate::common::Value::Array(vec![$($crate::doc_value!($value)),*])
    };

    // match an expression (variable, function call, arithmetic in parens, literals, etc.)
    ($value:expr) => {
        $crate::common::Value::from($value)
    };
}
