use crate::collection::DocId;
use crate::collection::Document;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::fmt::{Debug, Display, Formatter};

/// Compare two signed integers.
#[inline]
fn num_cmp_int(a: i64, b: i64) -> Ordering {
    a.cmp(&b)
}

/// Compare two floats with proper NaN and total ordering.
#[inline]
fn num_cmp_float(a: f64, b: f64) -> Ordering {
    // Handle NaN: treat NaN as greater than all other values
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Represents a [Document] value. It can be a simple value like [Value::I32],
/// [Value::String] or a complex value like [Value::Document] or [Value::Array].
///
/// # Purpose
/// Provides a unified representation for all value types that can travel
/// through a subscription: primitives, strings, timestamps, nested documents,
/// arrays, binary blobs, and store-assigned document ids.
///
/// # Characteristics
/// - **Comparable**: Implements a total `Ord` used by comparison filters and
///   sorting. Numeric variants compare numerically across widths; `NaN` sorts
///   greater than every other number; values of different kinds order by a
///   fixed type rank.
/// - **Serializable**: Can be serialized/deserialized with serde (behind the
///   `serde` feature).
/// - **Default**: Defaults to Null.
///
/// # Usage
/// Create values using the From trait or the `doc!` macro:
/// ```text
/// let v1: Value = 42.into();           // From i32
/// let v2 = Value::from("hello");       // From &str
/// let doc = doc! { age: 42, name: "Alice" };
/// ```
#[derive(Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Value {
    /// Represents a null value.
    #[default]
    Null,
    /// Represents a boolean value.
    Bool(bool),
    /// Represents a signed 32-bit integer value.
    I32(i32),
    /// Represents a signed 64-bit integer value.
    I64(i64),
    /// Represents a 64-bit floating point value.
    F64(f64),
    /// Represents a string value.
    String(String),
    /// Represents a UTC timestamp value.
    DateTime(DateTime<Utc>),
    /// Represents a store-assigned document id.
    Id(DocId),
    /// Represents an array value.
    Array(Vec<Value>),
    /// Represents a nested document value.
    Document(Document),
    /// Represents a byte array value.
    /// It is used for binary data and cannot be used as a comparison operand.
    Bytes(Vec<u8>),
}

impl Value {
    /// Checks if the value is [Value::Null].
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Checks if the value is a string.
    #[inline]
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Checks if the value is numeric (integer or float).
    #[inline]
    pub fn is_number(&self) -> bool {
        matches!(self, Value::I32(_) | Value::I64(_) | Value::F64(_))
    }

    /// Checks if the value is a document id.
    #[inline]
    pub fn is_id(&self) -> bool {
        matches!(self, Value::Id(_))
    }

    /// Checks if the value can be used as a comparison-filter operand.
    ///
    /// Arrays, nested documents and binary blobs have no meaningful natural
    /// ordering for range queries; filters built over them are rejected by
    /// the store.
    #[inline]
    pub fn is_comparable(&self) -> bool {
        !matches!(
            self,
            Value::Array(_) | Value::Document(_) | Value::Bytes(_)
        )
    }

    /// Returns the boolean value, if this is a [Value::Bool].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the value as `i32`, if this is a [Value::I32].
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::I32(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as `i64`, widening [Value::I32] if necessary.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I32(i) => Some(*i as i64),
            Value::I64(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as `f64`, widening integer variants if necessary.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::I32(i) => Some(*i as f64),
            Value::I64(i) => Some(*i as f64),
            Value::F64(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the string value, if this is a [Value::String].
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the timestamp value, if this is a [Value::DateTime].
    pub fn as_date_time(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Returns the document id, if this is a [Value::Id].
    pub fn as_id(&self) -> Option<DocId> {
        match self {
            Value::Id(id) => Some(*id),
            _ => None,
        }
    }

    /// Returns the array value, if this is a [Value::Array].
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(array) => Some(array),
            _ => None,
        }
    }

    /// Returns the nested document, if this is a [Value::Document].
    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Value::Document(doc) => Some(doc),
            _ => None,
        }
    }

    /// Returns the byte array, if this is a [Value::Bytes].
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Checks whether two values belong to the same ordering domain.
    ///
    /// Range comparisons across ordering domains (e.g. a string against a
    /// number) never match, as opposed to following the type rank.
    pub(crate) fn comparable_with(&self, other: &Value) -> bool {
        (self.is_number() && other.is_number()) || self.type_rank() == other.type_rank()
    }

    /// Rank used to order values of different kinds.
    fn type_rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::I32(_) | Value::I64(_) | Value::F64(_) => 2,
            Value::String(_) => 3,
            Value::DateTime(_) => 4,
            Value::Id(_) => 5,
            Value::Array(_) => 6,
            Value::Document(_) => 7,
            Value::Bytes(_) => 8,
        }
    }

    /// Numeric comparison across integer and float variants.
    fn numeric_cmp(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::F64(_), _) | (_, Value::F64(_)) => {
                Some(num_cmp_float(self.as_f64()?, other.as_f64()?))
            }
            _ => Some(num_cmp_int(self.as_i64()?, other.as_i64()?)),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.is_number() && other.is_number() {
            return self.numeric_cmp(other).unwrap_or(Ordering::Equal);
        }
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::DateTime(a), Value::DateTime(b)) => a.cmp(b),
            (Value::Id(a), Value::Id(b)) => a.cmp(b),
            (Value::Array(a), Value::Array(b)) => a.cmp(b),
            (Value::Document(a), Value::Document(b)) => {
                // documents have no natural ordering; fall back to field-wise
                // comparison of the sorted field sets
                let mut a_fields: Vec<_> = a.entries().collect();
                let mut b_fields: Vec<_> = b.entries().collect();
                a_fields.sort_by(|x, y| x.0.cmp(y.0));
                b_fields.sort_by(|x, y| x.0.cmp(y.0));
                a_fields.cmp(&b_fields)
            }
            (Value::Bytes(a), Value::Bytes(b)) => a.cmp(b),
            _ => self.type_rank().cmp(&other.type_rank()),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::I32(i) => write!(f, "{}", i),
            Value::I64(i) => write!(f, "{}", i),
            Value::F64(v) => write!(f, "{}", v),
            Value::String(s) => write!(f, "{}", s),
            Value::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            Value::Id(id) => write!(f, "{}", id),
            Value::Array(array) => {
                write!(f, "[")?;
                for (i, value) in array.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                write!(f, "]")
            }
            Value::Document(doc) => write!(f, "{}", doc),
            Value::Bytes(bytes) => write!(f, "<{} bytes>", bytes.len()),
        }
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::I32(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::I64(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::I64(value as i64)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::F64(value as f64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::F64(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::DateTime(value)
    }
}

impl From<DocId> for Value {
    fn from(value: DocId) -> Self {
        Value::Id(value)
    }
}

impl From<Document> for Value {
    fn from(value: Document) -> Self {
        Value::Document(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cross_width_integer_equality() {
        assert_eq!(Value::I32(42), Value::I64(42));
        assert_ne!(Value::I32(42), Value::I64(43));
    }

    #[test]
    fn test_int_float_comparison() {
        assert_eq!(Value::I32(1), Value::F64(1.0));
        assert!(Value::F64(1.5) > Value::I32(1));
        assert!(Value::I64(2) > Value::F64(1.5));
    }

    #[test]
    fn test_nan_ordering() {
        assert_eq!(Value::F64(f64::NAN), Value::F64(f64::NAN));
        assert!(Value::F64(f64::NAN) > Value::F64(f64::MAX));
        assert!(Value::F64(1.0) < Value::F64(f64::NAN));
    }

    #[test]
    fn test_type_rank_ordering() {
        assert!(Value::Null < Value::Bool(false));
        assert!(Value::Bool(true) < Value::I32(0));
        assert!(Value::I64(i64::MAX) < Value::String("".to_string()));
    }

    #[test]
    fn test_string_ordering() {
        assert!(Value::from("apple") < Value::from("banana"));
        assert_eq!(Value::from("same"), Value::from("same"));
    }

    #[test]
    fn test_is_comparable() {
        assert!(Value::I32(1).is_comparable());
        assert!(Value::from("s").is_comparable());
        assert!(Value::Null.is_comparable());
        assert!(!Value::Array(vec![]).is_comparable());
        assert!(!Value::Bytes(vec![1, 2]).is_comparable());
        assert!(!Value::Document(Document::new()).is_comparable());
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::I32(7).as_i64(), Some(7));
        assert_eq!(Value::I64(7).as_i32(), None);
        assert_eq!(Value::I32(7).as_f64(), Some(7.0));
        assert_eq!(Value::from("x").as_string(), Some("x"));
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert!(Value::Null.as_array().is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Value::Null), "null");
        assert_eq!(format!("{}", Value::I32(5)), "5");
        assert_eq!(
            format!("{}", Value::Array(vec![Value::I32(1), Value::I32(2)])),
            "[1, 2]"
        );
        assert_eq!(format!("{}", Value::Bytes(vec![0, 1, 2])), "<3 bytes>");
    }

    #[test]
    fn test_default_is_null() {
        assert!(Value::default().is_null());
    }
}
