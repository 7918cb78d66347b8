use crate::{
    collection::Document,
    common::{SortOrder, SortableFields},
    errors::{DocfluxError, DocfluxResult},
};
use icu_collator::options::CollatorOptions;
use icu_collator::{Collator, CollatorBorrowed, CollatorPreferences};

/// A stream adapter that yields documents in multi-key sorted order.
///
/// Sorting is necessarily eager: the underlying stream is drained into
/// memory, sorted stably, and replayed. Earlier sort keys take precedence;
/// null and missing values sort first; string keys use the collator when one
/// is available and fall back to lexicographic comparison otherwise. An
/// error in the underlying stream fails the whole sorted stream fast.
pub(crate) struct SortedStream {
    sorted: Vec<Document>,
    error: Option<DocfluxError>,
    current_index: usize,
}

impl SortedStream {
    pub(crate) fn new<I: Iterator<Item = DocfluxResult<Document>>>(
        raw_stream: I,
        sort: &SortableFields,
        collator: Option<CollatorBorrowed<'static>>,
    ) -> Self {
        let mut cleaned = Vec::new();
        let mut error = None;

        for doc in raw_stream {
            match doc {
                Ok(doc) => cleaned.push(doc),
                Err(e) => {
                    error = Some(e);
                    break;
                }
            }
        }

        cleaned.sort_by(|a, b| {
            for (field, order) in sort.sorted_fields() {
                let a_value = a.get(field).unwrap_or_default();
                let b_value = b.get(field).unwrap_or_default();

                let cmp = if a_value.is_null() || b_value.is_null() {
                    // nulls (and missing fields) sort first
                    a_value.is_null().cmp(&b_value.is_null()).reverse()
                } else if a_value.is_string() && b_value.is_string() {
                    let a_str = a_value.as_string().unwrap_or_default();
                    let b_str = b_value.as_string().unwrap_or_default();
                    match collator.as_ref() {
                        Some(collator) => collator.compare(a_str, b_str),
                        None => a_str.cmp(b_str),
                    }
                } else {
                    a_value.cmp(&b_value)
                };

                if cmp != std::cmp::Ordering::Equal {
                    return match order {
                        SortOrder::Ascending => cmp,
                        SortOrder::Descending => cmp.reverse(),
                    };
                }
            }
            std::cmp::Ordering::Equal
        });

        Self {
            sorted: cleaned,
            error,
            current_index: 0,
        }
    }
}

impl Iterator for SortedStream {
    type Item = DocfluxResult<Document>;

    fn next(&mut self) -> Option<Self::Item> {
        // fail fast if the underlying stream errored
        if let Some(error) = self.error.clone() {
            return Some(Err(error));
        }

        if self.current_index < self.sorted.len() {
            let result = self.sorted[self.current_index].clone();
            self.current_index += 1;
            Some(Ok(result))
        } else {
            None
        }
    }
}

/// Builds the default collator used for string sort keys.
///
/// Returns `None` when collation data is unavailable; callers fall back to
/// lexicographic comparison.
pub(crate) fn default_collator() -> Option<CollatorBorrowed<'static>> {
    match Collator::try_new(CollatorPreferences::default(), CollatorOptions::default()) {
        Ok(collator) => Some(collator),
        Err(e) => {
            log::warn!(
                "Failed to build collator, falling back to lexicographic string order: {}",
                e
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::descending;
    use crate::doc;
    use crate::errors::ErrorKind;
    use crate::Value;

    fn values(stream: SortedStream, field: &str) -> Vec<Value> {
        stream
            .map(|doc| doc.unwrap().get(field).unwrap())
            .collect()
    }

    #[test]
    fn test_single_key_descending() {
        let docs = vec![Ok(doc! { i: 1 }), Ok(doc! { i: 3 }), Ok(doc! { i: 2 })];
        let stream = SortedStream::new(docs.into_iter(), &descending("i"), None);
        assert_eq!(
            values(stream, "i"),
            vec![Value::I32(3), Value::I32(2), Value::I32(1)]
        );
    }

    #[test]
    fn test_multi_key_precedence() {
        let docs = vec![
            Ok(doc! { a: 1, b: 2 }),
            Ok(doc! { a: 1, b: 1 }),
            Ok(doc! { a: 0, b: 9 }),
        ];
        let sort = SortableFields::new()
            .add_sorted_field("a", SortOrder::Ascending)
            .add_sorted_field("b", SortOrder::Ascending);
        let stream = SortedStream::new(docs.into_iter(), &sort, None);
        let pairs: Vec<_> = stream
            .map(|doc| {
                let doc = doc.unwrap();
                (doc.get("a").unwrap(), doc.get("b").unwrap())
            })
            .collect();
        assert_eq!(
            pairs,
            vec![
                (Value::I32(0), Value::I32(9)),
                (Value::I32(1), Value::I32(1)),
                (Value::I32(1), Value::I32(2)),
            ]
        );
    }

    #[test]
    fn test_stable_on_ties() {
        let docs = vec![
            Ok(doc! { key: 1, tag: "first" }),
            Ok(doc! { key: 1, tag: "second" }),
            Ok(doc! { key: 1, tag: "third" }),
        ];
        let sort = SortableFields::new().add_sorted_field("key", SortOrder::Ascending);
        let stream = SortedStream::new(docs.into_iter(), &sort, None);
        assert_eq!(
            values(stream, "tag"),
            vec![
                Value::from("first"),
                Value::from("second"),
                Value::from("third")
            ]
        );
    }

    #[test]
    fn test_nulls_sort_first() {
        let docs = vec![Ok(doc! { i: 5 }), Ok(doc! { other: 1 }), Ok(doc! { i: 3 })];
        let sort = SortableFields::new().add_sorted_field("i", SortOrder::Ascending);
        let stream = SortedStream::new(docs.into_iter(), &sort, None);
        let collected = values(stream, "i");
        assert_eq!(collected[0], Value::Null);
        assert_eq!(collected[1], Value::I32(3));
        assert_eq!(collected[2], Value::I32(5));
    }

    #[test]
    fn test_string_sort_with_collator() {
        let docs = vec![
            Ok(doc! { name: "banana" }),
            Ok(doc! { name: "apple" }),
            Ok(doc! { name: "cherry" }),
        ];
        let sort = SortableFields::new().add_sorted_field("name", SortOrder::Ascending);
        let stream = SortedStream::new(docs.into_iter(), &sort, default_collator());
        assert_eq!(
            values(stream, "name"),
            vec![
                Value::from("apple"),
                Value::from("banana"),
                Value::from("cherry")
            ]
        );
    }

    #[test]
    fn test_error_fails_fast() {
        let docs = vec![
            Ok(doc! { i: 1 }),
            Err(DocfluxError::new("scan failed", ErrorKind::InternalError)),
        ];
        let mut stream = SortedStream::new(docs.into_iter(), &descending("i"), None);
        assert!(stream.next().unwrap().is_err());
    }
}
