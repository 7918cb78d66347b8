use std::{any::Any, fmt::Display};

use crate::{collection::Document, errors::DocfluxResult, Value};

use super::{Filter, FilterProvider};

/// A filter that matches all documents.
///
/// This filter accepts every document in the collection without applying any
/// conditions. It is used as the default filter when no specific filtering is
/// needed.
pub(crate) struct AllFilter;

impl FilterProvider for AllFilter {
    fn apply(&self, _entry: &Document) -> DocfluxResult<bool> {
        Ok(true)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Display for AllFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AllFilter")
    }
}

/// A filter that matches documents where a field equals a specific value.
///
/// The field value is compared with the operand using [Value] equality, so
/// integer widths are unified (`I32(1)` equals `I64(1)`).
pub(crate) struct EqualsFilter {
    field_name: String,
    field_value: Value,
}

impl EqualsFilter {
    #[inline]
    pub(crate) fn new(field_name: String, field_value: Value) -> Self {
        EqualsFilter {
            field_name,
            field_value,
        }
    }
}

impl Display for EqualsFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} == {})", self.field_name, self.field_value)
    }
}

impl FilterProvider for EqualsFilter {
    #[inline]
    fn apply(&self, entry: &Document) -> DocfluxResult<bool> {
        let value = entry.get(&self.field_name)?;
        Ok(value == self.field_value)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A filter that matches documents which contain a mapping for a field,
/// embedded paths included. A field explicitly set to null is present.
pub(crate) struct ExistsFilter {
    field_name: String,
}

impl ExistsFilter {
    #[inline]
    pub(crate) fn new(field_name: String) -> Self {
        ExistsFilter { field_name }
    }
}

impl Display for ExistsFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} exists)", self.field_name)
    }
}

impl FilterProvider for ExistsFilter {
    #[inline]
    fn apply(&self, entry: &Document) -> DocfluxResult<bool> {
        Ok(entry.has_field(&self.field_name))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Creates a filter that matches documents containing the given field.
pub fn exists(field_name: &str) -> Filter {
    Filter::new(ExistsFilter::new(field_name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;
    use crate::filter::field;

    #[test]
    fn test_equals_filter_matches() {
        let filter = field("name").eq("Alice");
        assert!(filter.apply(&doc! { name: "Alice" }).unwrap());
        assert!(!filter.apply(&doc! { name: "Bob" }).unwrap());
        assert!(!filter.apply(&doc! { other: 1 }).unwrap());
    }

    #[test]
    fn test_equals_filter_unifies_integer_widths() {
        let filter = field("i").eq(42i64);
        assert!(filter.apply(&doc! { i: 42 }).unwrap());
    }

    #[test]
    fn test_equals_filter_on_nested_field() {
        let filter = field("info.x").eq(200);
        assert!(filter.apply(&doc! { info: { x: 200 } }).unwrap());
        assert!(!filter.apply(&doc! { info: { x: 100 } }).unwrap());
    }

    #[test]
    fn test_exists_filter() {
        let filter = exists("i");
        assert!(filter.apply(&doc! { i: 1 }).unwrap());
        assert!(!filter.apply(&doc! { j: 1 }).unwrap());
    }

    #[test]
    fn test_exists_matches_explicit_null() {
        let mut doc = doc! {};
        doc.put("i", Value::Null).unwrap();
        assert!(exists("i").apply(&doc).unwrap());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", field("a").eq(1)), "(a == 1)");
        assert_eq!(format!("{}", exists("a")), "(a exists)");
    }
}
