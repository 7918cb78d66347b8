use crate::common::SortOrder;
use itertools::Itertools;
use smallvec::SmallVec;
use std::fmt::Display;

type SortedFieldVec = SmallVec<[(String, SortOrder); 4]>;

/// An ordered, direction-aware multi-key sort specification.
///
/// Earlier entries take precedence; later entries only break ties left by the
/// ones before them. Sorting with a `SortableFields` is stable: documents that
/// compare equal on every key keep their store-native relative order.
///
/// # Examples
///
/// ```rust,ignore
/// use docflux::common::{SortableFields, SortOrder};
///
/// let sort = SortableFields::new()
///     .add_sorted_field("last_name", SortOrder::Ascending)
///     .add_sorted_field("age", SortOrder::Descending);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortableFields {
    fields: SortedFieldVec,
}

impl SortableFields {
    /// Creates an empty sort specification.
    pub fn new() -> Self {
        SortableFields {
            fields: SortedFieldVec::new(),
        }
    }

    /// Appends a field to the specification. The field sorts after (i.e. with
    /// lower precedence than) every field added before it.
    pub fn add_sorted_field(mut self, field_name: impl Into<String>, order: SortOrder) -> Self {
        self.fields.push((field_name.into(), order));
        self
    }

    /// Returns the (field, order) pairs in precedence order.
    pub fn sorted_fields(&self) -> &[(String, SortOrder)] {
        &self.fields
    }

    /// Returns true if no sort keys have been added.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Display for SortableFields {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rendered = self
            .fields
            .iter()
            .map(|(name, order)| match order {
                SortOrder::Ascending => format!("{}:asc", name),
                SortOrder::Descending => format!("{}:desc", name),
            })
            .join(", ");
        write!(f, "[{}]", rendered)
    }
}

/// Creates a single-key ascending sort specification.
pub fn ascending(field_name: &str) -> SortableFields {
    SortableFields::new().add_sorted_field(field_name, SortOrder::Ascending)
}

/// Creates a single-key descending sort specification.
pub fn descending(field_name: &str) -> SortableFields {
    SortableFields::new().add_sorted_field(field_name, SortOrder::Descending)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_fields() {
        let fields = SortableFields::new();
        assert!(fields.is_empty());
        assert_eq!(format!("{}", fields), "[]");
    }

    #[test]
    fn test_precedence_order_is_insertion_order() {
        let fields = SortableFields::new()
            .add_sorted_field("a", SortOrder::Ascending)
            .add_sorted_field("b", SortOrder::Descending);
        let sorted = fields.sorted_fields();
        assert_eq!(sorted.len(), 2);
        assert_eq!(sorted[0], ("a".to_string(), SortOrder::Ascending));
        assert_eq!(sorted[1], ("b".to_string(), SortOrder::Descending));
    }

    #[test]
    fn test_display() {
        let fields = SortableFields::new()
            .add_sorted_field("age", SortOrder::Descending)
            .add_sorted_field("name", SortOrder::Ascending);
        assert_eq!(format!("{}", fields), "[age:desc, name:asc]");
    }

    #[test]
    fn test_helpers() {
        assert_eq!(
            descending("i").sorted_fields(),
            &[("i".to_string(), SortOrder::Descending)]
        );
        assert_eq!(
            ascending("i").sorted_fields(),
            &[("i".to_string(), SortOrder::Ascending)]
        );
    }
}
