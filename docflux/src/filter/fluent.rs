use crate::Value;

use super::{
    ComparisonFilter, ComparisonMode, EqualsFilter, ExistsFilter, Filter, RegexFilter,
};

/// Creates a fluent filter builder for the specified field name.
///
/// This function initializes a filter builder that allows chaining of
/// comparison and filter operations on a specific field.
///
/// # Arguments
///
/// * `field_name` - The name of the field to filter on
///
/// # Returns
///
/// A `FluentFilter` builder for constructing field-specific filters
pub fn field(field_name: &str) -> FluentFilter {
    FluentFilter {
        field_name: field_name.to_string(),
    }
}

/// A fluent builder for constructing filters on a specific field.
///
/// `FluentFilter` provides chainable methods for creating filters with
/// equality, comparison, existence, and pattern-matching conditions. Each
/// method returns a [`Filter`] that can be passed to a collection's find,
/// update or delete operations, or combined with other filters via
/// `and`/`or`/`not`.
///
/// # Examples
///
/// ```rust,ignore
/// use docflux::filter::field;
///
/// let adults = field("age").gte(18);
/// let named = field("name").regex("^A");
/// let combined = adults.and(named);
/// ```
pub struct FluentFilter {
    field_name: String,
}

impl FluentFilter {
    /// Creates a filter that matches documents where the field equals the
    /// specified value.
    #[inline]
    pub fn eq<T: Into<Value>>(self, value: T) -> Filter {
        Filter::new(EqualsFilter::new(self.field_name, value.into()))
    }

    /// Creates a filter that matches documents where the field is greater
    /// than the specified value.
    #[inline]
    pub fn gt<T: Into<Value>>(self, value: T) -> Filter {
        Filter::new(ComparisonFilter::new(
            self.field_name,
            value.into(),
            ComparisonMode::Greater,
        ))
    }

    /// Creates a filter that matches documents where the field is greater
    /// than or equal to the specified value.
    #[inline]
    pub fn gte<T: Into<Value>>(self, value: T) -> Filter {
        Filter::new(ComparisonFilter::new(
            self.field_name,
            value.into(),
            ComparisonMode::GreaterEqual,
        ))
    }

    /// Creates a filter that matches documents where the field is less than
    /// the specified value.
    #[inline]
    pub fn lt<T: Into<Value>>(self, value: T) -> Filter {
        Filter::new(ComparisonFilter::new(
            self.field_name,
            value.into(),
            ComparisonMode::Lesser,
        ))
    }

    /// Creates a filter that matches documents where the field is less than
    /// or equal to the specified value.
    #[inline]
    pub fn lte<T: Into<Value>>(self, value: T) -> Filter {
        Filter::new(ComparisonFilter::new(
            self.field_name,
            value.into(),
            ComparisonMode::LesserEqual,
        ))
    }

    /// Creates a filter that matches documents containing this field,
    /// embedded paths included.
    #[inline]
    pub fn exists(self) -> Filter {
        Filter::new(ExistsFilter::new(self.field_name))
    }

    /// Creates a filter that matches documents where the string field
    /// matches the given regular expression.
    #[inline]
    pub fn regex(self, pattern: &str) -> Filter {
        Filter::new(RegexFilter::new(self.field_name, pattern.to_string()))
    }
}
