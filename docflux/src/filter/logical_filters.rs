use std::{any::Any, fmt::Display};

use itertools::Itertools;

use crate::{collection::Document, errors::DocfluxResult};

use super::{Filter, FilterProvider};

/// A filter that applies logical AND operation on multiple filters.
///
/// This filter matches documents that satisfy all of the provided filters
/// simultaneously. It uses short-circuit evaluation, returning false
/// immediately when any filter fails. The filters are evaluated in the order
/// they were provided.
pub(crate) struct AndFilter {
    filters: Vec<Filter>,
}

impl AndFilter {
    /// Creates a new AND filter combining multiple filters.
    pub(crate) fn new(filters: Vec<Filter>) -> Self {
        AndFilter { filters }
    }
}

impl Display for AndFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let filters = self.filters.iter().map(|filter| filter.to_string()).join(" && ");
        write!(f, "({})", filters)
    }
}

impl FilterProvider for AndFilter {
    #[inline]
    fn apply(&self, entry: &Document) -> DocfluxResult<bool> {
        for filter in &self.filters {
            if !filter.apply(entry)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn validate(&self) -> DocfluxResult<()> {
        for filter in &self.filters {
            filter.validate()?;
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A filter that applies logical OR operation on multiple filters.
///
/// This filter matches documents that satisfy at least one of the provided
/// filters. It uses short-circuit evaluation, returning true immediately when
/// any filter succeeds. The filters are evaluated in the order they were
/// provided.
pub(crate) struct OrFilter {
    filters: Vec<Filter>,
}

impl OrFilter {
    /// Creates a new OR filter combining multiple filters.
    pub(crate) fn new(filters: Vec<Filter>) -> Self {
        OrFilter { filters }
    }
}

impl Display for OrFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let filters = self.filters.iter().map(|filter| filter.to_string()).join(" || ");
        write!(f, "({})", filters)
    }
}

impl FilterProvider for OrFilter {
    #[inline]
    fn apply(&self, entry: &Document) -> DocfluxResult<bool> {
        for filter in &self.filters {
            if filter.apply(entry)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn validate(&self) -> DocfluxResult<()> {
        for filter in &self.filters {
            filter.validate()?;
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A filter that applies logical NOT operation on a filter.
///
/// This filter inverts the result of another filter, matching documents that
/// do not satisfy the provided filter.
pub(crate) struct NotFilter {
    filter: Filter,
}

impl NotFilter {
    /// Creates a new NOT filter negating the provided filter.
    pub(crate) fn new(filter: Filter) -> Self {
        NotFilter { filter }
    }
}

impl Display for NotFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "!({})", self.filter)
    }
}

impl FilterProvider for NotFilter {
    #[inline]
    fn apply(&self, entry: &Document) -> DocfluxResult<bool> {
        Ok(!self.filter.apply(entry)?)
    }

    fn validate(&self) -> DocfluxResult<()> {
        self.filter.validate()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Creates a filter that matches documents satisfying all of the provided
/// filters.
pub fn and(filters: Vec<Filter>) -> Filter {
    Filter::new(AndFilter::new(filters))
}

/// Creates a filter that matches documents satisfying at least one of the
/// provided filters.
pub fn or(filters: Vec<Filter>) -> Filter {
    Filter::new(OrFilter::new(filters))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;
    use crate::filter::field;
    use crate::Value;

    #[test]
    fn test_and_all_must_match() {
        let filter = and(vec![field("i").gt(50), field("i").lte(53)]);
        assert!(filter.apply(&doc! { i: 51 }).unwrap());
        assert!(filter.apply(&doc! { i: 53 }).unwrap());
        assert!(!filter.apply(&doc! { i: 50 }).unwrap());
        assert!(!filter.apply(&doc! { i: 54 }).unwrap());
    }

    #[test]
    fn test_or_any_may_match() {
        let filter = or(vec![field("i").lt(10), field("i").gt(90)]);
        assert!(filter.apply(&doc! { i: 5 }).unwrap());
        assert!(filter.apply(&doc! { i: 95 }).unwrap());
        assert!(!filter.apply(&doc! { i: 50 }).unwrap());
    }

    #[test]
    fn test_nested_combination() {
        let filter = and(vec![
            or(vec![field("a").eq(1), field("b").eq(2)]),
            field("c").eq(3),
        ]);
        assert!(filter.apply(&doc! { a: 1, c: 3 }).unwrap());
        assert!(filter.apply(&doc! { b: 2, c: 3 }).unwrap());
        assert!(!filter.apply(&doc! { a: 1, c: 4 }).unwrap());
    }

    #[test]
    fn test_not_inverts() {
        let filter = field("i").gt(50).not();
        assert!(filter.apply(&doc! { i: 50 }).unwrap());
        assert!(!filter.apply(&doc! { i: 51 }).unwrap());
    }

    #[test]
    fn test_validation_recurses() {
        let bad = field("i").gt(Value::Array(vec![]));
        assert!(and(vec![field("a").eq(1), bad.clone()]).validate().is_err());
        assert!(or(vec![field("a").eq(1), bad.clone()]).validate().is_err());
        assert!(bad.not().validate().is_err());
        assert!(and(vec![field("a").eq(1)]).validate().is_ok());
    }

    #[test]
    fn test_display() {
        let filter = and(vec![field("i").gt(50), field("i").lte(53)]);
        assert_eq!(format!("{}", filter), "((i > 50) && (i <= 53))");
        let filter = or(vec![field("a").eq(1), field("b").eq(2)]);
        assert_eq!(format!("{}", filter), "((a == 1) || (b == 2))");
        assert_eq!(format!("{}", field("a").eq(1).not()), "!((a == 1))");
    }
}
