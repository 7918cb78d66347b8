use std::{any::Any, cmp::Ordering, fmt::Display};

use crate::{
    collection::Document,
    errors::{DocfluxError, DocfluxResult, ErrorKind},
    Value,
};

use super::FilterProvider;

/// Comparison modes for range-based field comparisons.
///
/// Created through the fluent comparison methods:
/// - `Greater` from `gt()`
/// - `GreaterEqual` from `gte()`
/// - `Lesser` from `lt()`
/// - `LesserEqual` from `lte()`
pub(crate) enum ComparisonMode {
    Greater,
    GreaterEqual,
    Lesser,
    LesserEqual,
}

impl ComparisonMode {
    fn symbol(&self) -> &'static str {
        match self {
            ComparisonMode::Greater => ">",
            ComparisonMode::GreaterEqual => ">=",
            ComparisonMode::Lesser => "<",
            ComparisonMode::LesserEqual => "<=",
        }
    }

    fn accepts(&self, ordering: Ordering) -> bool {
        match self {
            ComparisonMode::Greater => ordering == Ordering::Greater,
            ComparisonMode::GreaterEqual => ordering != Ordering::Less,
            ComparisonMode::Lesser => ordering == Ordering::Less,
            ComparisonMode::LesserEqual => ordering != Ordering::Greater,
        }
    }
}

/// A filter that matches documents where a field compares against an operand
/// with one of the range operators.
///
/// The comparison uses the operand [Value]'s natural ordering. A document
/// whose field is missing, or whose field value lives in a different ordering
/// domain than the operand, never matches. Operands without a meaningful
/// natural ordering (arrays, nested documents, binary blobs) are rejected at
/// validation time.
pub(crate) struct ComparisonFilter {
    field_name: String,
    field_value: Value,
    mode: ComparisonMode,
}

impl ComparisonFilter {
    #[inline]
    pub(crate) fn new(field_name: String, field_value: Value, mode: ComparisonMode) -> Self {
        ComparisonFilter {
            field_name,
            field_value,
            mode,
        }
    }
}

impl Display for ComparisonFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({} {} {})",
            self.field_name,
            self.mode.symbol(),
            self.field_value
        )
    }
}

impl FilterProvider for ComparisonFilter {
    #[inline]
    fn apply(&self, entry: &Document) -> DocfluxResult<bool> {
        let value = entry.get(&self.field_name)?;
        if value.is_null() || !value.comparable_with(&self.field_value) {
            return Ok(false);
        }
        Ok(self.mode.accepts(value.cmp(&self.field_value)))
    }

    fn validate(&self) -> DocfluxResult<()> {
        if !self.field_value.is_comparable() {
            log::error!(
                "Cannot filter field {} using non comparable operand",
                self.field_name
            );
            return Err(DocfluxError::new(
                &format!(
                    "Cannot filter field {} using non comparable operand",
                    self.field_name
                ),
                ErrorKind::FilterError,
            ));
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
