use std::{any::Any, fmt::Display};

use once_cell::sync::OnceCell;
use regex::Regex;

use crate::{
    collection::Document,
    errors::{DocfluxError, DocfluxResult},
    Value,
};

use super::FilterProvider;

/// A filter that matches documents where a string field matches a regular
/// expression.
///
/// The pattern is compiled lazily and validated before the store executes the
/// query; an invalid pattern rejects the whole operation. Non-string field
/// values never match.
pub(crate) struct RegexFilter {
    field_name: String,
    pattern: String,
    compiled: OnceCell<Regex>,
}

impl RegexFilter {
    #[inline]
    pub(crate) fn new(field_name: String, pattern: String) -> Self {
        RegexFilter {
            field_name,
            pattern,
            compiled: OnceCell::new(),
        }
    }

    fn regex(&self) -> DocfluxResult<&Regex> {
        self.compiled.get_or_try_init(|| {
            Regex::new(&self.pattern).map_err(|err| {
                log::error!(
                    "Invalid regex pattern {} for field {}: {}",
                    self.pattern,
                    self.field_name,
                    err
                );
                DocfluxError::from(err)
            })
        })
    }
}

impl Display for RegexFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} ~= /{}/)", self.field_name, self.pattern)
    }
}

impl FilterProvider for RegexFilter {
    fn apply(&self, entry: &Document) -> DocfluxResult<bool> {
        let value = entry.get(&self.field_name)?;
        match value {
            Value::String(s) => Ok(self.regex()?.is_match(&s)),
            _ => Ok(false),
        }
    }

    fn validate(&self) -> DocfluxResult<()> {
        self.regex().map(|_| ())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
