use itertools::Itertools;
use smallvec::SmallVec;
use std::fmt::Display;

use crate::collection::Document;
use crate::errors::{DocfluxError, DocfluxResult, ErrorKind};
use crate::Value;

#[derive(Debug, Clone)]
enum UpdateOp {
    Set(String, Value),
    Inc(String, Value),
    Unset(String),
}

impl Display for UpdateOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpdateOp::Set(field, value) => write!(f, "set {} = {}", field, value),
            UpdateOp::Inc(field, amount) => write!(f, "inc {} by {}", field, amount),
            UpdateOp::Unset(field) => write!(f, "unset {}", field),
        }
    }
}

/// Describes how matched documents are modified by an update operation.
///
/// An `UpdateSpec` is an ordered list of field operations, applied in the
/// order they were added:
/// - `set(field, value)` - assigns the value to the field
/// - `inc(field, amount)` - increments a numeric field (a missing field is
///   created with the amount)
/// - `unset(field)` - removes the field
///
/// A spec with no operations is rejected by the store.
///
/// # Examples
///
/// ```rust,ignore
/// use docflux::collection::UpdateSpec;
///
/// let publisher = collection.update_one(
///     field("i").eq(10),
///     UpdateSpec::new().set("i", 110),
/// );
///
/// let publisher = collection.update_many(
///     field("i").lt(100),
///     UpdateSpec::new().inc("i", 110),
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct UpdateSpec {
    ops: SmallVec<[UpdateOp; 4]>,
}

impl UpdateSpec {
    /// Creates an empty update specification.
    pub fn new() -> Self {
        UpdateSpec {
            ops: SmallVec::new(),
        }
    }

    /// Appends a field assignment.
    pub fn set<T: Into<Value>>(mut self, field: &str, value: T) -> Self {
        self.ops.push(UpdateOp::Set(field.to_string(), value.into()));
        self
    }

    /// Appends a numeric increment. A missing field is created with the
    /// amount; incrementing a non-numeric field fails the operation.
    pub fn inc<T: Into<Value>>(mut self, field: &str, amount: T) -> Self {
        self.ops.push(UpdateOp::Inc(field.to_string(), amount.into()));
        self
    }

    /// Appends a field removal.
    pub fn unset(mut self, field: &str) -> Self {
        self.ops.push(UpdateOp::Unset(field.to_string()));
        self
    }

    /// Returns true if no operations have been added.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Applies the operations to a document in order.
    ///
    /// Returns whether the document was actually modified.
    pub(crate) fn apply(&self, document: &mut Document) -> DocfluxResult<bool> {
        if self.ops.is_empty() {
            log::error!("Update specification has no operations");
            return Err(DocfluxError::new(
                "Update specification has no operations",
                ErrorKind::OperationFailure,
            ));
        }

        let mut changed = false;
        for op in &self.ops {
            match op {
                UpdateOp::Set(field, value) => {
                    if document.get(field)? != *value {
                        document.put(field, value.clone())?;
                        changed = true;
                    }
                }
                UpdateOp::Inc(field, amount) => {
                    let current = document.get(field)?;
                    let incremented = increment(field, &current, amount)?;
                    document.put(field, incremented)?;
                    changed = true;
                }
                UpdateOp::Unset(field) => {
                    if document.has_field(field) {
                        document.remove(field)?;
                        changed = true;
                    }
                }
            }
        }
        Ok(changed)
    }
}

fn increment(field: &str, current: &Value, amount: &Value) -> DocfluxResult<Value> {
    if !amount.is_number() {
        log::error!("Increment amount for field {} is not numeric", field);
        return Err(DocfluxError::new(
            &format!("Increment amount for field {} is not numeric", field),
            ErrorKind::OperationFailure,
        ));
    }
    match current {
        // a missing field starts from the increment amount
        Value::Null => Ok(amount.clone()),
        Value::I32(_) | Value::I64(_) => match amount {
            Value::F64(f) => Ok(Value::F64(current.as_f64().unwrap_or(0.0) + f)),
            _ => Ok(Value::I64(
                current.as_i64().unwrap_or(0) + amount.as_i64().unwrap_or(0),
            )),
        },
        Value::F64(f) => Ok(Value::F64(f + amount.as_f64().unwrap_or(0.0))),
        _ => {
            log::error!("Cannot increment non numeric field {}", field);
            Err(DocfluxError::new(
                &format!("Cannot increment non numeric field {}", field),
                ErrorKind::OperationFailure,
            ))
        }
    }
}

impl Display for UpdateSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}}}", self.ops.iter().join(", "))
    }
}
