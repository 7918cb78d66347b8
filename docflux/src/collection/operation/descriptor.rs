use std::fmt::Display;

use crate::collection::{Document, ProjectionSpec, UpdateOptions, UpdateSpec};
use crate::common::SortableFields;
use crate::filter::Filter;

/// How many items a find operation may deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindLimit {
    /// Deliver at most the first matching document, then complete.
    FirstOnly,
    /// Deliver every matching document.
    Unbounded,
}

/// The query shape of a find operation.
#[derive(Clone)]
pub struct FindDescriptor {
    pub(crate) filter: Option<Filter>,
    pub(crate) sort: Option<SortableFields>,
    pub(crate) projection: Option<ProjectionSpec>,
    pub(crate) limit: FindLimit,
}

impl FindDescriptor {
    pub(crate) fn new(filter: Option<Filter>) -> Self {
        FindDescriptor {
            filter,
            sort: None,
            projection: None,
            limit: FindLimit::Unbounded,
        }
    }
}

impl Display for FindDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "find")?;
        if let Some(filter) = &self.filter {
            write!(f, " where {}", filter)?;
        }
        if let Some(sort) = &self.sort {
            write!(f, " sort {}", sort)?;
        }
        if let Some(projection) = &self.projection {
            write!(f, " project {}", projection)?;
        }
        if self.limit == FindLimit::FirstOnly {
            write!(f, " first")?;
        }
        Ok(())
    }
}

/// The shape of an update operation.
#[derive(Clone)]
pub struct UpdateDescriptor {
    pub(crate) filter: Filter,
    pub(crate) update: UpdateSpec,
    pub(crate) options: UpdateOptions,
}

impl UpdateDescriptor {
    pub(crate) fn new(filter: Filter, update: UpdateSpec, options: UpdateOptions) -> Self {
        UpdateDescriptor {
            filter,
            update,
            options,
        }
    }
}

/// The shape of a delete operation.
#[derive(Clone)]
pub struct DeleteDescriptor {
    pub(crate) filter: Filter,
}

impl DeleteDescriptor {
    pub(crate) fn new(filter: Filter) -> Self {
        DeleteDescriptor { filter }
    }
}

/// An immutable description of a store operation.
///
/// Every publisher knows the descriptor of the operation it executes; the
/// descriptor is used for operation logging and introspection, and tests
/// assert against it. Construction happens once, in the collection methods;
/// descriptors are never mutated afterwards.
#[derive(Clone)]
pub enum OperationDescriptor {
    /// Insert a single document.
    InsertOne(Document),
    /// Insert a batch of documents.
    InsertMany(Vec<Document>),
    /// Query documents.
    Find(FindDescriptor),
    /// Update the first matching document.
    UpdateOne(UpdateDescriptor),
    /// Update every matching document.
    UpdateMany(UpdateDescriptor),
    /// Delete the first matching document.
    DeleteOne(DeleteDescriptor),
    /// Delete every matching document.
    DeleteMany(DeleteDescriptor),
}

impl OperationDescriptor {
    /// Short operation name used in log lines.
    pub fn operation_name(&self) -> &'static str {
        match self {
            OperationDescriptor::InsertOne(_) => "insert_one",
            OperationDescriptor::InsertMany(_) => "insert_many",
            OperationDescriptor::Find(_) => "find",
            OperationDescriptor::UpdateOne(_) => "update_one",
            OperationDescriptor::UpdateMany(_) => "update_many",
            OperationDescriptor::DeleteOne(_) => "delete_one",
            OperationDescriptor::DeleteMany(_) => "delete_many",
        }
    }
}

impl Display for OperationDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationDescriptor::InsertOne(_) => write!(f, "insert_one(1 document)"),
            OperationDescriptor::InsertMany(docs) => {
                write!(f, "insert_many({} documents)", docs.len())
            }
            OperationDescriptor::Find(descriptor) => write!(f, "{}", descriptor),
            OperationDescriptor::UpdateOne(descriptor) => {
                write!(
                    f,
                    "update_one where {} with {}",
                    descriptor.filter, descriptor.update
                )
            }
            OperationDescriptor::UpdateMany(descriptor) => {
                write!(
                    f,
                    "update_many where {} with {}",
                    descriptor.filter, descriptor.update
                )
            }
            OperationDescriptor::DeleteOne(descriptor) => {
                write!(f, "delete_one where {}", descriptor.filter)
            }
            OperationDescriptor::DeleteMany(descriptor) => {
                write!(f, "delete_many where {}", descriptor.filter)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::exclude_id;
    use crate::common::{descending, SortOrder};
    use crate::doc;
    use crate::filter::field;

    #[test]
    fn test_find_descriptor_display() {
        let mut descriptor = FindDescriptor::new(Some(field("i").gt(50)));
        descriptor.sort = Some(descending("i"));
        descriptor.projection = Some(exclude_id());
        descriptor.limit = FindLimit::FirstOnly;
        assert_eq!(
            format!("{}", descriptor),
            "find where (i > 50) sort [i:desc] project exclude(_id) first"
        );
    }

    #[test]
    fn test_operation_names() {
        assert_eq!(
            OperationDescriptor::InsertOne(doc! { a: 1 }).operation_name(),
            "insert_one"
        );
        assert_eq!(
            OperationDescriptor::Find(FindDescriptor::new(None)).operation_name(),
            "find"
        );
        assert_eq!(
            OperationDescriptor::DeleteMany(DeleteDescriptor::new(field("i").gte(100)))
                .operation_name(),
            "delete_many"
        );
    }

    #[test]
    fn test_insert_many_display_counts_documents() {
        let descriptor = OperationDescriptor::InsertMany(vec![doc! { a: 1 }, doc! { a: 2 }]);
        assert_eq!(format!("{}", descriptor), "insert_many(2 documents)");
    }

    #[test]
    fn test_sort_order_reexported_for_descriptors() {
        let descriptor = FindDescriptor {
            filter: None,
            sort: Some(descending("i")),
            projection: None,
            limit: FindLimit::Unbounded,
        };
        assert_eq!(
            descriptor.sort.as_ref().unwrap().sorted_fields()[0].1,
            SortOrder::Descending
        );
    }
}
