use itertools::Itertools;
use std::fmt::Display;

use crate::collection::Document;
use crate::common::DOC_ID;
use crate::errors::DocfluxResult;

/// Whether the listed fields are kept or removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionMode {
    /// Only the listed fields (plus the id field) appear in results.
    Include,
    /// The listed fields are removed from results.
    Exclude,
}

/// Selects which document fields are included in returned items.
///
/// A projection is a set of field names plus a mode. In include mode the
/// result carries the listed fields and the store's id field; the id is
/// removed only when explicitly excluded. Field names may address embedded
/// fields (`"address.city"`).
///
/// # Examples
///
/// ```rust,ignore
/// use docflux::collection::{exclude_id, ProjectionSpec};
///
/// // keep only name and age (plus _id)
/// let spec = ProjectionSpec::include(vec!["name", "age"]);
///
/// // drop the store id from results
/// let publisher = collection.find_all().projection(exclude_id());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionSpec {
    fields: Vec<String>,
    mode: ProjectionMode,
}

impl ProjectionSpec {
    /// Creates a projection that keeps only the listed fields (and the id
    /// field).
    pub fn include(fields: Vec<&str>) -> Self {
        ProjectionSpec {
            fields: fields.iter().map(|f| f.to_string()).collect(),
            mode: ProjectionMode::Include,
        }
    }

    /// Creates a projection that removes the listed fields.
    pub fn exclude(fields: Vec<&str>) -> Self {
        ProjectionSpec {
            fields: fields.iter().map(|f| f.to_string()).collect(),
            mode: ProjectionMode::Exclude,
        }
    }

    /// Returns the projected field names.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Returns the projection mode.
    pub fn mode(&self) -> ProjectionMode {
        self.mode
    }

    /// Rewrites a document according to this projection.
    pub(crate) fn apply(&self, document: &Document) -> DocfluxResult<Document> {
        match self.mode {
            ProjectionMode::Include => {
                let mut projected = Document::new();
                if let Some(id) = document.id() {
                    projected.put_id(id);
                }
                for field in &self.fields {
                    let value = document.get(field)?;
                    if !value.is_null() || document.has_field(field) {
                        projected.put_raw(field, value)?;
                    }
                }
                Ok(projected)
            }
            ProjectionMode::Exclude => {
                let mut projected = document.clone();
                for field in &self.fields {
                    projected.remove(field)?;
                }
                Ok(projected)
            }
        }
    }
}

impl Display for ProjectionSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mode = match self.mode {
            ProjectionMode::Include => "include",
            ProjectionMode::Exclude => "exclude",
        };
        write!(f, "{}({})", mode, self.fields.iter().join(", "))
    }
}

/// Creates a projection that removes the store's id field from results.
pub fn exclude_id() -> ProjectionSpec {
    ProjectionSpec::exclude(vec![DOC_ID])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::DocId;
    use crate::doc;
    use crate::Value;

    fn doc_with_id() -> Document {
        let mut doc = doc! { name: "Alice", age: 30, city: "NY" };
        doc.put_id(DocId::new());
        doc
    }

    #[test]
    fn test_include_keeps_listed_fields_and_id() {
        let doc = doc_with_id();
        let projected = ProjectionSpec::include(vec!["name"]).apply(&doc).unwrap();
        assert_eq!(projected.get("name").unwrap(), Value::from("Alice"));
        assert!(!projected.has_field("age"));
        assert!(!projected.has_field("city"));
        assert!(projected.id().is_some());
    }

    #[test]
    fn test_exclude_removes_listed_fields() {
        let doc = doc_with_id();
        let projected = ProjectionSpec::exclude(vec!["age", "city"])
            .apply(&doc)
            .unwrap();
        assert!(projected.has_field("name"));
        assert!(!projected.has_field("age"));
        assert!(!projected.has_field("city"));
        assert!(projected.id().is_some());
    }

    #[test]
    fn test_exclude_id_removes_only_the_id() {
        let doc = doc_with_id();
        let projected = exclude_id().apply(&doc).unwrap();
        assert!(projected.id().is_none());
        assert!(projected.has_field("name"));
        assert!(projected.has_field("age"));
        assert!(projected.has_field("city"));
    }

    #[test]
    fn test_include_skips_missing_fields() {
        let doc = doc_with_id();
        let projected = ProjectionSpec::include(vec!["name", "missing"])
            .apply(&doc)
            .unwrap();
        assert!(projected.has_field("name"));
        assert!(!projected.has_field("missing"));
    }

    #[test]
    fn test_include_nested_field() {
        let doc = doc! { info: { x: 200, y: 102 } };
        let projected = ProjectionSpec::include(vec!["info.x"]).apply(&doc).unwrap();
        assert_eq!(projected.get("info.x").unwrap(), Value::I32(200));
        assert!(!projected.has_field("info.y"));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", exclude_id()), "exclude(_id)");
        assert_eq!(
            format!("{}", ProjectionSpec::include(vec!["a", "b"])),
            "include(a, b)"
        );
    }
}
