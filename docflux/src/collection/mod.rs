//! Collections, documents, and the reactive operation surface.
//!
//! This module provides the document model and the client-facing collection
//! type.
//!
//! # Documents
//!
//! A `Document` is an insertion-ordered key-value map where keys are strings
//! and values are `Value` objects. Documents support nested fields addressed
//! with `.`:
//!
//! ```rust,ignore
//! use docflux::collection::Document;
//!
//! let mut doc = Document::new();
//! doc.put("name", "Alice")?;
//! doc.put("address.city", "New York")?;
//! doc.put("age", 30i64)?;
//! ```
//!
//! # Collections
//!
//! A `DocfluxCollection` exposes every store operation as a cold publisher:
//!
//! ```rust,ignore
//! use docflux::filter::field;
//!
//! let collection = db.collection("users")?;
//! collection.insert_one(doc).subscribe(ack_subscriber);
//! collection.find(field("age").eq(30)).subscribe(doc_subscriber);
//! ```
//!
//! # Document IDs
//!
//! Each stored document carries a unique `_id` field holding a [`DocId`]
//! generated by the store using a snowflake scheme. The field is reserved
//! and cannot be assigned manually.

#[allow(clippy::module_inception)]
mod collection;
mod doc_id;
mod document;
pub(crate) mod operation;
mod projection;
mod update_options;
mod update_spec;

pub use collection::*;
pub use doc_id::DocId;
pub(crate) use doc_id::SnowflakeIdGenerator;
pub use document::*;
pub use operation::{
    DeleteDescriptor, DeleteOutcome, FindDescriptor, FindLimit, InsertAck, OperationDescriptor,
    UpdateDescriptor, UpdateOutcome,
};
pub use projection::*;
pub use update_options::*;
pub use update_spec::*;
