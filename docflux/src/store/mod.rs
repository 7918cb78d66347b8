//! Storage backend abstractions.
//!
//! The store is an external collaborator behind the provider traits in this
//! module: the protocol core treats it as an opaque source of operation
//! results. [`StoreProvider`] manages named collection sources and the store
//! lifecycle; [`StoreCollectionProvider`] executes the operation set against
//! one collection. The crate ships a single in-tree backend,
//! [`memory::MemoryStore`], which is also the default backend selected by
//! the builder.

pub mod memory;

use crate::collection::{
    DeleteOutcome, Document, InsertAck, ProjectionSpec, UpdateOptions, UpdateOutcome, UpdateSpec,
};
use crate::common::stream::DocumentStream;
use crate::common::SortableFields;
use crate::errors::DocfluxResult;
use crate::filter::Filter;
use std::ops::Deref;
use std::sync::Arc;

/// Trait defining the interface of a storage backend.
///
/// A store hands out named collection sources and manages its own lifecycle.
/// After `close()` returns, opening collections and executing operations
/// fail with `ErrorKind::ConnectionFailure`.
pub trait StoreProvider: Send + Sync {
    /// Opens the collection source with the given name, creating it if the
    /// backend supports that.
    fn open_collection(&self, name: &str) -> DocfluxResult<StoreCollection>;

    /// Returns true once the store has been closed.
    fn is_closed(&self) -> bool;

    /// Closes the store and releases its resources.
    fn close(&self) -> DocfluxResult<()>;
}

/// A storage backend handle.
///
/// Cheap to clone; all clones share the same underlying store.
#[derive(Clone)]
pub struct StoreHandle {
    inner: Arc<dyn StoreProvider>,
}

impl StoreHandle {
    /// Wraps a provider implementation.
    pub fn new<T: StoreProvider + 'static>(inner: T) -> Self {
        StoreHandle {
            inner: Arc::new(inner),
        }
    }
}

impl Deref for StoreHandle {
    type Target = Arc<dyn StoreProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// Trait defining the operation set a store executes against one collection.
///
/// This is the boundary the operation executors call through. Implementations
/// perform the blocking store work; the reactive layer above never blocks on
/// anything else.
pub trait StoreCollectionProvider: Send + Sync {
    /// The collection name.
    fn name(&self) -> String;

    /// Inserts a single document, assigning it an id if it has none.
    fn insert_one(&self, document: Document) -> DocfluxResult<InsertAck>;

    /// Inserts a batch of documents. The batch must not be empty.
    fn insert_many(&self, documents: Vec<Document>) -> DocfluxResult<InsertAck>;

    /// Executes a query and returns a lazily pollable stream of matching
    /// documents, shaped by the optional sort and projection.
    ///
    /// The filter is validated before execution; a malformed filter fails
    /// the whole operation up front.
    fn query(
        &self,
        filter: Option<Filter>,
        sort: Option<SortableFields>,
        projection: Option<ProjectionSpec>,
    ) -> DocfluxResult<DocumentStream>;

    /// Applies the update specification to matching documents.
    ///
    /// With `just_once` only the first match is updated. When the options
    /// enable `insert_if_absent` and nothing matches, the specification is
    /// applied to an empty document and the result inserted.
    fn update(
        &self,
        filter: Filter,
        update: &UpdateSpec,
        options: &UpdateOptions,
        just_once: bool,
    ) -> DocfluxResult<UpdateOutcome>;

    /// Removes matching documents. With `just_once` only the first match is
    /// removed.
    fn delete(&self, filter: Filter, just_once: bool) -> DocfluxResult<DeleteOutcome>;
}

/// A collection source handle.
///
/// Cheap to clone; all clones operate on the same underlying collection.
#[derive(Clone)]
pub struct StoreCollection {
    inner: Arc<dyn StoreCollectionProvider>,
}

impl StoreCollection {
    /// Wraps a provider implementation.
    pub fn new<T: StoreCollectionProvider + 'static>(inner: T) -> Self {
        StoreCollection {
            inner: Arc::new(inner),
        }
    }
}

impl Deref for StoreCollection {
    type Target = Arc<dyn StoreCollectionProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
