use std::sync::Arc;
use std::time::Duration;

use crate::collection::operation::{
    DeleteDescriptor, DeleteExecutor, FindDescriptor, InsertManyExecutor, InsertOneExecutor,
    UpdateDescriptor, UpdateExecutor,
};
use crate::collection::{DeleteOutcome, Document, InsertAck, UpdateOptions, UpdateOutcome, UpdateSpec};
use crate::filter::Filter;
use crate::reactive::{DocumentPublisher, OperationPublisher};
use crate::store::StoreCollection;

/// A document collection exposing the reactive operation surface.
///
/// Every method builds an immutable operation descriptor and returns a cold
/// publisher for it; nothing touches the store until a consumer subscribes.
/// Collections are cheap to clone and safe to share across threads, and
/// independent subscriptions obtained from the same collection run
/// concurrently.
///
/// # Examples
///
/// ```rust,ignore
/// use docflux::filter::field;
/// use docflux::reactive::FnSubscriber;
/// use docflux::doc;
///
/// let collection = db.collection("test")?;
///
/// collection.insert_one(doc! { name: "mongodb", count: 1 }).subscribe(
///     FnSubscriber::new(
///         1,
///         |ack| println!("insert {}", ack),
///         |err| eprintln!("fallo: {}", err),
///         || println!("complete"),
///     ),
/// );
///
/// collection.find(field("i").gt(50)).subscribe(my_subscriber);
/// ```
#[derive(Clone)]
pub struct DocfluxCollection {
    source: StoreCollection,
    operation_timeout: Option<Duration>,
}

impl DocfluxCollection {
    pub(crate) fn new(source: StoreCollection, operation_timeout: Option<Duration>) -> Self {
        DocfluxCollection {
            source,
            operation_timeout,
        }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> String {
        self.source.name()
    }

    /// Prepares an insert of a single document.
    ///
    /// The publisher delivers one [`InsertAck`] upon the store's
    /// acknowledgment, then completes. A store failure errors with no item.
    pub fn insert_one(&self, document: Document) -> OperationPublisher<InsertAck> {
        OperationPublisher::new(
            self.source.clone(),
            Arc::new(InsertOneExecutor::new(document)),
            self.operation_timeout,
        )
    }

    /// Prepares an insert of a batch of documents.
    ///
    /// The publisher delivers one [`InsertAck`] for the whole batch, then
    /// completes. The batch must not be empty.
    pub fn insert_many(&self, documents: Vec<Document>) -> OperationPublisher<InsertAck> {
        OperationPublisher::new(
            self.source.clone(),
            Arc::new(InsertManyExecutor::new(documents)),
            self.operation_timeout,
        )
    }

    /// Prepares a query for the documents matching a filter.
    ///
    /// The returned publisher can shape the result set with
    /// [`sort`](DocumentPublisher::sort),
    /// [`projection`](DocumentPublisher::projection) and
    /// [`first`](DocumentPublisher::first) before subscribing.
    pub fn find(&self, filter: Filter) -> DocumentPublisher {
        DocumentPublisher::new(
            self.source.clone(),
            FindDescriptor::new(Some(filter)),
            self.operation_timeout,
        )
    }

    /// Prepares a query for every document in the collection.
    pub fn find_all(&self) -> DocumentPublisher {
        DocumentPublisher::new(
            self.source.clone(),
            FindDescriptor::new(None),
            self.operation_timeout,
        )
    }

    /// Prepares an update of the first document matching the filter.
    pub fn update_one(&self, filter: Filter, update: UpdateSpec) -> OperationPublisher<UpdateOutcome> {
        self.update_one_with_options(filter, update, UpdateOptions::default())
    }

    /// Prepares an update of the first document matching the filter, with
    /// options (e.g. upsert).
    pub fn update_one_with_options(
        &self,
        filter: Filter,
        update: UpdateSpec,
        options: UpdateOptions,
    ) -> OperationPublisher<UpdateOutcome> {
        OperationPublisher::new(
            self.source.clone(),
            Arc::new(UpdateExecutor::new(
                UpdateDescriptor::new(filter, update, options),
                true,
            )),
            self.operation_timeout,
        )
    }

    /// Prepares an update of every document matching the filter.
    ///
    /// The publisher delivers one [`UpdateOutcome`] reflecting the aggregate
    /// effect across all matched documents, then completes.
    pub fn update_many(
        &self,
        filter: Filter,
        update: UpdateSpec,
    ) -> OperationPublisher<UpdateOutcome> {
        self.update_many_with_options(filter, update, UpdateOptions::default())
    }

    /// Prepares an update of every document matching the filter, with
    /// options (e.g. upsert).
    pub fn update_many_with_options(
        &self,
        filter: Filter,
        update: UpdateSpec,
        options: UpdateOptions,
    ) -> OperationPublisher<UpdateOutcome> {
        OperationPublisher::new(
            self.source.clone(),
            Arc::new(UpdateExecutor::new(
                UpdateDescriptor::new(filter, update, options),
                false,
            )),
            self.operation_timeout,
        )
    }

    /// Prepares a delete of the first document matching the filter.
    pub fn delete_one(&self, filter: Filter) -> OperationPublisher<DeleteOutcome> {
        OperationPublisher::new(
            self.source.clone(),
            Arc::new(DeleteExecutor::new(DeleteDescriptor::new(filter), true)),
            self.operation_timeout,
        )
    }

    /// Prepares a delete of every document matching the filter.
    ///
    /// The publisher delivers one [`DeleteOutcome`] with the removed count,
    /// then completes.
    pub fn delete_many(&self, filter: Filter) -> OperationPublisher<DeleteOutcome> {
        OperationPublisher::new(
            self.source.clone(),
            Arc::new(DeleteExecutor::new(DeleteDescriptor::new(filter), false)),
            self.operation_timeout,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;
    use crate::filter::field;
    use crate::store::memory::MemoryStore;
    use crate::store::StoreProvider;

    fn test_collection() -> DocfluxCollection {
        let store = MemoryStore::new();
        DocfluxCollection::new(store.open_collection("test").unwrap(), None)
    }

    #[test]
    fn test_publishers_are_cold() {
        let collection = test_collection();
        // preparing an insert must not touch the store
        let _unused = collection.insert_one(doc! { i: 1 });
        let publisher = collection.find_all();
        assert_eq!(format!("{}", publisher.descriptor()), "find");
    }

    #[test]
    fn test_descriptor_shapes() {
        let collection = test_collection();
        assert_eq!(
            collection.insert_one(doc! { a: 1 }).descriptor().operation_name(),
            "insert_one"
        );
        assert_eq!(
            collection
                .update_many(field("i").lt(100), UpdateSpec::new().inc("i", 1))
                .descriptor()
                .operation_name(),
            "update_many"
        );
        assert_eq!(
            collection
                .update_one(field("i").eq(10), UpdateSpec::new().set("i", 110))
                .descriptor()
                .operation_name(),
            "update_one"
        );
        assert_eq!(
            collection.delete_one(field("i").eq(110)).descriptor().operation_name(),
            "delete_one"
        );
        assert_eq!(
            collection.delete_many(field("i").gte(100)).descriptor().operation_name(),
            "delete_many"
        );
    }

    #[test]
    fn test_name_passthrough() {
        let collection = test_collection();
        assert_eq!(collection.name(), "test");
    }
}
