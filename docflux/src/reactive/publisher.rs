use std::sync::Arc;
use std::time::Duration;

use crate::collection::operation::{
    FindDescriptor, FindExecutor, FindLimit, OperationDescriptor, OperationExecutor,
};
use crate::collection::{Document, ProjectionSpec};
use crate::common::{async_task, schedule_once, SortOrder, SortableFields};
use crate::reactive::{SignalEmitter, Subscriber, Subscription};
use crate::store::StoreCollection;

/// A cold publisher for one store operation.
///
/// A publisher is a factory: every `subscribe` call constructs a fresh
/// [`Subscription`], delivers `on_subscribe` synchronously, then runs the
/// operation's executor on its own producer thread. Nothing happens until a
/// consumer subscribes, and subscribing twice executes the operation twice.
///
/// # Examples
///
/// ```rust,ignore
/// let publisher = collection.insert_one(doc! { name: "mongodb" });
/// publisher.subscribe(FnSubscriber::new(
///     1,
///     |ack| println!("insert {}", ack),
///     |err| eprintln!("fail: {}", err),
///     || println!("complete"),
/// ));
/// ```
pub struct OperationPublisher<T> {
    source: StoreCollection,
    executor: Arc<dyn OperationExecutor<T>>,
    timeout: Option<Duration>,
}

impl<T: Send + 'static> OperationPublisher<T> {
    pub(crate) fn new(
        source: StoreCollection,
        executor: Arc<dyn OperationExecutor<T>>,
        timeout: Option<Duration>,
    ) -> Self {
        OperationPublisher {
            source,
            executor,
            timeout,
        }
    }

    /// The immutable description of the operation this publisher executes.
    pub fn descriptor(&self) -> OperationDescriptor {
        self.executor.descriptor()
    }

    /// Subscribes a consumer and starts executing the operation.
    ///
    /// `on_subscribe` is delivered synchronously on the calling thread, so
    /// demand requested inside it is visible before the producer thread
    /// claims its first delivery slot. Every other signal arrives from the
    /// producer thread.
    pub fn subscribe<S: Subscriber<T> + 'static>(&self, subscriber: S) {
        self.subscribe_shared(Arc::new(subscriber))
    }

    pub(crate) fn subscribe_shared(&self, subscriber: Arc<dyn Subscriber<T>>) {
        let subscription = Subscription::new();
        log::debug!(
            "collection {}: subscribing to {}",
            self.source.name(),
            self.executor.descriptor()
        );

        subscriber.on_subscribe(subscription.clone());
        subscription.activate();

        if let Some(timeout) = self.timeout {
            let watchdog = subscription.clone();
            schedule_once(timeout, move || watchdog.expire());
        }

        let source = self.source.clone();
        let executor = self.executor.clone();
        let emitter = SignalEmitter::new(subscriber, subscription);
        async_task(move || executor.execute(&source, &emitter));
    }
}

/// A cold publisher for find operations, with fluent query shaping.
///
/// Mirrors the driver surface of the underlying store operation: the result
/// set can be sorted, projected and limited to its first document before
/// subscribing. Each shaping method returns the publisher, so calls chain.
///
/// # Examples
///
/// ```rust,ignore
/// use docflux::common::descending;
/// use docflux::collection::exclude_id;
///
/// collection
///     .find(exists("i"))
///     .sort(descending("i"))
///     .projection(exclude_id())
///     .subscribe(subscriber);
///
/// // at most one document
/// collection.find_all().first().subscribe(subscriber);
/// ```
pub struct DocumentPublisher {
    source: StoreCollection,
    descriptor: FindDescriptor,
    timeout: Option<Duration>,
}

impl DocumentPublisher {
    pub(crate) fn new(
        source: StoreCollection,
        descriptor: FindDescriptor,
        timeout: Option<Duration>,
    ) -> Self {
        DocumentPublisher {
            source,
            descriptor,
            timeout,
        }
    }

    /// Sorts the result set. Multiple calls append sort keys with
    /// decreasing precedence.
    pub fn sort(mut self, sort: SortableFields) -> Self {
        let merged = match self.descriptor.sort.take() {
            Some(mut existing) => {
                for (field, order) in sort.sorted_fields() {
                    existing = existing.add_sorted_field(field.clone(), *order);
                }
                existing
            }
            None => sort,
        };
        self.descriptor.sort = Some(merged);
        self
    }

    /// Sorts the result set by a single field.
    pub fn sort_by(self, field_name: &str, order: SortOrder) -> Self {
        self.sort(SortableFields::new().add_sorted_field(field_name, order))
    }

    /// Shapes which fields the returned documents carry.
    pub fn projection(mut self, projection: ProjectionSpec) -> Self {
        self.descriptor.projection = Some(projection);
        self
    }

    /// Limits the subscription to at most the first matching document.
    pub fn first(mut self) -> Self {
        self.descriptor.limit = FindLimit::FirstOnly;
        self
    }

    /// The immutable description of the operation this publisher executes.
    pub fn descriptor(&self) -> OperationDescriptor {
        OperationDescriptor::Find(self.descriptor.clone())
    }

    /// Subscribes a consumer and starts executing the query. See
    /// [`OperationPublisher::subscribe`] for the delivery contract.
    pub fn subscribe<S: Subscriber<Document> + 'static>(&self, subscriber: S) {
        let publisher = OperationPublisher::new(
            self.source.clone(),
            Arc::new(FindExecutor::new(self.descriptor.clone())),
            self.timeout,
        );
        publisher.subscribe(subscriber)
    }
}
