use crate::collection::operation::{
    DeleteDescriptor, FindDescriptor, FindLimit, OperationDescriptor, UpdateDescriptor,
};
use crate::collection::{DeleteOutcome, Document, InsertAck, UpdateOutcome};
use crate::reactive::SignalEmitter;
use crate::store::StoreCollection;

/// One operation kind's execution strategy.
///
/// An executor obtains its result items from the store and pushes them
/// through the emitter's demand gate. Executors run on the producer thread a
/// publisher spawns per subscribe call, so every blocking store call and
/// every suspension on exhausted demand happens off the subscribing thread.
pub(crate) trait OperationExecutor<T>: Send + Sync {
    /// The immutable description of the operation this executor runs.
    fn descriptor(&self) -> OperationDescriptor;

    /// Runs the operation to its terminal signal (or silent cancellation).
    fn execute(&self, source: &StoreCollection, emitter: &SignalEmitter<T>);
}

/// Produces exactly one [`InsertAck`] then completes; a store failure errors
/// with no item.
pub(crate) struct InsertOneExecutor {
    document: Document,
}

impl InsertOneExecutor {
    pub(crate) fn new(document: Document) -> Self {
        InsertOneExecutor { document }
    }
}

impl OperationExecutor<InsertAck> for InsertOneExecutor {
    fn descriptor(&self) -> OperationDescriptor {
        OperationDescriptor::InsertOne(self.document.clone())
    }

    fn execute(&self, source: &StoreCollection, emitter: &SignalEmitter<InsertAck>) {
        match source.insert_one(self.document.clone()) {
            Ok(ack) => {
                if emitter.emit(ack) {
                    emitter.complete();
                }
            }
            Err(e) => emitter.fail(e),
        }
    }
}

/// Produces exactly one [`InsertAck`] for the whole batch then completes; a
/// store failure errors with no item.
pub(crate) struct InsertManyExecutor {
    documents: Vec<Document>,
}

impl InsertManyExecutor {
    pub(crate) fn new(documents: Vec<Document>) -> Self {
        InsertManyExecutor { documents }
    }
}

impl OperationExecutor<InsertAck> for InsertManyExecutor {
    fn descriptor(&self) -> OperationDescriptor {
        OperationDescriptor::InsertMany(self.documents.clone())
    }

    fn execute(&self, source: &StoreCollection, emitter: &SignalEmitter<InsertAck>) {
        match source.insert_many(self.documents.clone()) {
            Ok(ack) => {
                if emitter.emit(ack) {
                    emitter.complete();
                }
            }
            Err(e) => emitter.fail(e),
        }
    }
}

/// Streams the store's matching documents through the demand gate.
///
/// The store applies the filter, sort and projection; this executor only
/// pumps the resulting lazy stream item by item, suspending whenever demand
/// is exhausted. With [`FindLimit::FirstOnly`] at most one document is
/// delivered before completing.
pub(crate) struct FindExecutor {
    descriptor: FindDescriptor,
}

impl FindExecutor {
    pub(crate) fn new(descriptor: FindDescriptor) -> Self {
        FindExecutor { descriptor }
    }
}

impl OperationExecutor<Document> for FindExecutor {
    fn descriptor(&self) -> OperationDescriptor {
        OperationDescriptor::Find(self.descriptor.clone())
    }

    fn execute(&self, source: &StoreCollection, emitter: &SignalEmitter<Document>) {
        let stream = match source.query(
            self.descriptor.filter.clone(),
            self.descriptor.sort.clone(),
            self.descriptor.projection.clone(),
        ) {
            Ok(stream) => stream,
            Err(e) => {
                emitter.fail(e);
                return;
            }
        };

        for item in stream {
            match item {
                Ok(document) => {
                    if !emitter.emit(document) {
                        return;
                    }
                    if self.descriptor.limit == FindLimit::FirstOnly {
                        emitter.complete();
                        return;
                    }
                }
                Err(e) => {
                    emitter.fail(e);
                    return;
                }
            }
        }
        emitter.complete();
    }
}

/// Produces exactly one [`UpdateOutcome`] reflecting the aggregate effect of
/// the update, then completes; a store failure errors with no item.
pub(crate) struct UpdateExecutor {
    descriptor: UpdateDescriptor,
    just_once: bool,
}

impl UpdateExecutor {
    pub(crate) fn new(descriptor: UpdateDescriptor, just_once: bool) -> Self {
        UpdateExecutor {
            descriptor,
            just_once,
        }
    }
}

impl OperationExecutor<UpdateOutcome> for UpdateExecutor {
    fn descriptor(&self) -> OperationDescriptor {
        if self.just_once {
            OperationDescriptor::UpdateOne(self.descriptor.clone())
        } else {
            OperationDescriptor::UpdateMany(self.descriptor.clone())
        }
    }

    fn execute(&self, source: &StoreCollection, emitter: &SignalEmitter<UpdateOutcome>) {
        let result = source.update(
            self.descriptor.filter.clone(),
            &self.descriptor.update,
            &self.descriptor.options,
            self.just_once,
        );
        match result {
            Ok(outcome) => {
                if emitter.emit(outcome) {
                    emitter.complete();
                }
            }
            Err(e) => emitter.fail(e),
        }
    }
}

/// Produces exactly one [`DeleteOutcome`] reflecting the aggregate effect of
/// the delete, then completes; a store failure errors with no item.
pub(crate) struct DeleteExecutor {
    descriptor: DeleteDescriptor,
    just_once: bool,
}

impl DeleteExecutor {
    pub(crate) fn new(descriptor: DeleteDescriptor, just_once: bool) -> Self {
        DeleteExecutor {
            descriptor,
            just_once,
        }
    }
}

impl OperationExecutor<DeleteOutcome> for DeleteExecutor {
    fn descriptor(&self) -> OperationDescriptor {
        if self.just_once {
            OperationDescriptor::DeleteOne(self.descriptor.clone())
        } else {
            OperationDescriptor::DeleteMany(self.descriptor.clone())
        }
    }

    fn execute(&self, source: &StoreCollection, emitter: &SignalEmitter<DeleteOutcome>) {
        match source.delete(self.descriptor.filter.clone(), self.just_once) {
            Ok(outcome) => {
                if emitter.emit(outcome) {
                    emitter.complete();
                }
            }
            Err(e) => emitter.fail(e),
        }
    }
}
