use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::errors::{DocfluxError, DocfluxResult, ErrorKind};
use crate::store::memory::collection_map::MemoryCollection;
use crate::store::{StoreCollection, StoreProvider};

/// In-memory storage backend.
///
/// `MemoryStore` keeps every collection entirely in memory. It is the
/// default backend selected by the builder and the backend the integration
/// tests run against. Collections are created on first access and share the
/// store's closed flag, so closing the store rejects further operations on
/// already handed-out collection sources as well.
///
/// # Examples
///
/// ```rust,ignore
/// use docflux::store::memory::MemoryStore;
/// use docflux::store::StoreHandle;
///
/// let store = StoreHandle::new(MemoryStore::new());
/// let collection = store.open_collection("test")?;
/// ```
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<MemoryStoreInner>,
}

impl MemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        MemoryStore {
            inner: Arc::new(MemoryStoreInner {
                collections: DashMap::new(),
                closed: Arc::new(AtomicBool::new(false)),
            }),
        }
    }
}

#[derive(Default)]
struct MemoryStoreInner {
    collections: DashMap<String, MemoryCollection>,
    closed: Arc<AtomicBool>,
}

impl StoreProvider for MemoryStore {
    fn open_collection(&self, name: &str) -> DocfluxResult<StoreCollection> {
        if self.is_closed() {
            log::error!("Cannot open collection {} on a closed store", name);
            return Err(DocfluxError::new(
                "Store is closed",
                ErrorKind::ConnectionFailure,
            ));
        }
        let collection = self
            .inner
            .collections
            .entry(name.to_string())
            .or_insert_with(|| {
                log::debug!("Creating in-memory collection {}", name);
                MemoryCollection::new(name, self.inner.closed.clone())
            })
            .clone();
        Ok(StoreCollection::new(collection))
    }

    fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }

    fn close(&self) -> DocfluxResult<()> {
        self.inner.closed.store(true, Ordering::Release);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;

    #[test]
    fn test_open_collection_creates_on_first_access() {
        let store = MemoryStore::new();
        let first = store.open_collection("users").unwrap();
        first.insert_one(doc! { a: 1 }).unwrap();

        // same name resolves to the same collection
        let second = store.open_collection("users").unwrap();
        assert_eq!(second.query(None, None, None).unwrap().count(), 1);
    }

    #[test]
    fn test_collections_are_independent() {
        let store = MemoryStore::new();
        let left = store.open_collection("left").unwrap();
        let right = store.open_collection("right").unwrap();
        left.insert_one(doc! { a: 1 }).unwrap();
        assert_eq!(right.query(None, None, None).unwrap().count(), 0);
    }

    #[test]
    fn test_close_rejects_new_collections() {
        let store = MemoryStore::new();
        store.close().unwrap();
        assert!(store.is_closed());
        let err = store.open_collection("late").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ConnectionFailure);
    }

    #[test]
    fn test_close_rejects_existing_collection_operations() {
        let store = MemoryStore::new();
        let collection = store.open_collection("users").unwrap();
        store.close().unwrap();
        let err = collection.insert_one(doc! { a: 1 }).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ConnectionFailure);
    }
}
