use dashmap::DashMap;
use std::sync::Arc;

use crate::collection::DocfluxCollection;
use crate::docflux_builder::DocfluxBuilder;
use crate::docflux_config::DocfluxConfig;
use crate::errors::{DocfluxError, DocfluxResult, ErrorKind};
use crate::store::StoreHandle;

/// The docflux client.
///
/// `Docflux` is the entry point of the crate: it owns the store backend and
/// hands out [`DocfluxCollection`]s whose operations are exposed as cold,
/// demand-gated publishers.
///
/// The client uses the PIMPL pattern internally: clones share the same
/// underlying state through `Arc` and are safe to use from any thread.
/// Closing the client closes the store, after which operations fail with
/// `ErrorKind::ConnectionFailure`.
///
/// # Examples
///
/// ```rust,ignore
/// use docflux::docflux::Docflux;
/// use docflux::reactive::FnSubscriber;
/// use docflux::doc;
///
/// let db = Docflux::builder().open()?;
/// let collection = db.collection("test")?;
///
/// collection.insert_one(doc! { name: "mongodb", count: 1 }).subscribe(
///     FnSubscriber::new(
///         1,
///         |ack| println!("insert {}", ack),
///         |err| eprintln!("insert failed: {}", err),
///         || println!("complete"),
///     ),
/// );
///
/// db.close()?;
/// ```
#[derive(Clone)]
pub struct Docflux {
    inner: Arc<DocfluxInner>,
}

impl Docflux {
    /// Creates a new `DocfluxBuilder` for configuring and opening a client.
    pub fn builder() -> DocfluxBuilder {
        DocfluxBuilder::new()
    }

    pub(crate) fn new(config: DocfluxConfig) -> DocfluxResult<Self> {
        let store = config.store()?;
        Ok(Docflux {
            inner: Arc::new(DocfluxInner {
                config,
                store,
                collections: DashMap::new(),
            }),
        })
    }

    /// Gets a collection by name, creating it if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or the client has been closed.
    pub fn collection(&self, name: &str) -> DocfluxResult<DocfluxCollection> {
        if name.trim().is_empty() {
            log::error!("Collection name cannot be empty");
            return Err(DocfluxError::new(
                "Collection name cannot be empty",
                ErrorKind::InvalidOperation,
            ));
        }
        if self.is_closed() {
            log::error!("Cannot open collection {} on a closed client", name);
            return Err(DocfluxError::new(
                "Client has been closed",
                ErrorKind::ConnectionFailure,
            ));
        }

        if let Some(collection) = self.inner.collections.get(name) {
            return Ok(collection.clone());
        }
        let source = self.inner.store.open_collection(name)?;
        let collection =
            DocfluxCollection::new(source, self.inner.config.operation_timeout());
        self.inner
            .collections
            .insert(name.to_string(), collection.clone());
        Ok(collection)
    }

    /// Whether the client (and its store) has been closed.
    pub fn is_closed(&self) -> bool {
        self.inner.store.is_closed()
    }

    /// Closes the client and its store. Idempotent.
    ///
    /// Active subscriptions observe the closure at their next store call and
    /// terminate with an error signal.
    pub fn close(&self) -> DocfluxResult<()> {
        log::debug!("Closing docflux client");
        self.inner.collections.clear();
        self.inner.store.close()
    }
}

struct DocfluxInner {
    config: DocfluxConfig,
    store: StoreHandle,
    collections: DashMap<String, DocfluxCollection>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_lookup_is_cached() {
        let db = Docflux::builder().open().unwrap();
        let first = db.collection("users").unwrap();
        let second = db.collection("users").unwrap();
        assert_eq!(first.name(), second.name());
    }

    #[test]
    fn test_empty_collection_name_rejected() {
        let db = Docflux::builder().open().unwrap();
        let err = db.collection("  ").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidOperation);
    }

    #[test]
    fn test_close_is_idempotent() {
        let db = Docflux::builder().open().unwrap();
        db.close().unwrap();
        db.close().unwrap();
        assert!(db.is_closed());
    }

    #[test]
    fn test_closed_client_rejects_collections() {
        let db = Docflux::builder().open().unwrap();
        db.close().unwrap();
        let err = db.collection("users").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ConnectionFailure);
    }

    #[test]
    fn test_clones_share_state() {
        let db = Docflux::builder().open().unwrap();
        let clone = db.clone();
        db.close().unwrap();
        assert!(clone.is_closed());
    }
}
