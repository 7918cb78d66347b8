use std::time::Duration;

use crate::docflux::Docflux;
use crate::docflux_config::DocfluxConfig;
use crate::errors::{DocfluxError, DocfluxResult};
use crate::store::memory::MemoryStore;
use crate::store::{StoreHandle, StoreProvider};

/// Builder for creating and configuring a docflux client.
///
/// `DocfluxBuilder` provides a fluent API for configuring the client before
/// opening it. It follows the builder pattern and captures errors during
/// configuration so they are propagated when the client opens.
///
/// # Examples
///
/// ```rust,ignore
/// use docflux::docflux::Docflux;
/// use std::time::Duration;
///
/// // An in-memory client with default settings
/// let db = Docflux::builder().open()?;
///
/// // A client with an operation timeout and a custom backend
/// let db = Docflux::builder()
///     .load_store(my_store)
///     .operation_timeout(Duration::from_secs(30))
///     .open()?;
/// ```
#[derive(Default)]
pub struct DocfluxBuilder {
    error: Option<DocfluxError>,
    config: DocfluxConfig,
}

impl DocfluxBuilder {
    /// Creates a new `DocfluxBuilder` with default configuration.
    ///
    /// Unless a store is loaded, opening falls back to the in-memory
    /// backend.
    pub fn new() -> Self {
        DocfluxBuilder {
            error: None,
            config: DocfluxConfig::new(),
        }
    }

    /// Loads a storage backend into the client.
    ///
    /// # Arguments
    ///
    /// * `store` - A type implementing `StoreProvider`
    pub fn load_store<T: StoreProvider + 'static>(mut self, store: T) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_store(StoreHandle::new(store)) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Sets the timeout after which a running operation fails its
    /// subscription with `ErrorKind::Timeout`.
    ///
    /// The timeout must be positive. Without one, operations wait
    /// indefinitely for consumer demand.
    pub fn operation_timeout(mut self, timeout: Duration) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_operation_timeout(timeout) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Opens the client, falling back to a fresh in-memory store when no
    /// backend was loaded.
    ///
    /// # Errors
    ///
    /// Returns the first error captured during configuration.
    pub fn open(self) -> DocfluxResult<Docflux> {
        if let Some(error) = self.error {
            return Err(error);
        }
        if self.config.store().is_err() {
            log::debug!("No store configured; defaulting to the in-memory backend");
            self.config
                .set_store(StoreHandle::new(MemoryStore::new()))?;
        }
        Docflux::new(self.config)
    }
}
