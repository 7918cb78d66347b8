//! Configuration management for the docflux client.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use crate::errors::{DocfluxError, DocfluxResult, ErrorKind};
use crate::store::StoreHandle;

/// Public interface for client configuration.
///
/// Configuration is write-once: the builder assigns the store backend and the
/// optional operation timeout before the client opens, and the values are
/// immutable afterwards.
///
/// # Examples
///
/// ```rust,ignore
/// use docflux::docflux::Docflux;
/// use std::time::Duration;
///
/// let db = Docflux::builder()
///     .operation_timeout(Duration::from_secs(30))
///     .open()?;
/// ```
#[derive(Clone, Default)]
pub struct DocfluxConfig {
    /// The pointer to implementation. Uses Arc for cheap cloning and thread
    /// safety.
    inner: Arc<DocfluxConfigInner>,
}

impl DocfluxConfig {
    /// Creates a new configuration instance with no values assigned.
    pub fn new() -> Self {
        DocfluxConfig {
            inner: Arc::new(DocfluxConfigInner {
                store: OnceLock::new(),
                operation_timeout: OnceLock::new(),
            }),
        }
    }

    /// Returns the configured store backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration has not been initialized by the
    /// builder.
    pub fn store(&self) -> DocfluxResult<StoreHandle> {
        match self.inner.store.get() {
            Some(store) => Ok(store.clone()),
            None => {
                log::error!("Store has not been configured");
                Err(DocfluxError::new(
                    "Store has not been configured",
                    ErrorKind::InvalidOperation,
                ))
            }
        }
    }

    /// Returns the configured operation timeout, if any.
    pub fn operation_timeout(&self) -> Option<Duration> {
        self.inner.operation_timeout.get().copied()
    }

    /// Assigns the store backend.
    ///
    /// # Errors
    ///
    /// Returns an error if a store has already been configured.
    pub(crate) fn set_store(&self, store: StoreHandle) -> DocfluxResult<()> {
        if self.inner.store.set(store).is_err() {
            log::error!("Store has already been configured");
            return Err(DocfluxError::new(
                "Store has already been configured",
                ErrorKind::InvalidOperation,
            ));
        }
        Ok(())
    }

    /// Assigns the operation timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if a timeout has already been configured or the
    /// duration is zero.
    pub(crate) fn set_operation_timeout(&self, timeout: Duration) -> DocfluxResult<()> {
        if timeout.is_zero() {
            log::error!("Operation timeout must be positive");
            return Err(DocfluxError::new(
                "Operation timeout must be positive",
                ErrorKind::InvalidOperation,
            ));
        }
        if self.inner.operation_timeout.set(timeout).is_err() {
            log::error!("Operation timeout has already been configured");
            return Err(DocfluxError::new(
                "Operation timeout has already been configured",
                ErrorKind::InvalidOperation,
            ));
        }
        Ok(())
    }
}

#[derive(Default)]
struct DocfluxConfigInner {
    store: OnceLock<StoreHandle>,
    operation_timeout: OnceLock<Duration>,
}
