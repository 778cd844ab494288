//! Image base URL cell.
//!
//! The configuration client is the only writer; the HTTP transport and
//! anything else that builds image URLs hold readers.

use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::watch;

/// Persistence hook for the image base URL.
///
/// Write-only from the client's point of view. Implementations decide where
/// the value is stored (the CLI writes it back into its TOML config) and may
/// block; `ImageUrlWriter::set` runs them on the blocking pool.
pub trait SettingsStore: Send + Sync {
    /// Persists a freshly fetched image base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be persisted.
    fn set_base_image_url(&self, url: &str) -> Result<()>;
}

/// Constructor for the writer/reader pair.
#[derive(Debug)]
pub struct ImageBaseUrl;

impl ImageBaseUrl {
    /// Creates a cell seeded with `initial` (e.g. a previously persisted value).
    #[must_use]
    #[allow(clippy::new_ret_no_self)]
    pub fn new(initial: Option<String>) -> (ImageUrlWriter, ImageUrlReader) {
        let (tx, rx) = watch::channel(initial);
        (
            ImageUrlWriter { tx, store: None },
            ImageUrlReader { rx },
        )
    }
}

/// Sole writer of the image base URL cell. Not `Clone`.
pub struct ImageUrlWriter {
    tx: watch::Sender<Option<String>>,
    store: Option<Arc<dyn SettingsStore>>,
}

impl fmt::Debug for ImageUrlWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageUrlWriter")
            .field("current", &*self.tx.borrow())
            .field("persisted", &self.store.is_some())
            .finish()
    }
}

impl ImageUrlWriter {
    /// Attaches a persistence hook invoked on every successful write.
    #[must_use]
    pub fn with_store(mut self, store: impl SettingsStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Publishes a new base URL to every reader and persists it.
    ///
    /// Readers see the value before the store runs. Persistence happens on
    /// the blocking pool; failures are logged.
    pub async fn set(&self, url: &str) {
        self.tx.send_replace(Some(String::from(url)));
        let Some(store) = self.store.clone() else {
            return;
        };
        let url = String::from(url);
        match tokio::task::spawn_blocking(move || store.set_base_image_url(&url)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!(error = %e, "failed to persist image base URL"),
            Err(e) => tracing::warn!(error = %e, "image base URL persistence task failed"),
        }
    }

    /// Creates another reader for this cell.
    #[must_use]
    pub fn reader(&self) -> ImageUrlReader {
        ImageUrlReader {
            rx: self.tx.subscribe(),
        }
    }
}

/// Read handle on the image base URL cell.
#[derive(Debug, Clone)]
pub struct ImageUrlReader {
    rx: watch::Receiver<Option<String>>,
}

impl ImageUrlReader {
    /// Returns the current base URL, if one has been configured.
    #[must_use]
    pub fn get(&self) -> Option<String> {
        self.rx.borrow().clone()
    }
}
