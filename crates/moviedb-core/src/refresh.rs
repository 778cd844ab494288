//! Configuration refresh.

use moviedb_api::ServiceError;
use moviedb_api::configuration::ConfigApi;
use tracing::instrument;

/// Receives "image URL updated" notifications.
pub trait Notifier: Send + Sync {
    /// Called once after a configuration fetch succeeded.
    fn image_url_updated(&self, url: &str);
}

/// Fetches the configuration and notifies on success.
///
/// The fetch itself updates the image base URL cell; scheduling is up to
/// the caller.
#[derive(Debug)]
pub struct ConfigRefresher<A, N> {
    api: A,
    notifier: N,
}

impl<A, N> ConfigRefresher<A, N>
where
    A: ConfigApi + Sync,
    N: Notifier,
{
    /// Creates a refresher.
    pub const fn new(api: A, notifier: N) -> Self {
        Self { api, notifier }
    }

    /// Runs one refresh and returns the new image base URL.
    ///
    /// # Errors
    ///
    /// Returns the configuration fetch error; nothing is notified then.
    #[instrument(skip_all)]
    pub async fn refresh(&self) -> Result<String, ServiceError> {
        match self.api.fetch_config().await {
            Ok(url) => {
                self.notifier.image_url_updated(&url);
                Ok(url)
            }
            Err(e) => {
                tracing::warn!(error = %e, "configuration refresh failed");
                Err(e)
            }
        }
    }
}
