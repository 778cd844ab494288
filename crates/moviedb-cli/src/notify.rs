//! Notification sink for configuration refreshes.

use moviedb_core::Notifier;

/// Reports image base URL updates through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn image_url_updated(&self, url: &str) {
        tracing::info!("Image base URL updated: {}", url);
    }
}
