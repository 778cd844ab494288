//! Loading and error signals shared by the engine and its consumers.

use tokio::sync::broadcast;

/// Buffered signals per subscriber before the oldest are dropped.
const SIGNAL_CAPACITY: usize = 64;

/// Broadcasts the loading flag and user-facing error messages.
///
/// Signals are transient: a subscriber only sees what is published after it
/// subscribed, and publishing with no subscriber is not an error.
#[derive(Debug, Clone)]
pub struct SignalBus {
    loading: broadcast::Sender<bool>,
    errors: broadcast::Sender<String>,
}

impl Default for SignalBus {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalBus {
    /// Creates a bus with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        let (loading, _) = broadcast::channel(SIGNAL_CAPACITY);
        let (errors, _) = broadcast::channel(SIGNAL_CAPACITY);
        Self { loading, errors }
    }

    /// Publishes the loading flag.
    pub fn publish_loading(&self, loading: bool) {
        let _ = self.loading.send(loading);
    }

    /// Publishes a user-facing error message.
    pub fn publish_error(&self, message: impl Into<String>) {
        let _ = self.errors.send(message.into());
    }

    /// Subscribes to loading flag changes.
    #[must_use]
    pub fn loading(&self) -> broadcast::Receiver<bool> {
        self.loading.subscribe()
    }

    /// Subscribes to error messages.
    #[must_use]
    pub fn errors(&self) -> broadcast::Receiver<String> {
        self.errors.subscribe()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[tokio::test]
    async fn test_subscribers_see_published_signals() {
        // Arrange
        let bus = SignalBus::new();
        let mut loading = bus.loading();
        let mut errors = bus.errors();

        // Act
        bus.publish_loading(true);
        bus.publish_error("Something went wrong. Please try again");
        bus.publish_loading(false);

        // Assert
        assert!(loading.recv().await.unwrap());
        assert!(!loading.recv().await.unwrap());
        assert_eq!(
            errors.recv().await.unwrap(),
            "Something went wrong. Please try again"
        );
    }

    #[test]
    fn test_publish_without_subscribers_is_silent() {
        // Arrange
        let bus = SignalBus::new();

        // Act
        bus.publish_loading(true);
        bus.publish_error("ignored");
        let mut late = bus.errors();

        // Assert
        assert!(late.try_recv().is_err());
    }

    #[test]
    fn test_clones_share_channels() {
        // Arrange
        let bus = SignalBus::new();
        let mut errors = bus.errors();
        let clone = bus.clone();

        // Act
        clone.publish_error("Invalid Movie id");

        // Assert
        assert_eq!(errors.try_recv().unwrap(), "Invalid Movie id");
    }
}
