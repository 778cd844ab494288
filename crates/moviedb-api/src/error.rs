//! `ServiceError` - failure kinds shared by every client.

use thiserror::Error;

/// Failure branch of every single-shot service call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(clippy::module_name_repetitions)]
pub enum ServiceError {
    /// The network or transport layer failed (connection, HTTP status).
    #[error("transport failure: {0}")]
    TransportFailure(String),
    /// The response body does not have the expected shape.
    #[error("invalid response format: {0}")]
    InvalidFormat(String),
    /// The caller passed arguments the service cannot accept.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

impl ServiceError {
    /// Builds a `TransportFailure` from anything displayable.
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::TransportFailure(err.to_string())
    }

    /// Builds an `InvalidFormat` from anything displayable.
    pub fn format(err: impl std::fmt::Display) -> Self {
        Self::InvalidFormat(err.to_string())
    }

    /// Returns `true` for `InvalidParameters`.
    #[must_use]
    pub const fn is_invalid_parameters(&self) -> bool {
        matches!(self, Self::InvalidParameters(_))
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        Self::transport(err)
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        Self::format(err)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_display_includes_kind_and_message() {
        // Arrange
        let err = ServiceError::InvalidParameters(String::from("page must be positive"));

        // Act
        let text = err.to_string();

        // Assert
        assert_eq!(text, "invalid parameters: page must be positive");
    }

    #[test]
    fn test_json_error_maps_to_invalid_format() {
        // Arrange
        let raw: Result<u32, _> = serde_json::from_str("not json");

        // Act
        let err = ServiceError::from(raw.unwrap_err());

        // Assert
        assert!(matches!(err, ServiceError::InvalidFormat(_)));
        assert!(!err.is_invalid_parameters());
    }
}
