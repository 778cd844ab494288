//! Messages published on the error and empty-state channels.

use moviedb_api::ServiceError;

/// Published when a search yields no results.
pub const EMPTY_SEARCH: &str = "No movies found";

/// Published when a detail lookup is given an unusable id.
pub const INVALID_MOVIE_ID: &str = "Invalid Movie id";

/// Published for every other failed request.
pub const REQUEST_FAILED: &str = "Something went wrong. Please try again";

/// Message for a failed detail lookup.
#[must_use]
pub const fn detail_failure(err: &ServiceError) -> &'static str {
    if err.is_invalid_parameters() {
        INVALID_MOVIE_ID
    } else {
        REQUEST_FAILED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_failure_messages() {
        // Arrange
        let invalid = ServiceError::InvalidParameters(String::from("movie id must not be empty"));
        let offline = ServiceError::TransportFailure(String::from("connection refused"));
        let garbled = ServiceError::InvalidFormat(String::from("expected object"));

        // Act & Assert
        assert_eq!(detail_failure(&invalid), INVALID_MOVIE_ID);
        assert_eq!(detail_failure(&offline), REQUEST_FAILED);
        assert_eq!(detail_failure(&garbled), REQUEST_FAILED);
    }
}
