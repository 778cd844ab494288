//! `Transport` trait definition.
#![allow(clippy::future_not_send)]

use super::request::ApiRequest;
use crate::error::ServiceError;

/// Executes request descriptors and returns raw response bytes.
///
/// Abstracts the network for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(Transport: Send)]
pub trait LocalTransport {
    /// Executes one request. Resolves exactly once.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::TransportFailure` if the request cannot be sent
    /// or the server answers with a non-success status.
    async fn execute(&self, request: &ApiRequest) -> Result<Vec<u8>, ServiceError>;
}
