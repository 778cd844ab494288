//! `ConfigApi` trait definition.
#![allow(clippy::future_not_send)]

use super::image::EncodedImage;
use crate::error::ServiceError;

/// Remote configuration and image loading.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(ConfigApi: Send)]
pub trait LocalConfigApi {
    /// Fetches the configuration and returns the secure image base URL.
    ///
    /// # Errors
    ///
    /// `InvalidFormat` if `images.secure_base_url` is missing,
    /// `TransportFailure` on network errors.
    async fn fetch_config(&self) -> Result<String, ServiceError>;

    /// Loads a poster image.
    ///
    /// # Errors
    ///
    /// Returns an error if the download fails or the payload is not an image.
    async fn load_poster(&self, path: &str) -> Result<EncodedImage, ServiceError>;

    /// Loads a backdrop image.
    ///
    /// # Errors
    ///
    /// Returns an error if the download fails or the payload is not an image.
    async fn load_backdrop(&self, path: &str) -> Result<EncodedImage, ServiceError>;
}
