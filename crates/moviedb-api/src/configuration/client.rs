//! `ConfigClient` - configuration fetch and image loading over a `Transport`.

use serde::Deserialize;
use tracing::instrument;

use super::api::ConfigApi;
use super::image::{EncodedImage, ImageDecoder};
use crate::error::ServiceError;
use crate::settings::ImageUrlWriter;
use crate::transport::{ApiRequest, Transport};

/// `configuration` response, reduced to the part this client reads.
#[derive(Debug, Deserialize)]
struct ConfigurationResponse {
    images: Option<ImagesConfiguration>,
}

/// `images` object of the configuration document.
#[derive(Debug, Deserialize)]
struct ImagesConfiguration {
    secure_base_url: Option<String>,
}

/// Configuration client.
///
/// Owns the only `ImageUrlWriter`: a successful `fetch_config` is the one
/// place the image base URL changes.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct ConfigClient<T, D> {
    transport: T,
    decoder: D,
    image_base: ImageUrlWriter,
}

impl<T, D> ConfigClient<T, D> {
    /// Creates a client writing fetched base URLs to `image_base`.
    pub const fn new(transport: T, decoder: D, image_base: ImageUrlWriter) -> Self {
        Self {
            transport,
            decoder,
            image_base,
        }
    }

    /// Extracts `images.secure_base_url` from a configuration document.
    pub(crate) fn parse_base_url(body: &[u8]) -> Result<String, ServiceError> {
        let response: ConfigurationResponse = serde_json::from_slice(body).map_err(|e| {
            ServiceError::InvalidFormat(format!("failed to decode configuration: {e}"))
        })?;
        response
            .images
            .and_then(|images| images.secure_base_url)
            .ok_or_else(|| {
                ServiceError::InvalidFormat(String::from(
                    "configuration has no images.secure_base_url",
                ))
            })
    }
}

impl<T: Transport + Sync, D: ImageDecoder> ConfigClient<T, D> {
    async fn load_image(&self, request: ApiRequest) -> Result<EncodedImage, ServiceError> {
        let body = self.transport.execute(&request).await?;
        self.decoder.decode(body).ok_or_else(|| {
            ServiceError::InvalidFormat(format!("{} is not a supported image", request.label()))
        })
    }
}

impl<T: Transport + Sync, D: ImageDecoder> ConfigApi for ConfigClient<T, D> {
    #[instrument(skip_all)]
    async fn fetch_config(&self) -> Result<String, ServiceError> {
        let body = self.transport.execute(&ApiRequest::Configuration).await?;
        let base_url = Self::parse_base_url(&body)?;
        self.image_base.set(&base_url).await;
        tracing::debug!(%base_url, "image base URL updated");
        Ok(base_url)
    }

    #[instrument(skip_all, fields(path = path))]
    async fn load_poster(&self, path: &str) -> Result<EncodedImage, ServiceError> {
        self.load_image(ApiRequest::PosterImage {
            path: String::from(path),
        })
        .await
    }

    #[instrument(skip_all, fields(path = path))]
    async fn load_backdrop(&self, path: &str) -> Result<EncodedImage, ServiceError> {
        self.load_image(ApiRequest::BackdropImage {
            path: String::from(path),
        })
        .await
    }
}
