//! Remote configuration client and image loading.

mod api;
mod client;
mod image;

#[allow(clippy::module_name_repetitions)]
pub use api::{ConfigApi, LocalConfigApi};
#[allow(clippy::module_name_repetitions)]
pub use client::ConfigClient;
pub use image::{EncodedImage, RasterDecoder, ImageDecoder, ImageFormat};
