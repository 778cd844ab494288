//! Transport module.
//!
//! Maps request descriptors onto TMDB API v3 and image CDN URLs and
//! returns raw response bodies.

mod api;
mod http;
mod request;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTransport, Transport};
#[allow(clippy::module_name_repetitions)]
pub use http::{DEFAULT_IMAGE_BASE_URL, HttpTransport, HttpTransportBuilder};
pub use request::ApiRequest;
