//! API client library for moviedb.
//!
//! Provides the TMDB catalog client, the configuration client and the
//! transport they share.

/// Movie catalog client (listings, genres, detail, search).
pub mod catalog;
/// Remote configuration and image loading.
pub mod configuration;
/// Typed service errors.
pub mod error;
/// Image base URL cell.
pub mod settings;
/// Request descriptors and the HTTP transport.
pub mod transport;

pub use error::ServiceError;
