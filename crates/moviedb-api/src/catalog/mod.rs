//! Movie catalog client module.
//!
//! Fetches listing pages, the genre catalog, movie details and search
//! results from TMDB API v3.

mod api;
mod client;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{CatalogApi, LocalCatalogApi};
#[allow(clippy::module_name_repetitions)]
pub use client::CatalogClient;
pub use types::{Genre, Movie, MoviesPage, SpokenLanguage};
