//! `CatalogApi` trait definition.
#![allow(clippy::future_not_send)]

use super::types::{Genre, Movie, MoviesPage};
use crate::error::ServiceError;

/// Movie catalog operations.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(CatalogApi: Send)]
pub trait LocalCatalogApi {
    /// Fetches one page of the movie listing.
    ///
    /// # Errors
    ///
    /// `InvalidParameters` if `page` is 0, otherwise transport or decode failures.
    async fn fetch_listing(&self, page: u32) -> Result<MoviesPage, ServiceError>;

    /// Fetches the full genre catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or JSON decoding fails.
    async fn fetch_genres(&self) -> Result<Vec<Genre>, ServiceError>;

    /// Fetches the detail record of one movie.
    ///
    /// # Errors
    ///
    /// `InvalidParameters` if `id` is blank, otherwise transport or decode failures.
    async fn fetch_detail(&self, id: &str) -> Result<Movie, ServiceError>;

    /// Searches movies by free text.
    ///
    /// # Errors
    ///
    /// `InvalidParameters` if `query` is blank or `page` is 0, otherwise
    /// transport or decode failures.
    async fn search(&self, query: &str, page: u32) -> Result<MoviesPage, ServiceError>;
}
