//! TMDB catalog response types.

use serde::Deserialize;

// --- Listing / Search ---

/// One page of `movie/upcoming` or `search/movie` results.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MoviesPage {
    /// Current page number.
    #[serde(default)]
    pub page: u32,
    /// Movies on this page, in server order.
    pub results: Vec<Movie>,
    /// Total number of pages.
    pub total_pages: u32,
    /// Total number of results.
    #[serde(default)]
    pub total_results: Option<u32>,
}

// --- Movie ---

/// Raw movie record, as received from listing, search or detail endpoints.
///
/// Listing and search results carry `genre_ids`; detail responses carry
/// `genres`, `revenue`, `runtime`, `spoken_languages` and `homepage`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Movie {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: Option<String>,
    /// Poster image path.
    pub poster_path: Option<String>,
    /// Backdrop image path.
    pub backdrop_path: Option<String>,
    /// Vote average.
    pub vote_average: Option<f64>,
    /// Release date (YYYY-MM-DD, may be empty).
    pub release_date: Option<String>,
    /// Genre IDs (listing and search responses).
    pub genre_ids: Option<Vec<u32>>,
    /// Embedded genres (detail responses).
    pub genres: Option<Vec<Genre>>,
    /// Box office revenue.
    pub revenue: Option<u64>,
    /// Overview text.
    pub overview: Option<String>,
    /// Runtime in minutes.
    pub runtime: Option<u32>,
    /// Original language (ISO 639-1).
    pub original_language: Option<String>,
    /// Spoken languages (detail responses).
    pub spoken_languages: Option<Vec<SpokenLanguage>>,
    /// Homepage link.
    pub homepage: Option<String>,
}

/// Spoken language entry of a movie detail.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SpokenLanguage {
    /// ISO 639-1 code.
    #[serde(default)]
    pub iso_639_1: Option<String>,
    /// Language name.
    pub name: String,
}

// --- Genres ---

/// Genre entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Genre {
    /// Genre ID.
    pub id: u32,
    /// Genre name.
    pub name: String,
}

impl Genre {
    /// Creates a genre.
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Response from `genre/movie/list`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GenreListResponse {
    /// Full genre catalog.
    pub genres: Vec<Genre>,
}
