use moviedb_api::catalog::Genre;

/// View-ready movie record.
///
/// Built by the mapper from a raw `Movie` and the genre catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieDetailModel {
    /// TMDB movie ID.
    pub id: u64,
    /// Title.
    pub title: Option<String>,
    /// Poster image path.
    pub poster_path: Option<String>,
    /// Backdrop image path.
    pub backdrop_path: Option<String>,
    /// Vote average.
    pub rating: Option<f64>,
    /// Year part of the release date.
    pub release_year: Option<String>,
    /// Resolved genres, in the movie's order.
    pub genres: Vec<Genre>,
    /// Box office revenue.
    pub revenue: Option<u64>,
    /// Overview text.
    pub description: Option<String>,
    /// Runtime in minutes.
    pub runtime: Option<u32>,
    /// Display language.
    pub language: Option<String>,
    /// Homepage link.
    pub homepage: Option<String>,
}

impl MovieDetailModel {
    /// Genre names, in order.
    pub fn genre_names(&self) -> impl Iterator<Item = &str> {
        self.genres.iter().map(|g| g.name.as_str())
    }
}
