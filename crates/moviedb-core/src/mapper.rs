//! Raw movie to `MovieDetailModel` mapping.

use moviedb_api::catalog::{Genre, Movie};

use crate::model::MovieDetailModel;

/// Maps a raw movie to its view model.
///
/// Genre ids come from `genre_ids`, or from the embedded `genres` when the
/// ids are absent. They are resolved against `genre_list` in the movie's
/// order; ids missing from the list are dropped. The language is
/// `language_override` when given, otherwise the movie's original language.
#[must_use]
pub fn map_to_detail(
    movie: &Movie,
    genre_list: &[Genre],
    language_override: Option<String>,
) -> MovieDetailModel {
    let genres = genre_ids(movie)
        .filter_map(|id| genre_list.iter().find(|g| g.id == id).cloned())
        .collect();

    MovieDetailModel {
        id: movie.id,
        title: movie.title.clone(),
        poster_path: movie.poster_path.clone(),
        backdrop_path: movie.backdrop_path.clone(),
        rating: movie.vote_average,
        release_year: movie.release_date.as_deref().and_then(release_year),
        genres,
        revenue: movie.revenue,
        description: movie.overview.clone(),
        runtime: movie.runtime,
        language: language_override.or_else(|| movie.original_language.clone()),
        homepage: movie.homepage.clone(),
    }
}

/// Maps every movie of a listing or search page.
#[must_use]
pub fn map_page(movies: &[Movie], genre_list: &[Genre]) -> Vec<MovieDetailModel> {
    movies
        .iter()
        .map(|movie| map_to_detail(movie, genre_list, None))
        .collect()
}

/// Maps a detail response, which embeds its own genres and spoken languages.
#[must_use]
pub fn map_movie_detail(movie: &Movie) -> MovieDetailModel {
    let genres = movie.genres.as_deref().unwrap_or_default();
    let language = movie
        .spoken_languages
        .as_ref()
        .and_then(|langs| langs.first())
        .map(|lang| lang.name.clone());
    map_to_detail(movie, genres, language)
}

/// Text before the first `-` of a release date.
///
/// `None` for an empty date or one without a `-`.
#[must_use]
pub fn release_year(date: &str) -> Option<String> {
    match date.split_once('-') {
        Some((year, _)) if !year.is_empty() => Some(String::from(year)),
        _ => None,
    }
}

fn genre_ids(movie: &Movie) -> Box<dyn Iterator<Item = u32> + '_> {
    match (&movie.genre_ids, &movie.genres) {
        (Some(ids), _) => Box::new(ids.iter().copied()),
        (None, Some(genres)) => Box::new(genres.iter().map(|g| g.id)),
        (None, None) => Box::new(std::iter::empty()),
    }
}
