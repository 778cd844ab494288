//! Single movie view-model.
//!
//! Text fields are published eagerly by `set_data`; the poster is only
//! fetched when `load_poster` is called.

use std::sync::Arc;

use moviedb_api::configuration::{ConfigApi, EncodedImage};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::model::MovieDetailModel;

/// Separator between genre names.
const GENRE_SEPARATOR: &str = " | ";

/// Display-ready text fields of one movie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemPresentation {
    /// Title, empty if unknown.
    pub title: String,
    /// Release year.
    pub release_year: Option<String>,
    /// Rating with one decimal.
    pub rating: Option<String>,
    /// Capitalized genre names joined with `" | "`.
    pub genres: String,
}

impl ItemPresentation {
    /// Builds the presentation of `model`.
    #[must_use]
    pub fn from_model(model: &MovieDetailModel) -> Self {
        let genres: Vec<String> = model.genre_names().map(capitalize_words).collect();
        Self {
            title: model.title.clone().unwrap_or_default(),
            release_year: model.release_year.clone(),
            rating: model.rating.map(|r| format!("{r:.1}")),
            genres: genres.join(GENRE_SEPARATOR),
        }
    }
}

/// Uppercases the first letter of every word and lowercases the rest.
fn capitalize_words(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// View-model of one movie cell.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct MovieItemViewModel<L> {
    loader: Arc<L>,
    model: Option<MovieDetailModel>,
    presentation: watch::Sender<Option<ItemPresentation>>,
    poster: Arc<watch::Sender<Option<EncodedImage>>>,
    poster_task: Option<JoinHandle<()>>,
}

impl<L> MovieItemViewModel<L>
where
    L: ConfigApi + Send + Sync + 'static,
{
    /// Creates an empty view-model loading posters through `loader`.
    #[must_use]
    pub fn new(loader: Arc<L>) -> Self {
        let (presentation, _) = watch::channel(None);
        let (poster, _) = watch::channel(None);
        Self {
            loader,
            model: None,
            presentation,
            poster: Arc::new(poster),
            poster_task: None,
        }
    }

    /// Binds `model` and publishes its text fields.
    ///
    /// A poster load in progress for the previous model is aborted.
    pub fn set_data(&mut self, model: MovieDetailModel) {
        self.abort_poster();
        self.poster.send_if_modified(|p| p.take().is_some());
        self.presentation
            .send_replace(Some(ItemPresentation::from_model(&model)));
        self.model = Some(model);
    }

    /// Fetches the poster of the bound model once.
    ///
    /// Failures are logged and otherwise ignored; the poster channel keeps
    /// its previous value.
    pub fn load_poster(&mut self) {
        self.abort_poster();
        let Some(path) = self.model.as_ref().and_then(|m| m.poster_path.clone()) else {
            tracing::debug!("no poster path to load");
            return;
        };
        let loader = Arc::clone(&self.loader);
        let poster = Arc::clone(&self.poster);
        self.poster_task = Some(tokio::spawn(async move {
            match loader.load_poster(&path).await {
                Ok(image) => {
                    poster.send_replace(Some(image));
                }
                Err(e) => tracing::debug!(%path, error = %e, "poster load failed"),
            }
        }));
    }

    /// Bound model, if any.
    #[must_use]
    pub const fn model(&self) -> Option<&MovieDetailModel> {
        self.model.as_ref()
    }

    /// Text fields of the bound model.
    #[must_use]
    pub fn presentation(&self) -> watch::Receiver<Option<ItemPresentation>> {
        self.presentation.subscribe()
    }

    /// Loaded poster.
    #[must_use]
    pub fn poster(&self) -> watch::Receiver<Option<EncodedImage>> {
        self.poster.subscribe()
    }

    fn abort_poster(&mut self) {
        if let Some(task) = self.poster_task.take() {
            task.abort();
        }
    }
}

impl<L> Drop for MovieItemViewModel<L> {
    fn drop(&mut self) {
        if let Some(task) = self.poster_task.take() {
            task.abort();
        }
    }
}
