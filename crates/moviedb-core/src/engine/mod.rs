//! Pagination and aggregation engine.
//!
//! `MoviesEngine` is a handle on an actor task that owns the
//! `AggregationState`. Trigger methods enqueue onto an unbounded channel;
//! page and detail fetches run as tasks in a `JoinSet` and report back to
//! the actor, which is the only place the state changes.

mod state;

use std::sync::Arc;

use moviedb_api::ServiceError;
use moviedb_api::catalog::CatalogApi;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::{JoinHandle, JoinSet};

use crate::mapper::{map_movie_detail, map_page};
use crate::model::MovieDetailModel;
use crate::signals::SignalBus;

pub use state::{
    AggregationState, Effect, Mode, PageDelta, PageProgress, PageSource, PageTicket, Trigger,
};

/// Buffered detail and empty-state events per subscriber.
const EVENT_CAPACITY: usize = 16;

/// Result of a fetch task.
#[derive(Debug)]
enum Completion {
    Page(PageTicket, Result<PageDelta, ServiceError>),
    Detail(u64, Result<MovieDetailModel, ServiceError>),
}

/// Handle on the engine actor.
///
/// Dropping the handle stops the actor and aborts every outstanding fetch.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct MoviesEngine {
    triggers: mpsc::UnboundedSender<Trigger>,
    results: watch::Receiver<Vec<MovieDetailModel>>,
    progress: watch::Receiver<PageProgress>,
    details: broadcast::Sender<MovieDetailModel>,
    empty_state: broadcast::Sender<String>,
    signals: SignalBus,
    actor: JoinHandle<()>,
}

impl MoviesEngine {
    /// Spawns the actor on the current tokio runtime.
    ///
    /// Nothing is fetched until the first trigger.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn spawn<C>(catalog: Arc<C>, signals: SignalBus) -> Self
    where
        C: CatalogApi + Send + Sync + 'static,
    {
        let (triggers, trigger_rx) = mpsc::unbounded_channel();
        let (results_tx, results) = watch::channel(Vec::new());
        let (progress_tx, progress) = watch::channel(PageProgress::default());
        let (details, _) = broadcast::channel(EVENT_CAPACITY);
        let (empty_state, _) = broadcast::channel(EVENT_CAPACITY);

        let actor = Actor {
            catalog,
            state: AggregationState::new(),
            fetches: JoinSet::new(),
            results: results_tx,
            progress: progress_tx,
            details: details.clone(),
            empty_state: empty_state.clone(),
            signals: signals.clone(),
        };
        let actor = tokio::spawn(actor.run(trigger_rx));

        Self {
            triggers,
            results,
            progress,
            details,
            empty_state,
            signals,
            actor,
        }
    }

    /// Reloads the listing from page 1.
    pub fn refresh(&self) {
        self.send(Trigger::Refresh);
    }

    /// Loads the next page of the current listing or search.
    pub fn load_next_page(&self) {
        self.send(Trigger::LoadNextPage);
    }

    /// Searches for `query`. Blank or unchanged queries are ignored.
    pub fn search(&self, query: impl Into<String>) {
        self.send(Trigger::Search(query.into()));
    }

    /// Leaves search mode and reloads the listing.
    pub fn cancel_search(&self) {
        self.send(Trigger::CancelSearch);
    }

    /// Drops the accumulated results without fetching.
    pub fn clear_results(&self) {
        self.send(Trigger::ClearResults);
    }

    /// Looks up one movie's detail; the result arrives on `details()`.
    pub fn lookup_detail(&self, id: impl Into<String>) {
        self.send(Trigger::LookupDetail(id.into()));
    }

    /// Accumulated results, replaced as a whole on every change.
    #[must_use]
    pub fn results(&self) -> watch::Receiver<Vec<MovieDetailModel>> {
        self.results.clone()
    }

    /// Pagination position, updated before the effects of each step run.
    #[must_use]
    pub fn progress(&self) -> watch::Receiver<PageProgress> {
        self.progress.clone()
    }

    /// Detail lookup results.
    #[must_use]
    pub fn details(&self) -> broadcast::Receiver<MovieDetailModel> {
        self.details.subscribe()
    }

    /// Loading flag changes.
    #[must_use]
    pub fn loading(&self) -> broadcast::Receiver<bool> {
        self.signals.loading()
    }

    /// User-facing error messages.
    #[must_use]
    pub fn errors(&self) -> broadcast::Receiver<String> {
        self.signals.errors()
    }

    /// Empty search notices.
    #[must_use]
    pub fn empty_state(&self) -> broadcast::Receiver<String> {
        self.empty_state.subscribe()
    }

    fn send(&self, trigger: Trigger) {
        if self.triggers.send(trigger).is_err() {
            tracing::debug!("engine actor has stopped");
        }
    }
}

impl Drop for MoviesEngine {
    fn drop(&mut self) {
        self.actor.abort();
    }
}

/// Owns the state and executes effects.
struct Actor<C> {
    catalog: Arc<C>,
    state: AggregationState,
    fetches: JoinSet<Completion>,
    results: watch::Sender<Vec<MovieDetailModel>>,
    progress: watch::Sender<PageProgress>,
    details: broadcast::Sender<MovieDetailModel>,
    empty_state: broadcast::Sender<String>,
    signals: SignalBus,
}

impl<C> Actor<C>
where
    C: CatalogApi + Send + Sync + 'static,
{
    async fn run(mut self, mut triggers: mpsc::UnboundedReceiver<Trigger>) {
        loop {
            tokio::select! {
                trigger = triggers.recv() => {
                    let Some(trigger) = trigger else { break };
                    let effects = self.state.handle_trigger(trigger);
                    self.step(effects);
                }
                Some(joined) = self.fetches.join_next() => match joined {
                    Ok(Completion::Page(ticket, result)) => {
                        let effects = self.state.handle_page(ticket, result);
                        self.step(effects);
                    }
                    Ok(Completion::Detail(seq, result)) => {
                        let effects = self.state.handle_detail(seq, result);
                        self.step(effects);
                    }
                    Err(e) => tracing::warn!(error = %e, "fetch task did not complete"),
                },
            }
        }
        tracing::debug!("engine actor stopped");
    }

    fn step(&mut self, effects: Vec<Effect>) {
        let progress = self.state.progress();
        self.progress.send_if_modified(|current| {
            let changed = *current != progress;
            *current = progress;
            changed
        });
        self.apply(effects);
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchPage { ticket, source } => {
                    let catalog = Arc::clone(&self.catalog);
                    self.fetches.spawn(async move {
                        let result = fetch_page(catalog, ticket.page, source).await;
                        Completion::Page(ticket, result)
                    });
                }
                Effect::FetchDetail { seq, id } => {
                    let catalog = Arc::clone(&self.catalog);
                    self.fetches.spawn(async move {
                        let result = catalog
                            .fetch_detail(&id)
                            .await
                            .map(|movie| map_movie_detail(&movie));
                        Completion::Detail(seq, result)
                    });
                }
                Effect::PublishResults => {
                    self.results
                        .send_replace(self.state.accumulated().to_vec());
                }
                Effect::PublishLoading(loading) => self.signals.publish_loading(loading),
                Effect::PublishError(message) => self.signals.publish_error(message),
                Effect::PublishDetail(model) => {
                    let _ = self.details.send(model);
                }
                Effect::PublishEmptyState(message) => {
                    let _ = self.empty_state.send(message);
                }
            }
        }
    }
}

/// Fetches a page and the genre catalog concurrently and maps the page.
async fn fetch_page<C>(
    catalog: Arc<C>,
    page: u32,
    source: PageSource,
) -> Result<PageDelta, ServiceError>
where
    C: CatalogApi + Send + Sync + 'static,
{
    let movies = async {
        match &source {
            PageSource::Listing => catalog.fetch_listing(page).await,
            PageSource::Search(query) => catalog.search(query, page).await,
        }
    };
    let (movies, genres) = futures::try_join!(movies, catalog.fetch_genres())?;
    Ok(PageDelta {
        total_pages: movies.total_pages,
        items: map_page(&movies.results, &genres),
    })
}
