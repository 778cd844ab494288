//! Aggregation state and its reducer.
//!
//! `AggregationState` never performs I/O. Triggers and fetch completions go
//! in, a list of `Effect`s comes out, and the engine actor executes them.

use moviedb_api::ServiceError;

use crate::messages;
use crate::model::MovieDetailModel;

/// What the accumulated list currently holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Listing pages.
    Listing,
    /// Search result pages for `query`.
    Searching {
        /// Active (trimmed) query.
        query: String,
    },
}

/// Consumer intents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// Restart the listing from page 1.
    Refresh,
    /// Fetch the page after the current one, in the current mode.
    LoadNextPage,
    /// Start a search.
    Search(String),
    /// Leave search mode and reload the listing.
    CancelSearch,
    /// Drop accumulated results without fetching.
    ClearResults,
    /// Fetch one movie's detail.
    LookupDetail(String),
}

/// Identifies an issued page fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTicket {
    /// Generation the fetch was issued in.
    pub generation: u64,
    /// Requested page.
    pub page: u32,
}

/// Where a page comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSource {
    /// Movie listing.
    Listing,
    /// Search results for the query.
    Search(String),
}

/// A fetched and mapped page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageDelta {
    /// Total pages reported by the response.
    pub total_pages: u32,
    /// Mapped movies, in server order.
    pub items: Vec<MovieDetailModel>,
}

/// Work requested by the reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Fetch a page and its genre catalog.
    FetchPage {
        /// Completion ticket.
        ticket: PageTicket,
        /// Listing or search.
        source: PageSource,
    },
    /// Fetch a movie detail.
    FetchDetail {
        /// Lookup sequence number.
        seq: u64,
        /// Trimmed movie id.
        id: String,
    },
    /// Publish the accumulated snapshot.
    PublishResults,
    /// Publish a loading flag change.
    PublishLoading(bool),
    /// Publish a user-facing error.
    PublishError(String),
    /// Publish a looked-up detail.
    PublishDetail(MovieDetailModel),
    /// Publish an empty-state message.
    PublishEmptyState(String),
}

/// Pagination position of the current generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageProgress {
    /// Last issued page.
    pub current_page: u32,
    /// Last reported total, unknown before the first page settles.
    pub total_pages: Option<u32>,
}

impl PageProgress {
    /// Whether `load_next_page` would issue a fetch once idle.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        match self.total_pages {
            Some(total) => self.current_page < total,
            None => true,
        }
    }
}

/// Pagination and accumulation state.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct AggregationState {
    current_page: u32,
    total_pages: Option<u32>,
    accumulated: Vec<MovieDetailModel>,
    mode: Mode,
    generation: u64,
    in_flight: Option<u32>,
    queued_next: bool,
    detail_seq: u64,
    detail_in_flight: Option<u64>,
    loading: bool,
}

impl Default for AggregationState {
    fn default() -> Self {
        Self::new()
    }
}

impl AggregationState {
    /// Initial state: page 0, nothing accumulated, listing mode.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            current_page: 0,
            total_pages: None,
            accumulated: Vec::new(),
            mode: Mode::Listing,
            generation: 0,
            in_flight: None,
            queued_next: false,
            detail_seq: 0,
            detail_in_flight: None,
            loading: false,
        }
    }

    /// Last issued page of the current generation.
    #[must_use]
    pub const fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Last `total_pages` reported in the current generation.
    #[must_use]
    pub const fn total_pages(&self) -> Option<u32> {
        self.total_pages
    }

    /// Current page and known total.
    #[must_use]
    pub const fn progress(&self) -> PageProgress {
        PageProgress {
            current_page: self.current_page,
            total_pages: self.total_pages,
        }
    }

    /// Movies accumulated so far, in request order.
    #[must_use]
    pub fn accumulated(&self) -> &[MovieDetailModel] {
        &self.accumulated
    }

    /// Current mode.
    #[must_use]
    pub const fn mode(&self) -> &Mode {
        &self.mode
    }

    /// Current generation.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a relevant fetch is outstanding.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Applies a consumer trigger.
    pub fn handle_trigger(&mut self, trigger: Trigger) -> Vec<Effect> {
        let mut effects = Vec::new();
        match trigger {
            Trigger::Refresh => self.restart(Mode::Listing, &mut effects),
            Trigger::LoadNextPage => self.load_next_page(&mut effects),
            Trigger::Search(query) => self.search(&query, &mut effects),
            Trigger::CancelSearch => {
                self.reset(Mode::Listing);
                self.restart(Mode::Listing, &mut effects);
            }
            Trigger::ClearResults => {
                self.reset(self.mode.clone());
                effects.push(Effect::PublishResults);
            }
            Trigger::LookupDetail(id) => self.lookup_detail(&id, &mut effects),
        }
        self.sync_loading(&mut effects);
        effects
    }

    /// Applies a finished page fetch.
    pub fn handle_page(
        &mut self,
        ticket: PageTicket,
        result: Result<PageDelta, ServiceError>,
    ) -> Vec<Effect> {
        if ticket.generation != self.generation || self.in_flight != Some(ticket.page) {
            tracing::debug!(
                generation = ticket.generation,
                page = ticket.page,
                "dropping stale page"
            );
            return Vec::new();
        }
        self.in_flight = None;

        let mut effects = Vec::new();
        let follow_up = match result {
            Ok(delta) => {
                self.total_pages = Some(delta.total_pages);
                if ticket.page > delta.total_pages {
                    tracing::debug!(
                        page = ticket.page,
                        total_pages = delta.total_pages,
                        "page past the end, discarded"
                    );
                    self.current_page = self.current_page.saturating_sub(1);
                } else {
                    self.accumulated.extend(delta.items);
                    effects.push(Effect::PublishResults);
                }
                if matches!(self.mode, Mode::Searching { .. }) && self.accumulated.is_empty() {
                    effects.push(Effect::PublishEmptyState(String::from(
                        messages::EMPTY_SEARCH,
                    )));
                }
                self.queued_next
            }
            Err(e) => {
                tracing::warn!(page = ticket.page, error = %e, "page fetch failed");
                self.current_page = self.current_page.saturating_sub(1);
                effects.push(Effect::PublishError(String::from(
                    messages::REQUEST_FAILED,
                )));
                false
            }
        };
        self.queued_next = false;
        if follow_up {
            self.load_next_page(&mut effects);
        }
        self.sync_loading(&mut effects);
        effects
    }

    /// Applies a finished detail lookup.
    pub fn handle_detail(
        &mut self,
        seq: u64,
        result: Result<MovieDetailModel, ServiceError>,
    ) -> Vec<Effect> {
        if self.detail_in_flight != Some(seq) {
            tracing::debug!(seq, "dropping superseded detail");
            return Vec::new();
        }
        self.detail_in_flight = None;

        let mut effects = Vec::new();
        match result {
            Ok(model) => effects.push(Effect::PublishDetail(model)),
            Err(e) => {
                tracing::warn!(error = %e, "detail lookup failed");
                effects.push(Effect::PublishError(String::from(
                    messages::detail_failure(&e),
                )));
            }
        }
        self.sync_loading(&mut effects);
        effects
    }

    /// Starts a new generation in `mode` with nothing accumulated.
    fn reset(&mut self, mode: Mode) {
        self.generation = self.generation.wrapping_add(1);
        self.accumulated.clear();
        self.current_page = 0;
        self.total_pages = None;
        self.in_flight = None;
        self.queued_next = false;
        self.mode = mode;
    }

    /// Resets into `mode`, publishes the empty snapshot and fetches page 1.
    fn restart(&mut self, mode: Mode, effects: &mut Vec<Effect>) {
        self.reset(mode);
        effects.push(Effect::PublishResults);
        self.issue_next(effects);
    }

    fn load_next_page(&mut self, effects: &mut Vec<Effect>) {
        if self.in_flight.is_some() {
            tracing::debug!(page = self.current_page, "next page coalesced");
            self.queued_next = true;
            return;
        }
        if let Some(total) = self.total_pages
            && self.current_page >= total
        {
            tracing::debug!(total_pages = total, "no more pages");
            return;
        }
        self.issue_next(effects);
    }

    fn search(&mut self, query: &str, effects: &mut Vec<Effect>) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }
        let same_query = matches!(&self.mode, Mode::Searching { query: active } if active == query);
        if same_query && (self.in_flight.is_some() || !self.accumulated.is_empty()) {
            tracing::debug!(query, "query unchanged");
            return;
        }
        self.restart(
            Mode::Searching {
                query: String::from(query),
            },
            effects,
        );
    }

    fn lookup_detail(&mut self, id: &str, effects: &mut Vec<Effect>) {
        let id = id.trim();
        if id.is_empty() {
            effects.push(Effect::PublishError(String::from(
                messages::INVALID_MOVIE_ID,
            )));
            return;
        }
        self.detail_seq = self.detail_seq.wrapping_add(1);
        self.detail_in_flight = Some(self.detail_seq);
        effects.push(Effect::FetchDetail {
            seq: self.detail_seq,
            id: String::from(id),
        });
    }

    fn issue_next(&mut self, effects: &mut Vec<Effect>) {
        self.current_page = self.current_page.saturating_add(1);
        self.in_flight = Some(self.current_page);
        let source = match &self.mode {
            Mode::Listing => PageSource::Listing,
            Mode::Searching { query } => PageSource::Search(query.clone()),
        };
        effects.push(Effect::FetchPage {
            ticket: PageTicket {
                generation: self.generation,
                page: self.current_page,
            },
            source,
        });
    }

    fn sync_loading(&mut self, effects: &mut Vec<Effect>) {
        let loading = self.in_flight.is_some() || self.detail_in_flight.is_some();
        if loading != self.loading {
            self.loading = loading;
            effects.push(Effect::PublishLoading(loading));
        }
    }
}
