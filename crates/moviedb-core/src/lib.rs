//! Data orchestration for moviedb.
//!
//! Turns catalog pages into view-ready models, accumulates them across
//! pages and searches, and exposes the results as tokio channels.

/// Pagination and aggregation engine.
pub mod engine;
/// Single-item view-model with lazy poster loading.
pub mod item;
/// Raw-to-view model mapping.
pub mod mapper;
/// User-facing messages.
pub mod messages;
/// View-ready movie model.
pub mod model;
/// Configuration refresh with notification.
pub mod refresh;
/// Loading and error signals.
pub mod signals;

pub use engine::MoviesEngine;
pub use item::{ItemPresentation, MovieItemViewModel};
pub use model::MovieDetailModel;
pub use refresh::{ConfigRefresher, Notifier};
pub use signals::SignalBus;
