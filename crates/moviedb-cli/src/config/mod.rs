//! Application configuration module.
//!
//! Manages the TOML config file holding the TMDB credentials, language and
//! image settings, and persists refreshed image base URLs into it.

#[allow(clippy::module_inception)]
mod config;
mod paths;
mod store;

#[allow(clippy::module_name_repetitions)]
pub use config::{API_TOKEN_ENV, AppConfig};
pub use paths::resolve_config_path;
pub use store::TomlSettingsStore;
