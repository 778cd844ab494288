//! `AppConfig` struct and TOML read/write.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable overriding `tmdb.api_token`.
pub const API_TOKEN_ENV: &str = "TMDB_API_TOKEN";

/// Placeholder shown instead of the API token.
const REDACTED: &str = "<redacted>";

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// TMDB API settings.
    #[serde(default)]
    pub tmdb: TmdbConfig,
    /// Image CDN settings.
    #[serde(default)]
    pub images: ImagesConfig,
}

/// `[tmdb]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TmdbConfig {
    /// Bearer token; `TMDB_API_TOKEN` takes precedence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    /// Response language.
    pub language: String,
    /// API base URL override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Per-request timeout in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            language: String::from("en-US"),
            base_url: None,
            request_timeout_secs: None,
        }
    }
}

/// `[images]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ImagesConfig {
    /// Last fetched image base URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Poster size segment.
    pub poster_size: String,
    /// Backdrop size segment.
    pub backdrop_size: String,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            poster_size: String::from("w500"),
            backdrop_size: String::from("w780"),
        }
    }
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }

    /// Resolves the API token, preferring `env_token` over the file.
    ///
    /// # Errors
    ///
    /// Returns an error if neither source provides a non-empty token.
    pub fn api_token(&self, env_token: Option<String>) -> Result<String> {
        let non_blank = |t: &String| !t.trim().is_empty();
        env_token
            .filter(non_blank)
            .or_else(|| self.tmdb.api_token.clone().filter(non_blank))
            .with_context(|| {
                format!("{API_TOKEN_ENV} environment variable or tmdb.api_token is required")
            })
    }

    /// Request timeout, if configured.
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.tmdb.request_timeout_secs.map(Duration::from_secs)
    }

    /// Copy with the API token masked, for display.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.tmdb.api_token.is_some() {
            copy.tmdb.api_token = Some(String::from(REDACTED));
        }
        copy
    }
}
