//! `SettingsStore` backed by the TOML config file.

use std::path::PathBuf;

use anyhow::Result;
use moviedb_api::settings::SettingsStore;

use super::config::AppConfig;

/// Writes refreshed image base URLs into `[images] base_url`.
#[derive(Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct TomlSettingsStore {
    path: PathBuf,
}

impl TomlSettingsStore {
    /// Creates a store for the config file at `path`.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl SettingsStore for TomlSettingsStore {
    fn set_base_image_url(&self, url: &str) -> Result<()> {
        let mut config = AppConfig::load(&self.path)?;
        if config.images.base_url.as_deref() == Some(url) {
            return Ok(());
        }
        config.images.base_url = Some(String::from(url));
        config.save(&self.path)?;
        tracing::debug!(path = %self.path.display(), "image base URL persisted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_writes_base_url_and_keeps_other_settings() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = AppConfig::default();
        config.tmdb.language = String::from("fr-FR");
        config.save(&path).unwrap();
        let store = TomlSettingsStore::new(path.clone());

        // Act
        store
            .set_base_image_url("https://image.tmdb.org/t/p/")
            .unwrap();

        // Assert
        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(
            loaded.images.base_url.as_deref(),
            Some("https://image.tmdb.org/t/p/")
        );
        assert_eq!(loaded.tmdb.language, "fr-FR");
    }

    #[test]
    fn test_creates_missing_file() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("moviedb").join("config.toml");
        let store = TomlSettingsStore::new(path.clone());

        // Act
        store.set_base_image_url("https://cdn.example/").unwrap();

        // Assert
        assert!(path.exists());
    }
}
