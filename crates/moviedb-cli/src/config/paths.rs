//! Config file location.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Directory name under the config root.
const APP_DIR: &str = "moviedb";

/// File name inside the config directory.
const CONFIG_FILE: &str = "config.toml";

/// Resolves the config file path.
///
/// Resolution order: `{dir}/config.toml` when `dir` is given, then
/// `$XDG_CONFIG_HOME/moviedb/config.toml`, then
/// `~/.config/moviedb/config.toml`.
///
/// # Errors
///
/// Returns an error if neither `dir`, `XDG_CONFIG_HOME` nor `HOME` is available.
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.join(CONFIG_FILE));
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return Ok(under_config_root(Path::new(&xdg)));
    }

    let home = std::env::var("HOME").context("HOME environment variable is not set")?;
    Ok(under_config_root(&PathBuf::from(home).join(".config")))
}

fn under_config_root(root: &Path) -> PathBuf {
    root.join(APP_DIR).join(CONFIG_FILE)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_explicit_dir_wins() {
        // Arrange
        let dir = PathBuf::from("/tmp/moviedb-test");

        // Act
        let path = resolve_config_path(Some(&dir)).unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("/tmp/moviedb-test/config.toml"));
    }

    #[test]
    fn test_default_ends_with_app_dir() {
        // Arrange & Act
        let path = resolve_config_path(None).unwrap();

        // Assert
        assert!(path.ends_with("moviedb/config.toml"));
    }

    #[test]
    fn test_under_config_root() {
        // Act
        let path = under_config_root(Path::new("/home/user/.config"));

        // Assert
        assert_eq!(path, PathBuf::from("/home/user/.config/moviedb/config.toml"));
    }
}
