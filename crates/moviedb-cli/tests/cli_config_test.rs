#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]

use assert_cmd::cargo_bin_cmd;
use predicates::prelude::{PredicateBooleanExt, predicate};

#[test]
fn test_config_refresh_help() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("moviedb");
    cmd.args(["config", "refresh", "--help"])
        .assert()
        .success();
}

#[test]
fn test_config_show_redacts_token() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "[tmdb]\napi_token = \"super-secret\"\nlanguage = \"de-DE\"\n",
    )
    .unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("moviedb");
    cmd.env("RUST_LOG", "info")
        .args(["--dir", dir.path().to_str().unwrap(), "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("de-DE"))
        .stdout(predicate::str::contains("super-secret").not());
}

#[test]
fn test_config_show_rejects_invalid_file() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.toml"), "[tmdb\n").unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("moviedb");
    cmd.args(["--dir", dir.path().to_str().unwrap(), "config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse"));
}
