//! Integration tests for configuration loading
//!
//! Tests that verify config loading from files and environment variables.

use std::fs;

use serial_test::serial;
use tactile::config::AppConfig;

#[test]
#[serial]
fn test_env_override() {
    std::env::set_var("TCT_WINDOW__TITLE", "Test From Env");
    let config = AppConfig::load().unwrap();
    assert_eq!(config.window.title, "Test From Env");
    std::env::remove_var("TCT_WINDOW__TITLE");
}

#[test]
#[serial]
fn test_identity_from_env() {
    std::env::set_var("TCT_SESSION__IDENTITY", "bob");
    let config = AppConfig::load().unwrap();
    assert_eq!(config.session.identity.as_deref(), Some("bob"));
    std::env::remove_var("TCT_SESSION__IDENTITY");
}

#[test]
#[serial]
fn test_shipped_default_config() {
    std::env::remove_var("TCT_WINDOW__TITLE");

    let config = AppConfig::load_from("config").unwrap();
    assert_eq!(config.window.title, "Tactile");
    assert_eq!(config.scene.path, "assets/scenes/cube_grid.ron");
    assert!(config.sync.enabled);
}

#[test]
#[serial]
fn test_user_config_overrides_default() {
    std::env::remove_var("TCT_WINDOW__TITLE");

    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("default.toml"),
        "[window]\ntitle = \"Default\"\nwidth = 800\n\n[scene]\npath = \"assets/scenes/fruit_bowl.ron\"\n",
    )
    .unwrap();
    fs::write(dir.path().join("user.toml"), "[window]\ntitle = \"Mine\"\n").unwrap();

    let config = AppConfig::load_from(dir.path()).unwrap();
    assert_eq!(config.window.title, "Mine");
    assert_eq!(config.window.width, 800);
    assert_eq!(config.scene.path, "assets/scenes/fruit_bowl.ron");
}

#[test]
#[serial]
fn test_missing_config_dir_uses_defaults() {
    std::env::remove_var("TCT_WINDOW__TITLE");

    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig::load_from(dir.path().join("nowhere")).unwrap();
    assert_eq!(config.window.width, 1280);
    assert_eq!(config.rendering.max_particles, 20_000);
}
