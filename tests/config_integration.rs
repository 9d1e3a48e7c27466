//! Integration tests for configuration loading
//!
//! Tests that verify config loading from files and environment variables.

use polis::config::AppConfig;
use serial_test::serial;

#[test]
#[serial]
fn test_env_override() {
    std::env::set_var("POLIS_WINDOW__TITLE", "Test From Env");
    let config = AppConfig::load().unwrap();
    assert_eq!(config.window.title, "Test From Env");
    std::env::remove_var("POLIS_WINDOW__TITLE");
}

#[test]
#[serial]
fn test_nested_env_override() {
    std::env::set_var("POLIS_PLAYER__MOVE_SPEED", "4.5");
    let config = AppConfig::load().unwrap();
    assert_eq!(config.player.move_speed, 4.5);
    std::env::remove_var("POLIS_PLAYER__MOVE_SPEED");
}

#[test]
#[serial]
fn test_default_file_loading() {
    std::env::remove_var("POLIS_WINDOW__TITLE");
    std::env::remove_var("POLIS_PLAYER__MOVE_SPEED");

    let config = AppConfig::load().unwrap();
    // Values from config/default.toml match the compiled-in defaults
    assert_eq!(config.player.height, 1.7);
    assert_eq!(config.player.radius, 0.3);
    assert_eq!(config.world.ground_level, 0.0);
}

#[test]
#[serial]
fn test_missing_config_dir_falls_back_to_defaults() {
    let config = AppConfig::load_from("does_not_exist").unwrap();
    assert_eq!(config.player.jump_strength, 5.5);
    assert_eq!(config.window.width, 1280);
}
