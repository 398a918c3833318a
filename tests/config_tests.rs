// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for configuration loading and saving

use depth_tracker::{AppError, Config};
use nalgebra::Vector3;
use std::path::PathBuf;

fn temp_config_path() -> PathBuf {
    std::env::temp_dir()
        .join(format!("depth_tracker_{}", uuid::Uuid::new_v4()))
        .join("config.json")
}

#[test]
fn test_missing_file_gives_defaults() {
    let config = Config::load(&temp_config_path()).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_save_then_load() {
    let path = temp_config_path();
    let mut config = Config::default();
    config.tracker.threshold = 55;
    config.tracker.up = Vector3::new(0.0, -1.0, 0.0);
    config.tracker.rotation_deg = 12.5;
    config.presence_cells = 32;
    config.playback_fps = Some(15.0);

    config.save(&path).unwrap();
    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded, config);

    if let Some(dir) = path.parent() {
        std::fs::remove_dir_all(dir).ok();
    }
}

#[test]
fn test_invalid_file_is_rejected() {
    let path = temp_config_path();
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();

    std::fs::write(&path, r#"{ "tracker": { "up": [0.0, 0.0, 0.0] } }"#).unwrap();
    assert!(matches!(Config::load(&path), Err(AppError::Config(_))));

    std::fs::write(&path, "not json").unwrap();
    assert!(matches!(Config::load(&path), Err(AppError::Config(_))));

    if let Some(dir) = path.parent() {
        std::fs::remove_dir_all(dir).ok();
    }
}
