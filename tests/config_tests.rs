// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for configuration module

use camera_control::backends::camera::CameraPosition;
use camera_control::errors::ConfigError;
use camera_control::{Config, FillMode, FlashMode};

#[test]
fn test_config_default() {
    let config = Config::default();

    assert_eq!(config.preferred_position, CameraPosition::Rear);
    assert_eq!(config.preview_fill_mode, FillMode::AspectFill);
    assert!(
        config.mirror_front_camera,
        "Front camera should be mirrored by default"
    );
    assert_eq!(config.flash_mode, FlashMode::Off);
    assert_eq!(config.preview_pixel_scale, 1.0);
}

#[test]
fn test_config_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.json");

    let config = Config {
        preferred_position: CameraPosition::Front,
        preview_fill_mode: FillMode::AspectFit,
        mirror_front_camera: false,
        flash_mode: FlashMode::Auto,
        draw_points_of_interest: true,
        preview_pixel_scale: 2.0,
    };
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let loaded = Config::load(&dir.path().join("absent.json")).unwrap();
    assert_eq!(loaded, Config::default());
}

#[test]
fn test_malformed_file_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(matches!(Config::load(&path), Err(ConfigError::Parse(_))));
}

#[test]
fn test_invalid_scale_is_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"preview_pixel_scale": 0.0}"#).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.preview_pixel_scale, 1.0);
}
