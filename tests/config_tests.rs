// SPDX-License-Identifier: MPL-2.0

//! Integration tests for configuration module

use snapcam::Config;
use snapcam::backends::media_library::PicturesLibrary;

#[test]
fn test_config_default() {
    let config = Config::default();

    assert!(
        config.mirror_front_preview,
        "Front preview should be mirrored by default"
    );
    assert!(config.back_camera_path.is_none());
    assert!(config.front_camera_path.is_none());
    assert!(config.save_directory.is_none());
}

#[test]
fn test_library_uses_configured_directory() {
    let config = Config {
        save_directory: Some("/tmp/snapcam-config-test".to_string()),
        ..Config::default()
    };
    let library = PicturesLibrary::from_config(&config);
    assert_eq!(
        library.dir(),
        std::path::Path::new("/tmp/snapcam-config-test")
    );
}

#[test]
fn test_empty_save_directory_falls_back() {
    let config = Config {
        save_directory: Some(String::new()),
        ..Config::default()
    };
    let library = PicturesLibrary::from_config(&config);
    assert!(library.dir().ends_with("snapcam"));
}
