// SPDX-License-Identifier: MPL-2.0

//! Integration tests for configuration module

use visioncam::Config;
use visioncam::backends::camera::Facing;

#[test]
fn test_config_default() {
    let config = Config::default();

    assert!(
        config.mirror_preview,
        "Mirror preview should be enabled by default"
    );
    assert_eq!(config.preferred_facing, Facing::Back);
    assert_eq!(config.save_folder_name, "VisionCam");
}

#[test]
fn test_jpeg_quality_is_clamped() {
    let mut config = Config::default();

    config.jpeg_quality = 0;
    assert_eq!(config.effective_jpeg_quality(), 1);

    config.jpeg_quality = 255;
    assert_eq!(config.effective_jpeg_quality(), 100);

    config.jpeg_quality = 75;
    assert_eq!(config.effective_jpeg_quality(), 75);
}

#[test]
fn test_folder_name_cannot_escape_library() {
    let mut config = Config::default();

    config.save_folder_name = "../../etc".to_string();
    assert_eq!(config.effective_folder_name(), "....etc");

    config.save_folder_name = "..".to_string();
    assert_eq!(config.effective_folder_name(), "VisionCam");

    config.save_folder_name = "   ".to_string();
    assert_eq!(config.effective_folder_name(), "VisionCam");

    config.save_folder_name = " Holiday ".to_string();
    assert_eq!(config.effective_folder_name(), "Holiday");
}
