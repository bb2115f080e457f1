// SPDX-License-Identifier: MPL-2.0

//! Integration tests for constants module

use quickshot::constants::{QualityPreset, photo};

#[test]
fn test_quality_preset_values() {
    // Test that all presets exist (Standard, High, Maximum)
    assert_eq!(QualityPreset::ALL.len(), 3);
    assert_eq!(QualityPreset::default(), QualityPreset::High);
    assert_eq!(
        QualityPreset::High.jpeg_quality(),
        photo::DEFAULT_JPEG_QUALITY
    );
}

#[test]
fn test_quality_preset_ordering() {
    // Presets are ordered from lowest to highest quality
    let mut prev = 0u8;
    for preset in QualityPreset::ALL {
        let quality = preset.jpeg_quality();
        assert!(
            quality > prev,
            "Presets should be ordered from lowest to highest"
        );
        assert!(quality <= 100);
        prev = quality;
    }
}

#[test]
fn test_nearest_round_trips_preset_values() {
    for preset in QualityPreset::ALL {
        assert_eq!(QualityPreset::nearest(preset.jpeg_quality()), preset);
        assert_eq!(QualityPreset::ALL[preset.index()], preset);
    }
}

#[test]
fn test_capture_file_naming_constants() {
    assert!(photo::FILE_PREFIX.ends_with('_'));
    assert_eq!(photo::FILE_EXTENSION, "jpg");
}
