// SPDX-License-Identifier: MPL-2.0

//! Integration tests for configuration module

use quickshot::Config;
use quickshot::config::AppTheme;

#[test]
fn test_config_default() {
    let config = Config::default();

    assert_eq!(config.jpeg_quality, 92, "Default JPEG quality should be 92");
    assert_eq!(config.app_theme, AppTheme::System);
}

#[test]
fn test_effective_quality_is_clamped() {
    // Hand-edited configs can carry out-of-range values
    let mut config = Config::default();

    config.jpeg_quality = 0;
    assert_eq!(config.effective_jpeg_quality(), 1);

    config.jpeg_quality = 250;
    assert_eq!(config.effective_jpeg_quality(), 100);

    config.jpeg_quality = 75;
    assert_eq!(config.effective_jpeg_quality(), 75);
}

#[test]
fn test_theme_index_matches_dropdown_order() {
    for (i, theme) in AppTheme::ALL.iter().enumerate() {
        assert_eq!(theme.index(), i);
    }
}
