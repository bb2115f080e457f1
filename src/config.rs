// SPDX-License-Identifier: GPL-3.0-only

use crate::constants::photo;
use cosmic::cosmic_config::{self, CosmicConfigEntry, cosmic_config_derive::CosmicConfigEntry};
use cosmic::{Theme, theme};
use serde::{Deserialize, Serialize};

/// Application theme preference
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum AppTheme {
    /// Follow system theme (dark or light based on system setting)
    #[default]
    System,
    /// Always use dark theme
    Dark,
    /// Always use light theme
    Light,
}

impl AppTheme {
    /// All variants in settings dropdown order
    pub const ALL: [AppTheme; 3] = [AppTheme::System, AppTheme::Dark, AppTheme::Light];

    /// Get the COSMIC theme for this app theme preference
    pub fn theme(&self) -> Theme {
        match self {
            Self::Dark => {
                let mut theme = theme::system_dark();
                theme.theme_type.prefer_dark(Some(true));
                theme
            }
            Self::Light => {
                let mut theme = theme::system_light();
                theme.theme_type.prefer_dark(Some(false));
                theme
            }
            Self::System => theme::system_preference(),
        }
    }

    /// Position in [`AppTheme::ALL`]
    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|t| t == self).unwrap_or(0)
    }
}

/// User settings persisted through cosmic-config.
///
/// Only preferences live here. Screen state (facing, captures) is never
/// persisted, so every launch starts on the back camera.
#[derive(Debug, Clone, CosmicConfigEntry, Eq, PartialEq, Serialize, Deserialize)]
#[version = 1]
pub struct Config {
    /// Application theme preference (System, Dark, Light)
    pub app_theme: AppTheme,
    /// JPEG quality for captured stills (1-100)
    pub jpeg_quality: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_theme: AppTheme::default(),
            jpeg_quality: photo::DEFAULT_JPEG_QUALITY,
        }
    }
}

impl Config {
    /// JPEG quality clamped to the range the encoder accepts.
    ///
    /// Hand-edited config files can carry 0 or values above 100.
    pub fn effective_jpeg_quality(&self) -> u8 {
        self.jpeg_quality.clamp(1, 100)
    }

    /// Load the config from cosmic-config, falling back to defaults.
    ///
    /// Returns the handler (if one could be created) so settings changes can be written back.
    pub fn load(app_id: &str) -> (Option<cosmic_config::Config>, Self) {
        match cosmic_config::Config::new(app_id, Self::VERSION) {
            Ok(handler) => {
                let config = match Self::get_entry(&handler) {
                    Ok(config) => config,
                    Err((errors, config)) => {
                        tracing::error!(?errors, "Errors loading config");
                        config
                    }
                };
                (Some(handler), config)
            }
            Err(err) => {
                tracing::error!(%err, "Failed to create config handler");
                (None, Self::default())
            }
        }
    }
}
