// SPDX-License-Identifier: GPL-3.0-only

//! Settings handlers

use crate::app::state::{AppModel, Message};
use crate::config::AppTheme;
use crate::constants::QualityPreset;
use cosmic::Task;
use cosmic::cosmic_config::CosmicConfigEntry;
use tracing::{error, info};

impl AppModel {
    pub(crate) fn handle_update_config(
        &mut self,
        config: crate::config::Config,
    ) -> Task<cosmic::Action<Message>> {
        info!("UpdateConfig received");
        let theme_changed = config.app_theme != self.config.app_theme;
        self.config = config;
        self.provider
            .set_jpeg_quality(self.config.effective_jpeg_quality());

        if theme_changed {
            cosmic::command::set_theme(self.config.app_theme.theme())
        } else {
            Task::none()
        }
    }

    pub(crate) fn handle_select_app_theme(&mut self, index: usize) -> Task<cosmic::Action<Message>> {
        let Some(&app_theme) = AppTheme::ALL.get(index) else {
            return Task::none();
        };

        info!(?app_theme, "Setting application theme");
        self.config.app_theme = app_theme;
        self.save_config("app theme");

        cosmic::command::set_theme(app_theme.theme())
    }

    pub(crate) fn handle_select_quality_preset(
        &mut self,
        index: usize,
    ) -> Task<cosmic::Action<Message>> {
        let Some(preset) = QualityPreset::ALL.get(index) else {
            return Task::none();
        };

        let quality = preset.jpeg_quality();
        info!(?preset, quality, "Setting JPEG quality");
        self.config.jpeg_quality = quality;
        self.provider.set_jpeg_quality(quality);
        self.save_config("JPEG quality");
        Task::none()
    }

    fn save_config(&self, what: &str) {
        if let Some(handler) = self.config_handler.as_ref()
            && let Err(err) = self.config.write_entry(handler)
        {
            error!(?err, setting = what, "Failed to save setting");
        }
    }
}
