// SPDX-License-Identifier: GPL-3.0-only

//! Message update handling
//!
//! `update()` only dispatches; the handling code lives in the `handlers`
//! submodules:
//!
//! - `handlers::camera`: permission verdict, feed attach/detach, frames, flip
//! - `handlers::capture`: shutter, capture results, review overlay, notices
//! - `handlers::system`: config and settings
//! - `handlers::ui`: context drawer and links

use crate::app::state::{AppModel, Message};
use cosmic::Task;

impl AppModel {
    /// Main message handler - routes messages to handler methods.
    pub fn update(&mut self, message: Message) -> Task<cosmic::Action<Message>> {
        match message {
            // ===== Screen lifecycle =====
            Message::Unmount => self.handle_unmount(),
            Message::PermissionResolved(verdict) => self.handle_permission_resolved(verdict),

            // ===== Camera feed =====
            Message::FeedAttached(facing, handle) => self.handle_feed_attached(facing, handle),
            Message::FeedDetached(facing) => self.handle_feed_detached(facing),
            Message::CameraFrame(facing, frame) => self.handle_camera_frame(facing, frame),

            // ===== Capture =====
            Message::FlipCamera => self.handle_flip_camera(),
            Message::Shutter => self.handle_shutter(),
            Message::CaptureFinished(result) => self.handle_capture_finished(result),
            Message::DismissReview => self.handle_dismiss_review(),
            Message::HideNotice(serial) => self.handle_hide_notice(serial),

            // ===== UI Navigation =====
            Message::LaunchUrl(url) => self.handle_launch_url(url),
            Message::ToggleContextPage(page) => self.handle_toggle_context_page(page),

            // ===== Settings =====
            Message::UpdateConfig(config) => self.handle_update_config(config),
            Message::SelectAppTheme(index) => self.handle_select_app_theme(index),
            Message::SelectQualityPreset(index) => self.handle_select_quality_preset(index),

            Message::Noop => Task::none(),
        }
    }
}
