// SPDX-License-Identifier: GPL-3.0-only

//! Application state management

use crate::app::notice::NoticeSlot;
use crate::app::screen::Screen;
use crate::backends::camera::types::{BackendError, CameraFrame, Facing, ImageRef, PermissionVerdict};
use crate::backends::camera::{CameraProvider, FeedRef};
use crate::config::Config;
use crate::constants::QualityPreset;
use cosmic::cosmic_config;
use cosmic::widget::about::About;
use cosmic::widget::image;
use std::sync::Arc;

/// Context drawer pages
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub enum ContextPage {
    #[default]
    About,
    Settings,
}

/// The application model stores app-specific state used to describe its interface and
/// drive its logic.
pub struct AppModel {
    /// Application state which is managed by the COSMIC runtime.
    pub core: cosmic::Core,
    /// Display a context drawer with the designated page if defined.
    pub context_page: ContextPage,
    /// About page widget
    pub about: About,
    /// Configuration data that persists between application runs.
    pub config: Config,
    /// Config handler for saving settings
    pub config_handler: Option<cosmic_config::Config>,
    /// Camera screen state machine
    pub screen: Screen,
    /// Platform camera capability
    pub provider: Arc<dyn CameraProvider>,
    /// Latest preview frame, ready for the image widget
    pub preview: Option<image::Handle>,
    /// Decoded image shown in the review overlay
    pub review_image: Option<image::Handle>,
    /// Capture failure notice
    pub notice: NoticeSlot,
    /// Theme dropdown labels, in [`crate::config::AppTheme::ALL`] order
    pub theme_options: Vec<String>,
    /// Quality dropdown labels, in [`QualityPreset::ALL`] order
    pub quality_options: Vec<String>,
}

impl AppModel {
    /// Index of the current quality preset in the settings dropdown
    pub fn quality_index(&self) -> usize {
        QualityPreset::nearest(self.config.effective_jpeg_quality()).index()
    }

    /// Index of the current theme in the settings dropdown
    pub fn theme_index(&self) -> usize {
        self.config.app_theme.index()
    }
}

/// Messages emitted by the application and its widgets.
#[derive(Debug, Clone)]
pub enum Message {
    // ===== Screen lifecycle =====
    /// Window is closing; late results must be dropped
    Unmount,
    /// Permission request finished
    PermissionResolved(PermissionVerdict),

    // ===== Camera feed =====
    /// Feed for the given facing produced its first frame
    FeedAttached(Facing, FeedRef),
    /// Feed for the given facing ended
    FeedDetached(Facing),
    /// New preview frame from the feed for the given facing
    CameraFrame(Facing, Arc<CameraFrame>),

    // ===== Capture =====
    /// Toggle front/back camera
    FlipCamera,
    /// Shutter pressed
    Shutter,
    /// Still capture finished
    CaptureFinished(Result<ImageRef, BackendError>),
    /// Close the review overlay
    DismissReview,
    /// Hide the notice with this serial
    HideNotice(u64),

    // ===== UI Navigation =====
    /// Open external URL (repository, etc.)
    LaunchUrl(String),
    /// Toggle context drawer page (About, Settings)
    ToggleContextPage(ContextPage),

    // ===== Settings =====
    /// Config changed on disk
    UpdateConfig(Config),
    /// Select theme from dropdown
    SelectAppTheme(usize),
    /// Select JPEG quality preset from dropdown
    SelectQualityPreset(usize),

    /// Background task finished with nothing to apply
    Noop,
}
