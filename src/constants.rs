// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// JPEG quality presets offered in the settings drawer
///
/// The config stores the raw quality value so hand-tuned values survive;
/// the presets are only the values the UI offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QualityPreset {
    /// Smaller files, visible compression on detailed scenes
    Standard,
    /// Balanced quality and file size (default)
    #[default]
    High,
    /// Minimal compression
    Maximum,
}

impl QualityPreset {
    /// All preset variants for UI iteration, lowest quality first
    pub const ALL: [QualityPreset; 3] = [
        QualityPreset::Standard,
        QualityPreset::High,
        QualityPreset::Maximum,
    ];

    /// JPEG quality value (1-100)
    pub fn jpeg_quality(&self) -> u8 {
        match self {
            QualityPreset::Standard => 80,
            QualityPreset::High => photo::DEFAULT_JPEG_QUALITY,
            QualityPreset::Maximum => 98,
        }
    }

    /// Preset closest to an arbitrary quality value
    pub fn nearest(quality: u8) -> Self {
        Self::ALL
            .into_iter()
            .min_by_key(|preset| preset.jpeg_quality().abs_diff(quality))
            .unwrap_or_default()
    }

    /// Position in [`QualityPreset::ALL`]
    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|p| p == self).unwrap_or(0)
    }
}

/// Still photo constants
pub mod photo {
    /// JPEG quality used when the config has no override
    pub const DEFAULT_JPEG_QUALITY: u8 = 92;

    /// Filename prefix for captured stills
    pub const FILE_PREFIX: &str = "IMG_";

    /// Extension for captured stills
    pub const FILE_EXTENSION: &str = "jpg";

    /// Timestamp format used in capture file names (millisecond resolution)
    pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S_%3f";

    /// Directory under the user cache dir that holds captured stills
    pub const CAPTURE_SUBDIR: &str = "captures";
}

/// UI dimension constants
pub mod ui {
    /// Capture button size (outer)
    pub const CAPTURE_BUTTON_OUTER: f32 = 60.0;

    /// Capture button size (inner)
    pub const CAPTURE_BUTTON_INNER: f32 = 50.0;

    /// Capture button border radius
    pub const CAPTURE_BUTTON_RADIUS: f32 = 25.0;

    /// Scale applied to the capture button while a capture is pending
    pub const CAPTURE_BUTTON_BUSY_SCALE: f32 = 0.85;

    /// Flip button size
    pub const FLIP_BUTTON_SIZE: f32 = 52.0;

    /// Flip icon size
    pub const FLIP_ICON_SIZE: u16 = 32;

    /// Close icon size on the review overlay
    pub const CLOSE_ICON_SIZE: u16 = 40;

    /// Overlay button/container background transparency (0.0 = transparent, 1.0 = opaque)
    ///
    /// Used for semi-transparent backgrounds on buttons overlaid on the camera preview.
    pub const OVERLAY_BACKGROUND_ALPHA: f32 = 0.6;

    /// Review overlay backdrop transparency
    pub const REVIEW_BACKDROP_ALPHA: f32 = 0.92;

    /// Bottom margin of the control row over the preview
    pub const CONTROLS_BOTTOM_PADDING: u16 = 50;

    /// Horizontal margin of the control row
    pub const CONTROLS_SIDE_PADDING: u16 = 30;

    /// Minimum window size
    pub const MIN_WINDOW_WIDTH: f32 = 360.0;
    pub const MIN_WINDOW_HEIGHT: f32 = 240.0;
}

/// GStreamer pipeline constants
pub mod pipeline {
    /// Maximum buffer queue size (keep small for low latency)
    pub const MAX_BUFFERS: u32 = 2;

    /// Output pixel format for appsink
    /// RGBA so frames can go straight into an image handle and the JPEG encoder
    pub const OUTPUT_FORMAT: &str = "RGBA";

    /// Capacity of the frame channel between the appsink and the UI
    pub const PREVIEW_CHANNEL_CAPACITY: usize = 8;

    /// Capacity of the subscription channel feeding messages to the UI
    pub const SUBSCRIPTION_CHANNEL_CAPACITY: usize = 100;

    /// Get number of threads for videoconvert based on available CPU threads
    pub fn videoconvert_threads() -> u32 {
        std::thread::available_parallelism()
            .map(|n| n.get() as u32)
            .unwrap_or(4)
    }
}

/// Timing constants
pub mod timing {
    use super::Duration;

    /// Frame counter modulo for periodic logging
    pub const FRAME_LOG_INTERVAL: u64 = 30;

    /// Pipeline state change timeout on stop
    pub const STOP_TIMEOUT_SECS: u64 = 2;

    /// Pipeline playing state timeout on start
    pub const START_TIMEOUT_SECS: u64 = 5;

    /// How long the feed subscription waits before reopening a failed feed
    pub const FEED_RETRY_DELAY: Duration = Duration::from_secs(5);

    /// Poll interval while waiting on the frame channel, so cancellation is noticed
    pub const FRAME_POLL_INTERVAL: Duration = Duration::from_millis(16);

    /// How long a capture failure notice stays on screen
    pub const NOTICE_DURATION: Duration = Duration::from_secs(3);

    /// How long the CLI waits for the first frame before giving up
    pub const CLI_FIRST_FRAME_TIMEOUT: Duration = Duration::from_secs(10);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_preset() {
        assert_eq!(QualityPreset::nearest(92), QualityPreset::High);
        assert_eq!(QualityPreset::nearest(10), QualityPreset::Standard);
        assert_eq!(QualityPreset::nearest(100), QualityPreset::Maximum);
        assert_eq!(QualityPreset::nearest(95), QualityPreset::High);
    }
}
