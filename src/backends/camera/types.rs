// SPDX-License-Identifier: GPL-3.0-only
// Shared types for camera backend abstraction

//! Shared types for camera backends

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Which way the camera faces relative to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Facing {
    /// Rear camera (world-facing)
    #[default]
    Back,
    /// Front camera (user-facing)
    Front,
}

impl Facing {
    /// The other direction
    pub fn flipped(self) -> Self {
        match self {
            Facing::Back => Facing::Front,
            Facing::Front => Facing::Back,
        }
    }

    /// Value libcamera reports in `api.libcamera.location` for this direction
    pub fn location(self) -> &'static str {
        match self {
            Facing::Back => "back",
            Facing::Front => "front",
        }
    }
}

impl std::fmt::Display for Facing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.location())
    }
}

impl std::str::FromStr for Facing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "back" | "rear" => Ok(Facing::Back),
            "front" | "user" => Ok(Facing::Front),
            other => Err(format!("unknown facing direction '{}'", other)),
        }
    }
}

/// Outcome of a camera access request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionVerdict {
    Granted,
    Denied,
}

/// Represents a camera device
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CameraDevice {
    pub name: String,
    /// Path to capture device (`pipewire-serial-N`, `pipewire-N`, or empty for auto-select)
    pub path: String,
    /// PipeWire node ID, used to query extra node properties
    pub node_id: Option<String>,
    /// Camera location: "front", "back", or "external"
    pub location: Option<String>,
}

impl CameraDevice {
    /// Placeholder that lets PipeWire pick its default camera
    pub fn auto_select() -> Self {
        Self {
            name: "Default Camera (PipeWire)".to_string(),
            path: String::new(),
            node_id: None,
            location: None,
        }
    }

    /// Whether the device reports the given facing as its location
    pub fn faces(&self, facing: Facing) -> bool {
        self.location
            .as_deref()
            .is_some_and(|loc| loc.eq_ignore_ascii_case(facing.location()))
    }
}

/// A single RGBA frame from the camera
#[derive(Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA pixels (`width * height * 4` bytes)
    pub data: Arc<[u8]>,
    /// Timestamp when frame was captured (for latency diagnostics)
    pub captured_at: Instant,
}

impl CameraFrame {
    /// Expected byte length for the frame dimensions
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

impl std::fmt::Debug for CameraFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraFrame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// Reference to a captured still image
///
/// Holds a `file://` URI. The URI is the identity of the capture; the path is
/// only recovered when the image needs to be loaded for display.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageRef {
    uri: String,
}

impl ImageRef {
    /// Reference a local file
    pub fn from_path(path: &Path) -> Self {
        Self {
            uri: format!("file://{}", path.display()),
        }
    }

    /// Wrap an existing URI
    pub fn from_uri(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Local filesystem path, if this is a `file://` URI
    pub fn to_file_path(&self) -> Option<PathBuf> {
        self.uri.strip_prefix("file://").map(PathBuf::from)
    }
}

impl std::fmt::Display for ImageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.uri)
    }
}

/// Frame receiver type for preview streams
pub type FrameReceiver = futures::channel::mpsc::Receiver<CameraFrame>;

/// Frame sender type for preview streams
pub type FrameSender = futures::channel::mpsc::Sender<CameraFrame>;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Error types for backend operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Backend is not available on this system
    NotAvailable(String),
    /// Failed to initialize backend
    InitializationFailed(String),
    /// Camera device not found
    DeviceNotFound(String),
    /// The user or the platform refused camera access
    PermissionDenied,
    /// The feed this handle belonged to has been torn down
    FeedClosed,
    /// The feed has not produced a frame yet
    NoFrameAvailable,
    /// xdg-desktop-portal request failed
    Portal(String),
    /// General I/O error
    IoError(String),
    /// Other errors
    Other(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::NotAvailable(msg) => write!(f, "Backend not available: {}", msg),
            BackendError::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            BackendError::DeviceNotFound(msg) => write!(f, "Device not found: {}", msg),
            BackendError::PermissionDenied => write!(f, "Camera access denied"),
            BackendError::FeedClosed => write!(f, "Camera feed closed"),
            BackendError::NoFrameAvailable => write!(f, "No frame available for capture"),
            BackendError::Portal(msg) => write!(f, "Portal error: {}", msg),
            BackendError::IoError(msg) => write!(f, "I/O error: {}", msg),
            BackendError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        BackendError::IoError(err.to_string())
    }
}

impl From<zbus::Error> for BackendError {
    fn from(err: zbus::Error) -> Self {
        BackendError::Portal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facing_flip_is_involution() {
        assert_eq!(Facing::default(), Facing::Back);
        assert_eq!(Facing::Back.flipped(), Facing::Front);
        assert_eq!(Facing::Back.flipped().flipped(), Facing::Back);
    }

    #[test]
    fn test_facing_parse() {
        assert_eq!("front".parse::<Facing>(), Ok(Facing::Front));
        assert_eq!(" Back ".parse::<Facing>(), Ok(Facing::Back));
        assert!("sideways".parse::<Facing>().is_err());
    }

    #[test]
    fn test_image_ref_path_round_trip() {
        let path = Path::new("/tmp/quickshot/IMG_1.jpg");
        let image = ImageRef::from_path(path);
        assert_eq!(image.uri(), "file:///tmp/quickshot/IMG_1.jpg");
        assert_eq!(image.to_file_path().as_deref(), Some(path));
    }

    #[test]
    fn test_image_ref_non_file_uri_has_no_path() {
        let image = ImageRef::from_uri("content://media/42");
        assert_eq!(image.to_file_path(), None);
    }

    #[test]
    fn test_device_location_match_is_case_insensitive() {
        let device = CameraDevice {
            name: "Front Sensor".into(),
            path: "pipewire-serial-7".into(),
            node_id: Some("41".into()),
            location: Some("Front".into()),
        };
        assert!(device.faces(Facing::Front));
        assert!(!device.faces(Facing::Back));
        assert!(!CameraDevice::auto_select().faces(Facing::Back));
    }
}
