// SPDX-License-Identifier: MPL-2.0

//! Camera backend abstraction
//!
//! The UI never talks to PipeWire or the portal directly. It holds a
//! [`CameraProvider`] and works with the [`Feed`]s it opens.
//!
//! ```text
//! ┌─────────────────────┐
//! │   UI Layer (App)    │
//! └──────────┬──────────┘
//!            │ request_permission / open_feed
//!            ▼
//! ┌─────────────────────┐
//! │  CameraProvider     │  ← injected capability, faked in tests
//! └──────────┬──────────┘
//!            │
//!            ▼
//!       ┌────────┐       ┌────────────────────┐
//!       │PipeWire│ ────▶ │ FeedHandle::capture│
//!       └────────┘       └────────────────────┘
//! ```

pub mod permission;
pub mod pipewire;
pub mod types;

pub use types::*;

use futures::future::BoxFuture;
use std::sync::Arc;

/// Platform camera capability
///
/// Implementations must be cheap to share: the UI keeps one behind an `Arc`
/// and hands clones to async tasks and subscriptions.
pub trait CameraProvider: Send + Sync {
    /// Ask the platform for camera access
    ///
    /// Resolves once with a definitive verdict. Errors mean the request
    /// could not be completed; the caller decides how to treat them.
    fn request_permission(&self) -> BoxFuture<'static, BackendResult<PermissionVerdict>>;

    /// Open a live feed for the given facing direction
    ///
    /// The returned [`Feed`] keeps the underlying capture running until it is dropped.
    fn open_feed(&self, facing: Facing) -> BackendResult<Feed>;

    /// Cameras this provider can open
    fn enumerate_cameras(&self) -> Vec<CameraDevice>;

    /// JPEG quality for captures taken from now on, including on open feeds
    fn set_jpeg_quality(&self, _quality: u8) {}
}

/// Capture operations bound to one live feed
pub trait FeedHandle: Send + Sync + std::fmt::Debug {
    /// Direction of the feed this handle belongs to
    fn facing(&self) -> Facing;

    /// Capture a still frame and return a reference to the stored image
    ///
    /// Single-shot and not cancellable once issued.
    fn capture(&self) -> BoxFuture<'static, BackendResult<ImageRef>>;
}

/// Shared reference to a feed handle, as stored in screen state
pub type FeedRef = Arc<dyn FeedHandle>;

/// A running camera feed
pub struct Feed {
    /// Capture handle, shared with the UI once the first frame arrives
    pub handle: FeedRef,
    /// Live preview frames
    pub frames: FrameReceiver,
    /// Keeps the underlying pipeline alive; dropping it stops the camera
    guard: Box<dyn Send>,
}

impl Feed {
    pub fn new(handle: FeedRef, frames: FrameReceiver, guard: Box<dyn Send>) -> Self {
        Self {
            handle,
            frames,
            guard,
        }
    }

    /// Split into parts, keeping the guard alive as long as the returned box lives
    pub fn into_parts(self) -> (FeedRef, FrameReceiver, Box<dyn Send>) {
        (self.handle, self.frames, self.guard)
    }
}

impl std::fmt::Debug for Feed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Feed").field("handle", &self.handle).finish()
    }
}

/// Pick the device to open for a facing direction
///
/// Preference order:
/// 1. a device whose reported location matches the facing
/// 2. Back: the first device not reported as front-facing;
///    Front: the second device (laptops and phones list the rear/world camera first)
/// 3. the only device
pub fn select_device(cameras: &[CameraDevice], facing: Facing) -> Option<&CameraDevice> {
    if let Some(exact) = cameras.iter().find(|cam| cam.faces(facing)) {
        return Some(exact);
    }

    let fallback = match facing {
        Facing::Back => cameras.iter().find(|cam| !cam.faces(Facing::Front)),
        Facing::Front => cameras.get(1),
    };

    fallback.or_else(|| cameras.first())
}

/// Get the platform provider (PipeWire + xdg-desktop-portal)
pub fn get_provider(jpeg_quality: u8) -> Arc<dyn CameraProvider> {
    Arc::new(pipewire::PipeWireProvider::new(
        crate::storage::capture_directory(),
        jpeg_quality,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(name: &str, location: Option<&str>) -> CameraDevice {
        CameraDevice {
            name: name.to_string(),
            path: format!("pipewire-{}", name),
            node_id: None,
            location: location.map(str::to_string),
        }
    }

    #[test]
    fn test_select_prefers_reported_location() {
        let cameras = vec![
            device("front", Some("front")),
            device("rear", Some("back")),
        ];
        assert_eq!(select_device(&cameras, Facing::Back).unwrap().name, "rear");
        assert_eq!(select_device(&cameras, Facing::Front).unwrap().name, "front");
    }

    #[test]
    fn test_select_without_locations_uses_order() {
        let cameras = vec![device("first", None), device("second", None)];
        assert_eq!(select_device(&cameras, Facing::Back).unwrap().name, "first");
        assert_eq!(select_device(&cameras, Facing::Front).unwrap().name, "second");
    }

    #[test]
    fn test_select_back_skips_front_camera() {
        let cameras = vec![device("selfie", Some("front")), device("usb", None)];
        assert_eq!(select_device(&cameras, Facing::Back).unwrap().name, "usb");
    }

    #[test]
    fn test_select_single_camera_serves_both_directions() {
        let cameras = vec![device("webcam", Some("external"))];
        assert_eq!(select_device(&cameras, Facing::Back).unwrap().name, "webcam");
        assert_eq!(select_device(&cameras, Facing::Front).unwrap().name, "webcam");
    }

    #[test]
    fn test_select_empty_list() {
        assert!(select_device(&[], Facing::Back).is_none());
    }
}
