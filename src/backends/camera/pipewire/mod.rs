// SPDX-License-Identifier: MPL-2.0

//! PipeWire camera backend
//!
//! Discovery through `pw-cli`, live frames through GStreamer's `pipewiresrc`,
//! access mediated by the xdg-desktop-portal Camera interface.

mod enumeration;
mod pipeline;

pub use enumeration::{enumerate_pipewire_cameras, is_pipewire_available, parse_pw_cli_nodes};
pub use pipeline::{LatestFrame, PipeWirePipeline, pipeline_description};

use super::types::*;
use super::{CameraProvider, Feed, FeedHandle, permission, select_device};
use crate::constants::pipeline as pipeline_consts;
use crate::pipelines::photo::PhotoPipeline;
use futures::future::BoxFuture;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// PipeWire camera provider
pub struct PipeWireProvider {
    capture_dir: PathBuf,
    jpeg_quality: Arc<AtomicU8>,
}

impl PipeWireProvider {
    pub fn new(capture_dir: PathBuf, jpeg_quality: u8) -> Self {
        Self {
            capture_dir,
            jpeg_quality: Arc::new(AtomicU8::new(jpeg_quality)),
        }
    }
}

impl CameraProvider for PipeWireProvider {
    fn request_permission(&self) -> BoxFuture<'static, BackendResult<PermissionVerdict>> {
        Box::pin(permission::request_camera_access())
    }

    fn open_feed(&self, facing: Facing) -> BackendResult<Feed> {
        let mut cameras = self.enumerate_cameras();
        if cameras.is_empty() {
            if !is_pipewire_available() {
                return Err(BackendError::NotAvailable(
                    "PipeWire camera source is not available".to_string(),
                ));
            }
            cameras.push(CameraDevice::auto_select());
        }

        let device = select_device(&cameras, facing)
            .ok_or_else(|| BackendError::DeviceNotFound(facing.to_string()))?;
        info!(%facing, device = %device.name, path = %device.path, "Opening camera feed");

        let (sender, receiver) =
            futures::channel::mpsc::channel(pipeline_consts::PREVIEW_CHANNEL_CAPACITY);
        let latest: LatestFrame = Arc::new(Mutex::new(None));
        let alive = Arc::new(AtomicBool::new(false));

        let pipeline =
            PipeWirePipeline::new(device, sender, Arc::clone(&latest), Arc::clone(&alive))?;

        let handle = PipeWireFeedHandle {
            facing,
            device_name: device.name.clone(),
            latest,
            alive,
            capture_dir: self.capture_dir.clone(),
            jpeg_quality: Arc::clone(&self.jpeg_quality),
        };

        Ok(Feed::new(Arc::new(handle), receiver, Box::new(pipeline)))
    }

    fn enumerate_cameras(&self) -> Vec<CameraDevice> {
        let cameras = enumerate_pipewire_cameras().unwrap_or_default();
        debug!(count = cameras.len(), "PipeWire cameras enumerated");
        cameras
    }

    fn set_jpeg_quality(&self, quality: u8) {
        self.jpeg_quality.store(quality, Ordering::Relaxed);
    }
}

/// Capture handle for one PipeWire feed
///
/// Holds only the latest-frame slot and the liveness flag; the pipeline itself
/// stays with the feed guard.
pub struct PipeWireFeedHandle {
    facing: Facing,
    device_name: String,
    latest: LatestFrame,
    alive: Arc<AtomicBool>,
    capture_dir: PathBuf,
    jpeg_quality: Arc<AtomicU8>,
}

impl PipeWireFeedHandle {
    /// Snapshot of the most recent frame
    fn latest_frame(&self) -> BackendResult<CameraFrame> {
        if !self.alive.load(Ordering::Acquire) {
            return Err(BackendError::FeedClosed);
        }
        self.latest
            .lock()
            .map_err(|_| BackendError::Other("frame slot poisoned".to_string()))?
            .clone()
            .ok_or(BackendError::NoFrameAvailable)
    }
}

impl std::fmt::Debug for PipeWireFeedHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipeWireFeedHandle")
            .field("facing", &self.facing)
            .field("device", &self.device_name)
            .field("alive", &self.alive.load(Ordering::Relaxed))
            .finish()
    }
}

impl FeedHandle for PipeWireFeedHandle {
    fn facing(&self) -> Facing {
        self.facing
    }

    fn capture(&self) -> BoxFuture<'static, BackendResult<ImageRef>> {
        let frame = self.latest_frame();
        let capture_dir = self.capture_dir.clone();
        let pipeline = PhotoPipeline::new(self.jpeg_quality.load(Ordering::Relaxed));

        Box::pin(async move {
            let frame = frame?;
            debug!(
                width = frame.width,
                height = frame.height,
                age_ms = frame.captured_at.elapsed().as_millis(),
                "Capturing still frame"
            );
            let path = pipeline.capture_and_save(frame, capture_dir).await?;
            Ok(ImageRef::from_path(&path))
        })
    }
}
