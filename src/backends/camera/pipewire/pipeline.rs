// SPDX-License-Identifier: MPL-2.0

//! PipeWire GStreamer pipeline for the live feed

use super::super::types::*;
use crate::constants::{pipeline, timing};
use gstreamer::prelude::*;
use gstreamer_app::AppSink;
use gstreamer_video::VideoInfo;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Most recent frame of a feed, shared with its capture handle
pub type LatestFrame = Arc<Mutex<Option<CameraFrame>>>;

/// Running `pipewiresrc ! videoconvert ! appsink` pipeline
///
/// Frames go two ways: into the preview channel (dropped when full) and into
/// the latest-frame slot used for still capture. Dropping the pipeline stops
/// the camera and marks the feed as closed.
pub struct PipeWirePipeline {
    pipeline: gstreamer::Pipeline,
    appsink: AppSink,
    latest: LatestFrame,
    alive: Arc<AtomicBool>,
}

/// gst-launch description for a device
///
/// `pipewire-serial-N` maps to `target-object=N`; `pipewire-N` (node id) is
/// passed through as-is; an empty path lets PipeWire pick the default camera.
pub fn pipeline_description(device: &CameraDevice) -> String {
    let target = device
        .path
        .strip_prefix("pipewire-serial-")
        .or_else(|| device.path.strip_prefix("pipewire-"))
        .filter(|t| !t.is_empty())
        .map(|t| format!(" target-object={}", t))
        .unwrap_or_default();

    format!(
        "pipewiresrc{} do-timestamp=true ! videoconvert n-threads={} ! video/x-raw,format={} ! appsink name=sink",
        target,
        pipeline::videoconvert_threads(),
        pipeline::OUTPUT_FORMAT,
    )
}

impl PipeWirePipeline {
    /// Build and start the pipeline
    pub fn new(
        device: &CameraDevice,
        frame_sender: FrameSender,
        latest: LatestFrame,
        alive: Arc<AtomicBool>,
    ) -> BackendResult<Self> {
        gstreamer::init().map_err(|e| BackendError::InitializationFailed(e.to_string()))?;

        let description = pipeline_description(device);
        info!(device = %device.name, pipeline = %description, "Creating PipeWire pipeline");

        let pipeline = gstreamer::parse::launch(&description)
            .map_err(|e| BackendError::InitializationFailed(e.to_string()))?
            .dynamic_cast::<gstreamer::Pipeline>()
            .map_err(|_| {
                BackendError::InitializationFailed("Launch result is not a pipeline".to_string())
            })?;

        let appsink = pipeline
            .by_name("sink")
            .ok_or_else(|| BackendError::InitializationFailed("Failed to get appsink".to_string()))?
            .dynamic_cast::<AppSink>()
            .map_err(|_| {
                BackendError::InitializationFailed("Failed to cast appsink".to_string())
            })?;

        appsink.set_property("sync", false);
        appsink.set_property("max-buffers", pipeline::MAX_BUFFERS);
        appsink.set_property("drop", true);
        appsink.set_property("enable-last-sample", false);

        let frame_count = Arc::new(AtomicU64::new(0));
        let slot = Arc::clone(&latest);
        appsink.set_callbacks(
            gstreamer_app::AppSinkCallbacks::builder()
                .new_sample(move |appsink| {
                    let captured_at = Instant::now();
                    let frame_num = frame_count.fetch_add(1, Ordering::Relaxed);
                    let log_this = frame_num % timing::FRAME_LOG_INTERVAL == 0;

                    let sample = appsink.pull_sample().map_err(|_| gstreamer::FlowError::Eos)?;
                    let buffer = sample.buffer().ok_or(gstreamer::FlowError::Error)?;

                    if buffer.flags().contains(gstreamer::BufferFlags::CORRUPTED) {
                        if log_this {
                            warn!(frame = frame_num, "Buffer marked as corrupted, skipping frame");
                        }
                        return Ok(gstreamer::FlowSuccess::Ok);
                    }

                    let caps = sample.caps().ok_or(gstreamer::FlowError::Error)?;
                    let info = VideoInfo::from_caps(caps).map_err(|e| {
                        error!(frame = frame_num, error = %e, "Failed to read video info");
                        gstreamer::FlowError::Error
                    })?;
                    let map = buffer.map_readable().map_err(|e| {
                        error!(frame = frame_num, error = %e, "Failed to map buffer");
                        gstreamer::FlowError::Error
                    })?;

                    let width = info.width();
                    let height = info.height();
                    let data = pack_rgba_rows(map.as_slice(), width, height, info.stride()[0] as usize)
                        .ok_or_else(|| {
                            error!(frame = frame_num, width, height, len = map.size(), "Short RGBA buffer");
                            gstreamer::FlowError::Error
                        })?;

                    let frame = CameraFrame {
                        width,
                        height,
                        data,
                        captured_at,
                    };

                    if let Ok(mut latest) = slot.lock() {
                        *latest = Some(frame.clone());
                    }

                    let mut sender = frame_sender.clone();
                    if let Err(e) = sender.try_send(frame) {
                        if e.is_disconnected() {
                            return Err(gstreamer::FlowError::Flushing);
                        }
                        if log_this {
                            debug!(frame = frame_num, "Preview frame dropped (channel full)");
                        }
                    } else if log_this {
                        debug!(
                            frame = frame_num,
                            width,
                            height,
                            elapsed_us = captured_at.elapsed().as_micros(),
                            "Frame delivered"
                        );
                    }

                    Ok(gstreamer::FlowSuccess::Ok)
                })
                .build(),
        );

        pipeline.set_state(gstreamer::State::Playing).map_err(|e| {
            BackendError::InitializationFailed(format!("Failed to start pipeline: {}", e))
        })?;

        let (result, state, pending) = pipeline.state(gstreamer::ClockTime::from_seconds(
            timing::START_TIMEOUT_SECS,
        ));
        debug!(?result, ?state, ?pending, "Pipeline state after start");
        if state != gstreamer::State::Playing {
            warn!("Pipeline is not in PLAYING state yet");
        }

        alive.store(true, Ordering::Release);
        info!(device = %device.name, "PipeWire feed started");

        Ok(Self {
            pipeline,
            appsink,
            latest,
            alive,
        })
    }
}

impl Drop for PipeWirePipeline {
    fn drop(&mut self) {
        self.alive.store(false, Ordering::Release);
        self.appsink
            .set_callbacks(gstreamer_app::AppSinkCallbacks::builder().build());

        if let Err(e) = self.pipeline.set_state(gstreamer::State::Null) {
            warn!(error = %e, "Failed to stop pipeline");
        }
        let (result, state, _) = self.pipeline.state(gstreamer::ClockTime::from_seconds(
            timing::STOP_TIMEOUT_SECS,
        ));
        debug!(?result, ?state, "Pipeline stopped");

        if let Ok(mut latest) = self.latest.lock() {
            latest.take();
        }
        info!("PipeWire feed stopped");
    }
}

/// Copy RGBA rows out of a possibly padded buffer
///
/// Returns `None` if the buffer is too short for the given geometry.
pub fn pack_rgba_rows(src: &[u8], width: u32, height: u32, stride: usize) -> Option<Arc<[u8]>> {
    let row_len = width as usize * 4;
    let height = height as usize;
    if height == 0 || row_len == 0 {
        return None;
    }
    let stride = stride.max(row_len);
    if src.len() < stride * (height - 1) + row_len {
        return None;
    }

    if stride == row_len {
        return Some(Arc::from(&src[..row_len * height]));
    }

    let mut packed = Vec::with_capacity(row_len * height);
    for row in src.chunks(stride).take(height) {
        packed.extend_from_slice(&row[..row_len]);
    }
    Some(Arc::from(packed))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(path: &str) -> CameraDevice {
        CameraDevice {
            name: "cam".into(),
            path: path.into(),
            node_id: None,
            location: None,
        }
    }

    #[test]
    fn test_description_targets_serial() {
        let desc = pipeline_description(&device("pipewire-serial-2146"));
        assert!(desc.starts_with("pipewiresrc target-object=2146 do-timestamp=true"));
        assert!(desc.contains("video/x-raw,format=RGBA"));
        assert!(desc.ends_with("appsink name=sink"));
    }

    #[test]
    fn test_description_node_id_and_auto_select() {
        assert!(pipeline_description(&device("pipewire-59")).contains("target-object=59 "));
        assert!(pipeline_description(&CameraDevice::auto_select()).starts_with("pipewiresrc do-timestamp"));
    }

    #[test]
    fn test_pack_tight_rows() {
        let src: Vec<u8> = (0..16).collect();
        let packed = pack_rgba_rows(&src, 2, 2, 8).unwrap();
        assert_eq!(&packed[..], &src[..]);
    }

    #[test]
    fn test_pack_strips_row_padding() {
        // 1x2 image with 4 bytes of padding per row
        let src = [1, 2, 3, 4, 0, 0, 0, 0, 5, 6, 7, 8];
        let packed = pack_rgba_rows(&src, 1, 2, 8).unwrap();
        assert_eq!(&packed[..], &[1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_pack_rejects_short_buffer() {
        assert!(pack_rgba_rows(&[0; 7], 1, 2, 4).is_none());
        assert!(pack_rgba_rows(&[], 0, 0, 0).is_none());
    }
}
