// SPDX-License-Identifier: GPL-3.0-only

//! JPEG encoding of still frames
//!
//! Frames arrive as RGBA; JPEG has no alpha channel, so it is dropped before
//! encoding. Encoding is CPU-bound and runs on the blocking pool.

use crate::backends::camera::types::CameraFrame;
use crate::errors::PhotoError;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Encoded image data ready for saving
pub struct EncodedImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// JPEG encoder with a fixed quality
#[derive(Debug, Clone, Copy)]
pub struct PhotoEncoder {
    quality: u8,
}

impl PhotoEncoder {
    /// Create an encoder; quality is clamped to 1-100
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Encode a frame on the blocking pool
    pub async fn encode(&self, frame: CameraFrame) -> Result<EncodedImage, PhotoError> {
        let quality = self.quality;
        tokio::task::spawn_blocking(move || encode_jpeg(&frame, quality))
            .await
            .map_err(|e| PhotoError::EncodingFailed(format!("encoding task failed: {}", e)))?
    }

    /// Save encoded bytes under a timestamped name in `output_dir`
    pub async fn save(
        &self,
        encoded: EncodedImage,
        output_dir: &Path,
    ) -> Result<PathBuf, PhotoError> {
        let path = crate::storage::write_capture(output_dir, &encoded.data)
            .await
            .map_err(|e| PhotoError::SaveFailed(e.to_string()))?;
        info!(
            path = %path.display(),
            width = encoded.width,
            height = encoded.height,
            "Photo saved"
        );
        Ok(path)
    }
}

/// Encode an RGBA frame as JPEG
pub fn encode_jpeg(frame: &CameraFrame, quality: u8) -> Result<EncodedImage, PhotoError> {
    if frame.width == 0 || frame.height == 0 || frame.data.len() < frame.expected_len() {
        return Err(PhotoError::InvalidFrame(format!(
            "{}x{} frame with {} bytes",
            frame.width,
            frame.height,
            frame.data.len()
        )));
    }

    let rgb: Vec<u8> = frame.data[..frame.expected_len()]
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();

    let mut data = Vec::new();
    let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut data, quality);
    encoder
        .encode(&rgb, frame.width, frame.height, image::ExtendedColorType::Rgb8)
        .map_err(|e| PhotoError::EncodingFailed(e.to_string()))?;

    debug!(size = data.len(), quality, "JPEG encoding complete");
    Ok(EncodedImage {
        data,
        width: frame.width,
        height: frame.height,
    })
}
