// SPDX-License-Identifier: MPL-2.0

//! Still photo pipeline
//!
//! ```text
//! latest feed frame (RGBA) → JPEG encoding (blocking pool) → capture dir
//! ```
//!
//! The live preview keeps running while a still is encoded and written.

pub mod encoding;

pub use encoding::{EncodedImage, PhotoEncoder, encode_jpeg};

use crate::backends::camera::types::CameraFrame;
use crate::errors::PhotoError;
use std::path::PathBuf;

/// Encode-and-save pipeline for one still
#[derive(Debug, Clone, Copy)]
pub struct PhotoPipeline {
    encoder: PhotoEncoder,
}

impl PhotoPipeline {
    pub fn new(jpeg_quality: u8) -> Self {
        Self {
            encoder: PhotoEncoder::new(jpeg_quality),
        }
    }

    /// Encode `frame` and write it into `output_dir`, returning the file path
    pub async fn capture_and_save(
        &self,
        frame: CameraFrame,
        output_dir: PathBuf,
    ) -> Result<PathBuf, PhotoError> {
        let encoded = self.encoder.encode(frame).await?;
        self.encoder.save(encoded, &output_dir).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Instant;

    #[tokio::test]
    async fn test_capture_and_save_writes_jpeg() {
        let tmp = tempfile::tempdir().unwrap();
        let frame = CameraFrame {
            width: 8,
            height: 8,
            data: Arc::from(vec![128u8; 8 * 8 * 4]),
            captured_at: Instant::now(),
        };

        let path = PhotoPipeline::new(92)
            .capture_and_save(frame, tmp.path().to_path_buf())
            .await
            .unwrap();

        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("jpg"));
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("IMG_"));
        assert!(image::open(&path).is_ok());
    }
}
