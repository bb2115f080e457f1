// SPDX-License-Identifier: GPL-3.0-only

//! Headless commands
//!
//! - `list`: cameras PipeWire exposes, with their reported location
//! - `photo`: one still from the camera facing the given direction

use cosmic::Application;
use futures::StreamExt;
use quickshot::app::AppModel;
use quickshot::backends::camera::pipewire::enumerate_pipewire_cameras;
use quickshot::backends::camera::{
    self, BackendError, CameraProvider, Facing, PermissionVerdict, select_device,
};
use quickshot::config::Config;
use quickshot::constants::timing;
use quickshot::errors::{AppError, AppResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// List all available cameras
pub fn list_cameras(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    gstreamer::init()?;

    let cameras = enumerate_pipewire_cameras().unwrap_or_default();

    if json {
        println!("{}", serde_json::to_string_pretty(&cameras)?);
        return Ok(());
    }

    if cameras.is_empty() {
        println!("No cameras found.");
        return Ok(());
    }

    println!("Available cameras:");
    println!();
    for (index, device) in cameras.iter().enumerate() {
        println!("  [{}] {}", index, device.name);
        if !device.path.is_empty() {
            println!("      Path:     {}", device.path);
        }
        println!(
            "      Location: {}",
            device.location.as_deref().unwrap_or("unknown")
        );
    }
    println!();

    for facing in [Facing::Back, Facing::Front] {
        if let Some(device) = select_device(&cameras, facing) {
            println!("{:>5} camera: {}", facing, device.name);
        }
    }

    Ok(())
}

/// Take a photo with the camera facing `facing`
///
/// Prints the URI of the stored image, or the output path if one was given.
pub fn take_photo(
    facing: Facing,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (_, config) = Config::load(AppModel::APP_ID);
    let provider = camera::get_provider(config.effective_jpeg_quality());

    let rt = tokio::runtime::Runtime::new()?;
    let saved = rt.block_on(capture_one(provider, facing, output))?;
    println!("{}", saved);
    Ok(())
}

async fn capture_one(
    provider: Arc<dyn CameraProvider>,
    facing: Facing,
    output: Option<PathBuf>,
) -> AppResult<String> {
    if provider.request_permission().await? == PermissionVerdict::Denied {
        return Err(BackendError::PermissionDenied.into());
    }

    let feed = provider.open_feed(facing)?;
    let (handle, mut frames, _guard) = feed.into_parts();
    println!("Capturing from {} camera...", facing);

    let first = tokio::time::timeout(timing::CLI_FIRST_FRAME_TIMEOUT, frames.next())
        .await
        .map_err(|_| AppError::from("Timed out waiting for the camera"))?
        .ok_or(BackendError::FeedClosed)?;
    info!(width = first.width, height = first.height, "First frame received");

    let image = handle.capture().await?;

    match output {
        Some(dest) => {
            let source = image
                .to_file_path()
                .ok_or_else(|| AppError::Storage(format!("{} is not a local file", image)))?;
            let dest = move_capture(&source, &dest).await?;
            Ok(dest.display().to_string())
        }
        None => Ok(image.to_string()),
    }
}

/// Move a capture to the user's destination (a directory or a file path)
async fn move_capture(source: &Path, dest: &Path) -> std::io::Result<PathBuf> {
    let target = match (dest.is_dir(), source.file_name()) {
        (true, Some(name)) => dest.join(name),
        _ => dest.to_path_buf(),
    };

    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    // rename fails across filesystems; the cache dir is often on another one
    if tokio::fs::rename(source, &target).await.is_err() {
        tokio::fs::copy(source, &target).await?;
        tokio::fs::remove_file(source).await?;
    }
    Ok(target)
}
