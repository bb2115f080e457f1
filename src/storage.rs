// SPDX-License-Identifier: MPL-2.0

//! Where captured stills live and what they are called

use crate::constants::photo;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Directory that receives captured stills
///
/// `$XDG_CACHE_HOME/quickshot/captures`, or the temp dir when no cache dir is known.
pub fn capture_directory() -> PathBuf {
    let base = dirs::cache_dir().unwrap_or_else(|| {
        warn!("No cache directory, storing captures in the temp dir");
        std::env::temp_dir()
    });
    base.join(env!("CARGO_PKG_NAME")).join(photo::CAPTURE_SUBDIR)
}

/// File name for a still taken at `timestamp` (`IMG_20260102_030405_678.jpg`)
pub fn capture_file_name(timestamp: &DateTime<Local>) -> String {
    format!(
        "{}{}.{}",
        photo::FILE_PREFIX,
        timestamp.format(photo::TIMESTAMP_FORMAT),
        photo::FILE_EXTENSION
    )
}

/// Path in `dir` for a still taken at `timestamp` that does not exist yet
///
/// Two captures within the same millisecond get `_1`, `_2`, ... suffixes.
pub fn unique_capture_path(dir: &Path, timestamp: &DateTime<Local>) -> PathBuf {
    let name = capture_file_name(timestamp);
    let candidate = dir.join(&name);
    if !candidate.exists() {
        return candidate;
    }

    let stem = name.trim_end_matches(&format!(".{}", photo::FILE_EXTENSION));
    (1..)
        .map(|n| dir.join(format!("{}_{}.{}", stem, n, photo::FILE_EXTENSION)))
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}

/// Write encoded still bytes into `dir`, creating it if needed
pub async fn write_capture(dir: &Path, bytes: &[u8]) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = unique_capture_path(dir, &Local::now());
    tokio::fs::write(&path, bytes).await?;
    debug!(path = %path.display(), size = bytes.len(), "Capture written");
    Ok(path)
}

/// Whether `path` is named like a capture written by [`write_capture`]
pub fn is_capture_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| {
            name.starts_with(photo::FILE_PREFIX)
                && name.ends_with(&format!(".{}", photo::FILE_EXTENSION))
        })
}

/// Delete a capture that is no longer shown
///
/// A file that is already gone counts as deleted.
pub async fn discard_capture(path: &Path) -> std::io::Result<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {
            debug!(path = %path.display(), "Capture discarded");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Delete every capture left in `dir` by earlier runs
///
/// Only files named like captures are touched. Returns how many were removed.
pub async fn clear_captures(dir: &Path) -> std::io::Result<usize> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e),
    };

    let mut removed = 0;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if is_capture_file(&path) && entry.file_type().await?.is_file() {
            discard_capture(&path).await?;
            removed += 1;
        }
    }
    Ok(removed)
}
