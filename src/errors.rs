// SPDX-License-Identifier: MPL-2.0

//! Error types for the application

use crate::backends::camera::BackendError;
use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// Camera backend errors (permission, feed, device)
    Camera(BackendError),
    /// Photo capture errors
    Photo(PhotoError),
    /// Configuration errors
    Config(String),
    /// Storage/filesystem errors
    Storage(String),
    /// Generic error with message
    Other(String),
}

/// Still capture errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoError {
    /// Frame buffer does not match its dimensions
    InvalidFrame(String),
    /// Encoding failed
    EncodingFailed(String),
    /// Save failed
    SaveFailed(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Camera(e) => write!(f, "Camera error: {}", e),
            AppError::Photo(e) => write!(f, "Photo error: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for PhotoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhotoError::InvalidFrame(msg) => write!(f, "Invalid frame: {}", msg),
            PhotoError::EncodingFailed(msg) => write!(f, "Encoding failed: {}", msg),
            PhotoError::SaveFailed(msg) => write!(f, "Save failed: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for PhotoError {}

impl From<BackendError> for AppError {
    fn from(err: BackendError) -> Self {
        AppError::Camera(err)
    }
}

impl From<PhotoError> for AppError {
    fn from(err: PhotoError) -> Self {
        AppError::Photo(err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Other(msg.to_string())
    }
}

// Capture runs behind the backend boundary, so photo failures surface as backend errors
impl From<PhotoError> for BackendError {
    fn from(err: PhotoError) -> Self {
        match err {
            PhotoError::SaveFailed(msg) => BackendError::IoError(msg),
            other => BackendError::Other(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_error_into_backend_error() {
        let err: BackendError = PhotoError::SaveFailed("disk full".into()).into();
        assert_eq!(err, BackendError::IoError("disk full".into()));

        let err: BackendError = PhotoError::EncodingFailed("bad".into()).into();
        assert_eq!(err.to_string(), "Error: Encoding failed: bad");
    }

    #[test]
    fn test_app_error_display() {
        let err: AppError = BackendError::FeedClosed.into();
        assert_eq!(err.to_string(), "Camera error: Camera feed closed");
        assert_eq!(AppError::from("plain").to_string(), "plain");
    }
}
