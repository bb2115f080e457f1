// SPDX-License-Identifier: MPL-2.0

//! Quickshot - a point-and-shoot camera for the COSMIC desktop
//!
//! One screen: ask for camera access, show the live feed, flip between the
//! front and back cameras, take a photo, and review it in an overlay.
//!
//! - [`app`]: application UI and the camera screen state machine
//! - [`backends`]: camera capability (PipeWire feed, portal permission)
//! - [`pipelines`]: still encoding
//! - [`config`]: user configuration handling
//! - [`storage`]: where captures are written

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod i18n;
pub mod pipelines;
pub mod storage;

// Re-export commonly used types
pub use app::{AppModel, Message, Screen};
pub use config::Config;
pub use constants::QualityPreset;
pub use errors::{AppError, AppResult, PhotoError};
