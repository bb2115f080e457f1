// SPDX-License-Identifier: MPL-2.0

//! Processing pipelines that run off the UI thread
//!
//! - [`photo`]: still frame → JPEG file

pub mod photo;
