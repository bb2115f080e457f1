// SPDX-License-Identifier: MPL-2.0

//! Backend abstraction layer
//!
//! ```text
//! ┌──────────────────────────────────┐
//! │            App Layer             │
//! └────────────────┬─────────────────┘
//!                  │ CameraProvider / FeedHandle
//! ┌────────────────┴─────────────────┐
//! │   Camera (PipeWire + portal)     │
//! └──────────────────────────────────┘
//! ```

pub mod camera;
