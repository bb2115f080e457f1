// SPDX-License-Identifier: GPL-3.0-only

//! Permission and live feed handlers
//!
//! Handles the permission verdict, feed attach/detach, preview frames,
//! flipping, and unmount.

use crate::app::state::{AppModel, Message};
use crate::backends::camera::types::{CameraFrame, Facing, PermissionVerdict};
use crate::backends::camera::FeedRef;
use crate::constants::timing;
use cosmic::Task;
use cosmic::widget::image;
use std::sync::Arc;
use tracing::{debug, info, warn};

impl AppModel {
    /// Task that asks the provider for camera access
    ///
    /// A request that fails after reaching the platform counts as denied.
    pub(crate) fn request_permission_task(&self) -> Task<cosmic::Action<Message>> {
        let request = self.provider.request_permission();
        Task::perform(
            async move {
                match request.await {
                    Ok(verdict) => verdict,
                    Err(err) => {
                        warn!(error = %err, "Camera permission request failed");
                        PermissionVerdict::Denied
                    }
                }
            },
            |verdict| cosmic::Action::App(Message::PermissionResolved(verdict)),
        )
    }

    pub(crate) fn handle_permission_resolved(
        &mut self,
        verdict: PermissionVerdict,
    ) -> Task<cosmic::Action<Message>> {
        if self.screen.permission_resolved(verdict) {
            info!(?verdict, "Camera permission resolved");
        } else {
            debug!(?verdict, "Ignoring permission verdict");
        }
        Task::none()
    }

    pub(crate) fn handle_flip_camera(&mut self) -> Task<cosmic::Action<Message>> {
        if self.screen.flip() {
            info!(facing = %self.screen.facing(), "Flipped camera");
            self.preview = None;
        }
        Task::none()
    }

    pub(crate) fn handle_feed_attached(
        &mut self,
        facing: Facing,
        handle: FeedRef,
    ) -> Task<cosmic::Action<Message>> {
        if self.screen.feed_attached(facing, handle) {
            info!(%facing, "Camera feed attached");
        } else {
            debug!(%facing, current = %self.screen.facing(), "Ignoring stale feed attachment");
        }
        Task::none()
    }

    pub(crate) fn handle_feed_detached(&mut self, facing: Facing) -> Task<cosmic::Action<Message>> {
        if self.screen.feed_detached(facing) {
            info!(%facing, "Camera feed detached");
            self.preview = None;
        }
        Task::none()
    }

    pub(crate) fn handle_camera_frame(
        &mut self,
        facing: Facing,
        frame: Arc<CameraFrame>,
    ) -> Task<cosmic::Action<Message>> {
        if !self.screen.wants_feed() || facing != self.screen.facing() {
            return Task::none();
        }

        let latency = frame.captured_at.elapsed();
        if latency > timing::FRAME_POLL_INTERVAL * 2 {
            debug!(latency_ms = latency.as_millis(), "Preview frame arrived late");
        }

        self.preview = Some(image::Handle::from_rgba(
            frame.width,
            frame.height,
            frame.data.to_vec(),
        ));
        Task::none()
    }

    pub(crate) fn handle_unmount(&mut self) -> Task<cosmic::Action<Message>> {
        info!("Camera screen unmounted");
        self.screen.unmount();
        self.preview = None;
        Task::none()
    }
}
