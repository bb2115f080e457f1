// SPDX-License-Identifier: GPL-3.0-only

//! Shutter, capture result, and review overlay handlers

use crate::app::screen::{CaptureOutcome, Effect};
use crate::app::state::{AppModel, Message};
use crate::backends::camera::types::{BackendError, ImageRef};
use crate::constants::timing;
use crate::fl;
use crate::storage;
use cosmic::Task;
use cosmic::widget::image;
use std::path::PathBuf;
use tracing::{debug, info, warn};

impl AppModel {
    pub(crate) fn handle_shutter(&mut self) -> Task<cosmic::Action<Message>> {
        match self.screen.shutter() {
            Effect::Capture(feed) => {
                info!(facing = %feed.facing(), "Capturing photo");
                Task::perform(feed.capture(), |result| {
                    cosmic::Action::App(Message::CaptureFinished(result))
                })
            }
            _ => {
                debug!(
                    has_feed = self.screen.feed().is_some(),
                    in_flight = self.screen.capture_in_flight(),
                    reviewing = self.screen.is_reviewing(),
                    "Shutter ignored"
                );
                Task::none()
            }
        }
    }

    pub(crate) fn handle_capture_finished(
        &mut self,
        result: Result<ImageRef, BackendError>,
    ) -> Task<cosmic::Action<Message>> {
        match self.screen.capture_finished(result) {
            CaptureOutcome::Stored { replaced } => {
                if let Some(capture) = self.screen.last_capture() {
                    info!(uri = %capture, "Photo captured");
                    self.review_image = capture.to_file_path().map(image::Handle::from_path);
                }
                match replaced.and_then(|old| old.to_file_path()) {
                    Some(path) => discard_capture_task(path),
                    None => Task::none(),
                }
            }
            CaptureOutcome::Failed(err) => {
                warn!(error = %err, "Photo capture failed");
                self.show_notice(fl!("capture-failed"))
            }
            CaptureOutcome::Ignored => {
                debug!("Ignoring capture result");
                Task::none()
            }
        }
    }

    pub(crate) fn handle_dismiss_review(&mut self) -> Task<cosmic::Action<Message>> {
        if self.screen.dismiss() {
            debug!("Review overlay dismissed");
        }
        Task::none()
    }

    /// Show a transient notice and schedule its removal
    pub(crate) fn show_notice(&mut self, text: String) -> Task<cosmic::Action<Message>> {
        let serial = self.notice.show(text);

        Task::perform(
            async {
                tokio::time::sleep(timing::NOTICE_DURATION).await;
            },
            move |_| cosmic::Action::App(Message::HideNotice(serial)),
        )
    }

    pub(crate) fn handle_hide_notice(&mut self, serial: u64) -> Task<cosmic::Action<Message>> {
        if !self.notice.hide(serial) {
            debug!(serial, "Stale notice timer");
        }
        Task::none()
    }
}

/// Delete a capture file that is no longer shown
fn discard_capture_task(path: PathBuf) -> Task<cosmic::Action<Message>> {
    Task::perform(
        async move {
            if let Err(err) = storage::discard_capture(&path).await {
                warn!(path = %path.display(), error = %err, "Failed to delete previous capture");
            }
        },
        |_| cosmic::Action::App(Message::Noop),
    )
}

/// Delete captures left behind by earlier runs
pub(crate) fn clear_stale_captures_task(dir: PathBuf) -> Task<cosmic::Action<Message>> {
    Task::perform(
        async move {
            match storage::clear_captures(&dir).await {
                Ok(0) => {}
                Ok(removed) => debug!(removed, dir = %dir.display(), "Cleared old captures"),
                Err(err) => warn!(dir = %dir.display(), error = %err, "Failed to clear old captures"),
            }
        },
        |_| cosmic::Action::App(Message::Noop),
    )
}
