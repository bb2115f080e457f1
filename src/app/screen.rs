// SPDX-License-Identifier: GPL-3.0-only

//! Camera screen state machine
//!
//! Holds everything the single camera screen knows and decides which async
//! work to start. It does not touch the toolkit: the application turns the
//! returned [`Effect`]s into tasks and feeds their results back in.
//!
//! ```text
//! Loading ──granted──▶ Capturing ◀──dismiss── Reviewing
//!    │                     └──────shutter ok──────▲
//!    └──denied──▶ Denied (terminal)
//! ```

use crate::backends::camera::{BackendError, Facing, FeedRef, ImageRef, PermissionVerdict};

/// Camera access as far as the screen knows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionState {
    /// Request pending (or not issued yet)
    #[default]
    Unknown,
    Granted,
    Denied,
}

/// What the screen should render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the permission verdict
    Loading,
    /// Access refused; nothing else is reachable
    Denied,
    /// Live feed with flip and shutter
    Capturing,
    /// Modal overlay showing the last capture
    Reviewing,
}

/// Async work requested by a transition
#[derive(Debug)]
pub enum Effect {
    None,
    /// Ask the platform for camera access
    RequestPermission,
    /// Capture a still from this feed
    Capture(FeedRef),
}

impl Effect {
    pub fn is_none(&self) -> bool {
        matches!(self, Effect::None)
    }
}

/// How a capture result was applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// Image stored and review overlay opened; `replaced` is the capture it superseded
    Stored { replaced: Option<ImageRef> },
    /// Capture failed; only the in-flight flag was cleared
    Failed(BackendError),
    /// Result arrived when nothing was waiting for it
    Ignored,
}

/// State of the camera screen
#[derive(Debug, Default)]
pub struct Screen {
    permission: PermissionState,
    permission_requested: bool,
    facing: Facing,
    feed: Option<FeedRef>,
    last_capture: Option<ImageRef>,
    reviewing: bool,
    capture_in_flight: bool,
    mounted: bool,
}

impl Screen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Screen became visible
    ///
    /// Only the first mount issues a permission request.
    pub fn mount(&mut self) -> Effect {
        self.mounted = true;
        if self.permission_requested {
            return Effect::None;
        }
        self.permission_requested = true;
        Effect::RequestPermission
    }

    /// Screen went away; pending results are dropped from now on
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.feed = None;
        self.capture_in_flight = false;
    }

    /// Apply a permission verdict. Returns false if it was ignored.
    pub fn permission_resolved(&mut self, verdict: PermissionVerdict) -> bool {
        if !self.mounted || self.permission != PermissionState::Unknown {
            return false;
        }
        self.permission = match verdict {
            PermissionVerdict::Granted => PermissionState::Granted,
            PermissionVerdict::Denied => PermissionState::Denied,
        };
        true
    }

    /// Toggle the facing direction
    ///
    /// Drops the attached feed; the next feed for the new direction attaches
    /// on its first frame.
    pub fn flip(&mut self) -> bool {
        if !self.mounted || self.permission != PermissionState::Granted {
            return false;
        }
        self.facing = self.facing.flipped();
        self.feed = None;
        true
    }

    /// A feed for `facing` produced its first frame
    pub fn feed_attached(&mut self, facing: Facing, handle: FeedRef) -> bool {
        if !self.mounted || self.permission != PermissionState::Granted || facing != self.facing {
            return false;
        }
        self.feed = Some(handle);
        true
    }

    /// The feed for `facing` ended
    pub fn feed_detached(&mut self, facing: Facing) -> bool {
        if facing != self.facing || self.feed.is_none() {
            return false;
        }
        self.feed = None;
        true
    }

    /// Shutter pressed
    ///
    /// No-op without an attached feed, while a capture is pending, or while
    /// the review overlay is up.
    pub fn shutter(&mut self) -> Effect {
        if !self.mounted
            || self.permission != PermissionState::Granted
            || self.reviewing
            || self.capture_in_flight
        {
            return Effect::None;
        }
        let Some(feed) = self.feed.clone() else {
            return Effect::None;
        };
        self.capture_in_flight = true;
        Effect::Capture(feed)
    }

    /// Apply the result of the capture started by [`Screen::shutter`]
    pub fn capture_finished(&mut self, result: Result<ImageRef, BackendError>) -> CaptureOutcome {
        if !self.mounted || !self.capture_in_flight {
            return CaptureOutcome::Ignored;
        }
        self.capture_in_flight = false;
        match result {
            Ok(image) => {
                let replaced = self.last_capture.replace(image.clone());
                self.reviewing = true;
                CaptureOutcome::Stored {
                    replaced: replaced.filter(|old| *old != image),
                }
            }
            Err(err) => CaptureOutcome::Failed(err),
        }
    }

    /// Close the review overlay; the last capture is kept
    pub fn dismiss(&mut self) -> bool {
        std::mem::replace(&mut self.reviewing, false)
    }

    pub fn phase(&self) -> Phase {
        match self.permission {
            PermissionState::Unknown => Phase::Loading,
            PermissionState::Denied => Phase::Denied,
            PermissionState::Granted if self.reviewing => Phase::Reviewing,
            PermissionState::Granted => Phase::Capturing,
        }
    }

    pub fn permission(&self) -> PermissionState {
        self.permission
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn feed(&self) -> Option<&FeedRef> {
        self.feed.as_ref()
    }

    pub fn last_capture(&self) -> Option<&ImageRef> {
        self.last_capture.as_ref()
    }

    pub fn is_reviewing(&self) -> bool {
        self.reviewing
    }

    pub fn capture_in_flight(&self) -> bool {
        self.capture_in_flight
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Whether the live feed should be running
    pub fn wants_feed(&self) -> bool {
        self.mounted && self.permission == PermissionState::Granted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let screen = Screen::new();
        assert_eq!(screen.phase(), Phase::Loading);
        assert_eq!(screen.facing(), Facing::Back);
        assert!(screen.last_capture().is_none());
        assert!(!screen.wants_feed());
    }

    #[test]
    fn test_verdict_is_applied_once() {
        let mut screen = Screen::new();
        screen.mount();
        assert!(screen.permission_resolved(PermissionVerdict::Denied));
        assert!(!screen.permission_resolved(PermissionVerdict::Granted));
        assert_eq!(screen.phase(), Phase::Denied);
    }

    #[test]
    fn test_dismiss_without_overlay_is_noop() {
        let mut screen = Screen::new();
        screen.mount();
        screen.permission_resolved(PermissionVerdict::Granted);
        assert!(!screen.dismiss());
        assert_eq!(screen.phase(), Phase::Capturing);
    }
}
