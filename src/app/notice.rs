// SPDX-License-Identifier: GPL-3.0-only

//! Timed notice shown over the preview
//!
//! Each notice gets a serial. The hide timer started for a notice carries
//! that serial, so a timer left over from an older notice does not clear a
//! newer one.

/// A notice currently on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub serial: u64,
    pub text: String,
}

/// At most one notice, plus the serial counter
#[derive(Debug, Default)]
pub struct NoticeSlot {
    current: Option<Notice>,
    last_serial: u64,
}

impl NoticeSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `text`, replacing any notice on screen. Returns the serial to hide it with.
    pub fn show(&mut self, text: impl Into<String>) -> u64 {
        self.last_serial += 1;
        self.current = Some(Notice {
            serial: self.last_serial,
            text: text.into(),
        });
        self.last_serial
    }

    /// Hide the notice with `serial`. Returns false if a different notice (or none) is showing.
    pub fn hide(&mut self, serial: u64) -> bool {
        if self.current.as_ref().is_some_and(|n| n.serial == serial) {
            self.current = None;
            true
        } else {
            false
        }
    }

    pub fn current(&self) -> Option<&Notice> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hide_matching_serial() {
        let mut slot = NoticeSlot::new();
        let serial = slot.show("Could not take photo");
        assert_eq!(slot.current().map(|n| n.text.as_str()), Some("Could not take photo"));

        assert!(slot.hide(serial));
        assert!(slot.current().is_none());
        assert!(!slot.hide(serial));
    }

    #[test]
    fn test_stale_timer_keeps_newer_notice() {
        let mut slot = NoticeSlot::new();
        let first = slot.show("first");
        let second = slot.show("second");
        assert_ne!(first, second);

        // Timer for the first notice fires after the second was shown
        assert!(!slot.hide(first));
        assert_eq!(slot.current().map(|n| n.serial), Some(second));

        assert!(slot.hide(second));
        assert!(slot.current().is_none());
    }

    #[test]
    fn test_serials_keep_increasing_after_hide() {
        let mut slot = NoticeSlot::new();
        let first = slot.show("a");
        slot.hide(first);
        let second = slot.show("b");
        assert!(second > first);
    }
}
