// SPDX-License-Identifier: MPL-2.0

//! Integration tests for the camera screen state machine
//!
//! Drives [`Screen`] with a fake camera capability, the way the application
//! does: transitions return effects, effects run, results are fed back.

use futures::future::BoxFuture;
use quickshot::app::{CaptureOutcome, Effect, Phase, PermissionState, Screen};
use quickshot::backends::camera::{
    BackendError, BackendResult, CameraDevice, CameraProvider, Facing, Feed, FeedHandle, FeedRef,
    ImageRef, PermissionVerdict,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Feed handle whose capture resolves to a preset result
#[derive(Debug)]
struct FakeFeed {
    facing: Facing,
    result: BackendResult<ImageRef>,
    captures: AtomicUsize,
}

impl FakeFeed {
    fn ok(facing: Facing, uri: &str) -> Arc<Self> {
        Arc::new(Self {
            facing,
            result: Ok(ImageRef::from_uri(uri)),
            captures: AtomicUsize::new(0),
        })
    }

    fn failing(facing: Facing, err: BackendError) -> Arc<Self> {
        Arc::new(Self {
            facing,
            result: Err(err),
            captures: AtomicUsize::new(0),
        })
    }
}

impl FeedHandle for FakeFeed {
    fn facing(&self) -> Facing {
        self.facing
    }

    fn capture(&self) -> BoxFuture<'static, BackendResult<ImageRef>> {
        self.captures.fetch_add(1, Ordering::SeqCst);
        let result = self.result.clone();
        Box::pin(async move { result })
    }
}

/// Provider with a fixed verdict that opens fake feeds
struct FakeProvider {
    verdict: BackendResult<PermissionVerdict>,
}

impl CameraProvider for FakeProvider {
    fn request_permission(&self) -> BoxFuture<'static, BackendResult<PermissionVerdict>> {
        let verdict = self.verdict.clone();
        Box::pin(async move { verdict })
    }

    fn open_feed(&self, facing: Facing) -> BackendResult<Feed> {
        let (_tx, rx) = futures::channel::mpsc::channel(1);
        let handle: FeedRef = FakeFeed::ok(facing, "file:///tmp/fake.jpg");
        Ok(Feed::new(handle, rx, Box::new(())))
    }

    fn enumerate_cameras(&self) -> Vec<CameraDevice> {
        vec![CameraDevice::auto_select()]
    }
}

fn granted_screen() -> Screen {
    let mut screen = Screen::new();
    assert!(matches!(screen.mount(), Effect::RequestPermission));
    assert!(screen.permission_resolved(PermissionVerdict::Granted));
    screen
}

fn attach(screen: &mut Screen, feed: &Arc<FakeFeed>) -> bool {
    let handle: FeedRef = feed.clone();
    screen.feed_attached(feed.facing, handle)
}

#[test]
fn test_flip_alternates_facing() {
    let mut screen = granted_screen();
    assert_eq!(screen.facing(), Facing::Back);

    assert!(screen.flip());
    assert_eq!(screen.facing(), Facing::Front);
    assert!(screen.flip());
    assert_eq!(screen.facing(), Facing::Back);
    assert!(screen.flip());
    assert_eq!(screen.facing(), Facing::Front);
}

#[test]
fn test_full_capture_flow() {
    let mut screen = granted_screen();
    assert_eq!(screen.phase(), Phase::Capturing);

    assert!(screen.flip());
    let front = FakeFeed::ok(Facing::Front, "file:///tmp/IMG_1.jpg");
    assert!(attach(&mut screen, &front));

    let Effect::Capture(handle) = screen.shutter() else {
        panic!("shutter with an attached feed should capture");
    };
    assert_eq!(handle.facing(), Facing::Front);
    assert!(screen.capture_in_flight());

    let outcome = screen.capture_finished(Ok(ImageRef::from_uri("file:///tmp/IMG_1.jpg")));
    assert_eq!(outcome, CaptureOutcome::Stored { replaced: None });
    assert_eq!(screen.phase(), Phase::Reviewing);
    assert!(screen.is_reviewing());
    assert_eq!(
        screen.last_capture().map(ImageRef::uri),
        Some("file:///tmp/IMG_1.jpg")
    );

    assert!(screen.dismiss());
    assert_eq!(screen.phase(), Phase::Capturing);
    assert!(!screen.is_reviewing());
    assert_eq!(screen.facing(), Facing::Front);
    // The capture outlives the overlay
    assert_eq!(
        screen.last_capture().map(ImageRef::uri),
        Some("file:///tmp/IMG_1.jpg")
    );
}

#[test]
fn test_new_capture_reports_replaced_one() {
    let mut screen = granted_screen();
    let feed = FakeFeed::ok(Facing::Back, "file:///tmp/a.jpg");
    attach(&mut screen, &feed);

    screen.shutter();
    let first = screen.capture_finished(Ok(ImageRef::from_uri("file:///tmp/IMG_1.jpg")));
    assert_eq!(first, CaptureOutcome::Stored { replaced: None });
    screen.dismiss();

    screen.shutter();
    let second = screen.capture_finished(Ok(ImageRef::from_uri("file:///tmp/IMG_2.jpg")));
    assert_eq!(
        second,
        CaptureOutcome::Stored {
            replaced: Some(ImageRef::from_uri("file:///tmp/IMG_1.jpg"))
        }
    );
    assert_eq!(screen.last_capture().map(ImageRef::uri), Some("file:///tmp/IMG_2.jpg"));
}

#[test]
fn test_failed_capture_replaces_nothing() {
    let mut screen = granted_screen();
    let feed = FakeFeed::ok(Facing::Back, "file:///tmp/a.jpg");
    attach(&mut screen, &feed);

    screen.shutter();
    screen.capture_finished(Ok(ImageRef::from_uri("file:///tmp/IMG_1.jpg")));
    screen.dismiss();

    screen.shutter();
    screen.capture_finished(Err(BackendError::NoFrameAvailable));
    assert_eq!(screen.last_capture().map(ImageRef::uri), Some("file:///tmp/IMG_1.jpg"));
}

#[test]
fn test_denied_screen_ignores_controls() {
    let mut screen = Screen::new();
    screen.mount();
    assert!(screen.permission_resolved(PermissionVerdict::Denied));

    assert_eq!(screen.phase(), Phase::Denied);
    assert!(!screen.flip());
    assert_eq!(screen.facing(), Facing::Back);
    assert!(screen.shutter().is_none());

    let feed = FakeFeed::ok(Facing::Back, "file:///tmp/x.jpg");
    assert!(!attach(&mut screen, &feed));
    assert!(!screen.wants_feed());
}

#[test]
fn test_controls_inert_while_loading() {
    let mut screen = Screen::new();
    screen.mount();

    assert_eq!(screen.permission(), PermissionState::Unknown);
    assert!(!screen.flip());
    assert!(screen.shutter().is_none());
}

#[test]
fn test_shutter_without_feed_is_noop() {
    let mut screen = granted_screen();
    assert!(screen.shutter().is_none());
    assert!(!screen.capture_in_flight());
}

#[test]
fn test_double_tap_captures_once() {
    let mut screen = granted_screen();
    let feed = FakeFeed::ok(Facing::Back, "file:///tmp/a.jpg");
    attach(&mut screen, &feed);

    assert!(matches!(screen.shutter(), Effect::Capture(_)));
    assert!(screen.shutter().is_none());

    screen.capture_finished(Ok(ImageRef::from_uri("file:///tmp/a.jpg")));
    // Second result for the ignored tap never arrives; a stray one is dropped
    assert_eq!(
        screen.capture_finished(Ok(ImageRef::from_uri("file:///tmp/b.jpg"))),
        CaptureOutcome::Ignored
    );
    assert_eq!(screen.last_capture().map(ImageRef::uri), Some("file:///tmp/a.jpg"));
}

#[test]
fn test_shutter_while_reviewing_is_noop() {
    let mut screen = granted_screen();
    let feed = FakeFeed::ok(Facing::Back, "file:///tmp/a.jpg");
    attach(&mut screen, &feed);

    screen.shutter();
    screen.capture_finished(Ok(ImageRef::from_uri("file:///tmp/a.jpg")));
    assert!(screen.is_reviewing());
    assert!(screen.shutter().is_none());
}

#[test]
fn test_capture_failure_keeps_screen_usable() {
    let mut screen = granted_screen();
    let feed = FakeFeed::ok(Facing::Back, "file:///tmp/a.jpg");
    attach(&mut screen, &feed);

    screen.shutter();
    let outcome = screen.capture_finished(Err(BackendError::NoFrameAvailable));
    assert_eq!(outcome, CaptureOutcome::Failed(BackendError::NoFrameAvailable));

    assert_eq!(screen.phase(), Phase::Capturing);
    assert!(!screen.capture_in_flight());
    assert!(screen.last_capture().is_none());
    // Shutter works again
    assert!(matches!(screen.shutter(), Effect::Capture(_)));
}

#[test]
fn test_results_after_unmount_are_dropped() {
    let mut screen = Screen::new();
    screen.mount();
    assert!(screen.is_mounted());
    screen.unmount();
    assert!(!screen.is_mounted());
    assert!(!screen.permission_resolved(PermissionVerdict::Granted));
    assert_eq!(screen.phase(), Phase::Loading);

    let mut screen = granted_screen();
    let feed = FakeFeed::ok(Facing::Back, "file:///tmp/a.jpg");
    attach(&mut screen, &feed);
    screen.shutter();
    screen.unmount();

    assert_eq!(
        screen.capture_finished(Ok(ImageRef::from_uri("file:///tmp/a.jpg"))),
        CaptureOutcome::Ignored
    );
    assert!(!screen.is_reviewing());
    assert!(screen.feed().is_none());
    assert!(!screen.wants_feed());
}

#[test]
fn test_second_mount_does_not_request_again() {
    let mut screen = granted_screen();
    screen.unmount();
    assert!(screen.mount().is_none());
    assert!(screen.is_mounted());
    assert_eq!(screen.permission(), PermissionState::Granted);
    assert!(screen.wants_feed());
}

#[test]
fn test_stale_feed_attach_is_rejected() {
    let mut screen = granted_screen();
    let back = FakeFeed::ok(Facing::Back, "file:///tmp/back.jpg");

    screen.flip();
    // First frame of the old direction arrives after the flip
    assert!(!attach(&mut screen, &back));
    assert!(screen.feed().is_none());
    assert!(screen.shutter().is_none());
}

#[test]
fn test_flip_drops_attached_feed() {
    let mut screen = granted_screen();
    let back = FakeFeed::ok(Facing::Back, "file:///tmp/back.jpg");
    attach(&mut screen, &back);
    assert!(screen.feed().is_some());

    screen.flip();
    assert!(screen.feed().is_none());
}

#[test]
fn test_feed_detached() {
    let mut screen = granted_screen();
    let back = FakeFeed::ok(Facing::Back, "file:///tmp/back.jpg");
    attach(&mut screen, &back);

    // Detach for the other direction does not touch the current feed
    assert!(!screen.feed_detached(Facing::Front));
    assert!(screen.feed().is_some());

    assert!(screen.feed_detached(Facing::Back));
    assert!(screen.feed().is_none());
    assert!(screen.shutter().is_none());
}

#[tokio::test]
async fn test_capture_effect_runs_against_feed() {
    let mut screen = granted_screen();
    let feed = FakeFeed::ok(Facing::Back, "file:///tmp/IMG_7.jpg");
    attach(&mut screen, &feed);

    let Effect::Capture(handle) = screen.shutter() else {
        panic!("expected a capture effect");
    };
    let result = handle.capture().await;

    assert_eq!(
        screen.capture_finished(result),
        CaptureOutcome::Stored { replaced: None }
    );
    assert_eq!(feed.captures.load(Ordering::SeqCst), 1);
    assert_eq!(screen.last_capture().map(ImageRef::uri), Some("file:///tmp/IMG_7.jpg"));
}

#[tokio::test]
async fn test_failing_feed_reports_failure() {
    let mut screen = granted_screen();
    let feed = FakeFeed::failing(Facing::Back, BackendError::FeedClosed);
    attach(&mut screen, &feed);

    let Effect::Capture(handle) = screen.shutter() else {
        panic!("expected a capture effect");
    };
    let outcome = screen.capture_finished(handle.capture().await);
    assert_eq!(outcome, CaptureOutcome::Failed(BackendError::FeedClosed));
}

#[tokio::test]
async fn test_provider_drives_permission() {
    let provider: Arc<dyn CameraProvider> = Arc::new(FakeProvider {
        verdict: Ok(PermissionVerdict::Granted),
    });

    let mut screen = Screen::new();
    assert!(matches!(screen.mount(), Effect::RequestPermission));
    let verdict = provider.request_permission().await.unwrap();
    assert!(screen.permission_resolved(verdict));
    assert!(screen.wants_feed());

    let feed = provider.open_feed(screen.facing()).unwrap();
    let (handle, _frames, _guard) = feed.into_parts();
    assert!(screen.feed_attached(Facing::Back, handle));
    assert_eq!(provider.enumerate_cameras().len(), 1);
}

#[tokio::test]
async fn test_provider_error_is_not_a_verdict() {
    let provider = FakeProvider {
        verdict: Err(BackendError::Portal("no bus".into())),
    };
    assert!(provider.request_permission().await.is_err());
}
