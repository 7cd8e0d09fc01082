//! Editor Operation Tests
//!
//! Validates the core module's bridge-visible behavior end to end, from the
//! native client through the transport to the web-side engine.

use call_transport::{Direction, FaultPlan, FrameFault};
use editor_core::ReplaceGranularity;
use ipc::{FailureCategory, FailureKind};
use std::time::Duration;
use tests_resilience::Session;
use wire_codec::EnumTag;

/// Test: Resetting twice with the same arguments is idempotent
#[tokio::test]
async fn test_reset_is_idempotent() {
    let session = Session::healthy();
    let core = session.core();

    core.reset_editor("abc", false).await.unwrap();
    assert_eq!(core.get_editor_text().await.unwrap(), "abc");
    core.reset_editor("abc", false).await.unwrap();
    assert_eq!(core.get_editor_text().await.unwrap(), "abc");
}

/// Test: Clearing keeps the read-only flag
#[tokio::test]
async fn test_clear_keeps_read_only_flag() {
    let session = Session::healthy();
    let core = session.core();

    core.reset_editor("locked", true).await.unwrap();
    core.clear_editor().await.unwrap();
    assert_eq!(core.get_editor_text().await.unwrap(), "");
    assert!(session.editor.lock().snapshot().read_only);
}

/// Test: Invalid ranges fail with `RangeError` and change nothing
#[tokio::test]
async fn test_range_validation() {
    let session = Session::healthy();
    let core = session.core();
    core.reset_editor("abc", false).await.unwrap();

    for (from, to) in [(5, 2), (0, 4), (-1, 1), (4, 4)] {
        let err = core.insert_text("x", from, to).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::RangeError, "range {}..{}", from, to);
        assert_eq!(err.category(), FailureCategory::Operation);
    }
    assert_eq!(core.get_editor_text().await.unwrap(), "abc");

    core.insert_text("x", 3, 3).await.unwrap();
    assert_eq!(core.get_editor_text().await.unwrap(), "abcx");
}

/// Test: Positions count UTF-16 code units
#[tokio::test]
async fn test_positions_are_utf16_units() {
    let session = Session::healthy();
    let core = session.core();
    core.reset_editor("a😀b", false).await.unwrap();

    // The emoji takes two units; position 2 is inside it.
    let err = core.insert_text("x", 2, 2).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::RangeError);

    core.insert_text("x", 3, 4).await.unwrap();
    assert_eq!(core.get_editor_text().await.unwrap(), "a😀x");
}

/// Test: An unknown granularity fails and leaves the document unchanged
#[tokio::test]
async fn test_unknown_granularity() {
    let session = Session::healthy();
    let core = session.core();
    core.reset_editor("keep me", false).await.unwrap();

    let err = core
        .replace_text("x", EnumTag::<ReplaceGranularity>::new("not-a-real-tag"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::UnknownGranularity);
    assert_eq!(err.category(), FailureCategory::Operation);
    assert_eq!(core.get_editor_text().await.unwrap(), "keep me");
}

/// Test: Insert into an empty document, then blank the line
#[tokio::test]
async fn test_hello_then_replace_line() {
    let session = Session::healthy();
    let core = session.core();

    core.insert_text("hello", 0, 0).await.unwrap();
    assert_eq!(core.get_editor_text().await.unwrap(), "hello");

    core.replace_text("", ReplaceGranularity::Line).await.unwrap();
    assert_eq!(core.get_editor_text().await.unwrap(), "");
}

/// Test: Line replacement only touches the caret's line
#[tokio::test]
async fn test_replace_line_in_multiline_document() {
    let session = Session::healthy();
    let core = session.core();

    core.reset_editor("", false).await.unwrap();
    core.insert_text("hello\nworld", 0, 0).await.unwrap();
    core.replace_text("there", ReplaceGranularity::Line).await.unwrap();
    assert_eq!(core.get_editor_text().await.unwrap(), "hello\nthere");

    core.replace_text("all", ReplaceGranularity::WholeDocument)
        .await
        .unwrap();
    assert_eq!(core.get_editor_text().await.unwrap(), "all");
}

/// Test: Reads are never stale after a completed write
#[tokio::test]
async fn test_reads_follow_writes() {
    let session = Session::healthy();
    let core = session.core();

    for i in 0..10 {
        let text = format!("revision {}", i);
        core.reset_editor(&text, false).await.unwrap();
        assert_eq!(core.get_editor_text().await.unwrap(), text);
    }
}

/// Test: Hover notifications never block or fail the caller
///
/// This validates that:
/// 1. Repeated and duplicate notifications are accepted
/// 2. A dropped notification is not an error
/// 3. The channel keeps working afterwards
#[tokio::test(start_paused = true)]
async fn test_hover_notifications_never_fail() {
    let faults = FaultPlan::new().with_fault(
        Direction::NativeToWeb,
        FrameFault::DropMatching {
            operation: "handleMouseExited".to_string(),
        },
    );
    let session = Session::start(faults, Duration::from_millis(100));
    let core = session.core();

    for _ in 0..3 {
        core.handle_mouse_entered(10.0, 20.0).unwrap();
        core.handle_mouse_entered(10.0, 20.0).unwrap();
        core.handle_mouse_exited(30.0, 40.0).unwrap();
    }
    assert_eq!(session.native.router().transport().pending_count(), 0);

    // The acknowledged call queues behind the notifications.
    assert_eq!(core.get_editor_text().await.unwrap(), "");
    let hover = session.editor.lock().snapshot().hover;
    assert_eq!(hover.entered, 6);
    assert_eq!(hover.exited, 0);
    assert!(hover.inside);
}

/// Test: Notifications to a torn-down module are silently dropped
#[tokio::test]
async fn test_hover_after_teardown_is_silent() {
    let session = Session::healthy();
    let core = session.core();
    session.web.registry().teardown();

    core.handle_mouse_entered(1.0, 1.0).unwrap();
    core.handle_mouse_exited(1.0, 1.0).unwrap();

    let err = core.get_editor_text().await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::ModuleGone);
}

/// Test: Non-finite pointer coordinates cross the bridge intact
///
/// This validates that:
/// 1. An infinite coordinate reaches the editor as infinity
/// 2. A NaN coordinate reaches the editor as NaN
/// 3. The notifications are not lost as unreadable frames
#[tokio::test]
async fn test_non_finite_hover_coordinates() {
    let session = Session::healthy();
    let core = session.core();

    core.handle_mouse_entered(f64::INFINITY, f64::NAN).unwrap();
    core.get_editor_text().await.unwrap();
    let (x, y) = session.editor.lock().snapshot().hover.last.unwrap();
    assert_eq!(x, f64::INFINITY);
    assert!(y.is_nan());

    core.handle_mouse_exited(f64::NEG_INFINITY, 2.5).unwrap();
    core.get_editor_text().await.unwrap();
    let hover = session.editor.lock().snapshot().hover;
    assert_eq!(hover.entered, 1);
    assert_eq!(hover.exited, 1);
    assert_eq!(hover.last, Some((f64::NEG_INFINITY, 2.5)));
}
