//! Delivery Order Tests
//!
//! Validates that invocations sent in one direction take effect on the far
//! side in the order they were sent, on a multi-threaded runtime.

use tests_resilience::Session;

/// Test: A burst of hover notifications lands in send order
///
/// This validates that:
/// 1. Twenty notifications are sent back to back without waiting
/// 2. The last position the editor sees is the last one sent
/// 3. An acknowledged call sent afterwards observes all of them
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_hover_burst_applies_in_send_order() {
    for _ in 0..20 {
        let session = Session::healthy();
        let core = session.core();

        for i in 0..20 {
            core.handle_mouse_entered(f64::from(i), 0.0).unwrap();
        }
        core.get_editor_text().await.unwrap();

        let hover = session.editor.lock().snapshot().hover;
        assert_eq!(hover.entered, 20);
        assert_eq!(hover.last, Some((19.0, 0.0)));
    }
}

/// Test: Enter followed by exit leaves the pointer outside
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_enter_then_exit_ends_outside() {
    for _ in 0..20 {
        let session = Session::healthy();
        let core = session.core();

        core.handle_mouse_entered(5.0, 5.0).unwrap();
        core.handle_mouse_exited(6.0, 6.0).unwrap();
        core.get_editor_text().await.unwrap();

        let hover = session.editor.lock().snapshot().hover;
        assert!(!hover.inside);
        assert_eq!(hover.last, Some((6.0, 6.0)));
    }
}

/// Test: Two concurrent inserts apply in the order they were sent
///
/// This validates that:
/// 1. `join!` sends the first insert before the second
/// 2. The second insert's position is only valid after the first applied
/// 3. Both succeed and the document reads "ab" every time
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_inserts_apply_in_send_order() {
    let session = Session::healthy();
    let core = session.core();

    for _ in 0..50 {
        core.clear_editor().await.unwrap();
        let (first, second) = tokio::join!(core.insert_text("a", 0, 0), core.insert_text("b", 1, 1));
        first.unwrap();
        second.unwrap();
        assert_eq!(session.document(), "ab");
    }
}
