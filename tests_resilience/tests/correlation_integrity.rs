//! Correlation Integrity Tests
//!
//! Validates that replies are matched to callers by correlation id, not by
//! send order.

use call_transport::{Direction, FaultPlan, FrameFault};
use futures::future::join_all;
use std::time::Duration;
use tests_resilience::Session;

/// Test: Two concurrent calls whose replies arrive in reverse order
///
/// This validates that:
/// 1. The slow call is sent first, the fast call second
/// 2. The fast call's reply arrives first
/// 3. Each caller receives its own result, never the other's
#[tokio::test(start_paused = true)]
async fn test_out_of_order_replies_resolve_their_own_callers() {
    let session = Session::healthy();

    let (slow, fast) = tokio::join!(session.echo("slow", 300), session.echo("fast", 10));

    assert_eq!(slow.unwrap(), "slow");
    assert_eq!(fast.unwrap(), "fast");
    assert_eq!(session.pacer.effects(), vec!["fast", "slow"]);
    assert_eq!(session.native.router().transport().pending_count(), 0);
}

/// Test: Different operations on different modules interleave safely
#[tokio::test(start_paused = true)]
async fn test_interleaved_operations_across_modules() {
    let session = Session::healthy();
    let core = session.core();

    let (echo, reset) = tokio::join!(session.echo("pacer", 200), core.reset_editor("abc", false));
    reset.unwrap();
    assert_eq!(echo.unwrap(), "pacer");

    let (text, echo) = tokio::join!(core.get_editor_text(), session.echo("again", 0));
    assert_eq!(text.unwrap(), "abc");
    assert_eq!(echo.unwrap(), "again");
}

/// Test: Frames held back in transit keep their order per direction
#[tokio::test(start_paused = true)]
async fn test_delayed_frames_keep_fifo_order() {
    let faults = FaultPlan::new().with_fault(
        Direction::NativeToWeb,
        FrameFault::DelayNext {
            count: 1,
            duration: Duration::from_millis(100),
        },
    );
    let session = Session::start(faults, Duration::from_secs(1));
    let core = session.core();

    // The reset is held back; the insert queues behind it.
    let (reset, insert) = tokio::join!(
        core.reset_editor("", false),
        core.insert_text("hello", 0, 0)
    );
    reset.unwrap();
    insert.unwrap();
    assert_eq!(session.document(), "hello");
}

/// Test: Many concurrent calls all resolve with matching results
#[tokio::test(start_paused = true)]
async fn test_many_concurrent_calls() {
    let session = Session::healthy();

    let calls = (0..20u32).map(|i| {
        let session = &session;
        async move {
            let text = format!("call-{}", i);
            let got = session.echo(&text, (20 - i) * 5).await.unwrap();
            assert_eq!(got, text);
        }
    });
    join_all(calls).await;

    assert_eq!(session.pacer.effects().len(), 20);
    assert_eq!(session.native.router().transport().pending_count(), 0);
}
