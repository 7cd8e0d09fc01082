//! Deterministic fault injection for loopback links
//!
//! Faults are applied to frames as they enter the link, in send order, so a
//! test that drops "the next reply" always drops the same frame.
//!
//! ## Example
//!
//! ```
//! use call_transport::{Direction, FaultPlan, FrameFault};
//!
//! let plan = FaultPlan::new()
//!     .with_fault(Direction::WebToNative, FrameFault::DropReplies { count: 1 })
//!     .with_fault(
//!         Direction::NativeToWeb,
//!         FrameFault::DropMatching { operation: "clearEditor".to_string() },
//!     );
//! assert_eq!(plan.faults(Direction::WebToNative).len(), 1);
//! ```

use ipc::Frame;
use std::time::Duration;

/// Which way a frame travels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    NativeToWeb,
    WebToNative,
}

/// A fault to inject into frame delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameFault {
    /// Drop the next N frames of any kind
    DropNext { count: usize },

    /// Drop every invocation of the named operation
    DropMatching { operation: String },

    /// Drop the next N reply frames
    DropReplies { count: usize },

    /// Hold the next N frames back by a duration
    ///
    /// Later frames queue behind a held frame, so FIFO order is kept.
    DelayNext { count: usize, duration: Duration },
}

/// Faults to apply, per direction
#[derive(Debug, Clone, Default)]
pub struct FaultPlan {
    native_to_web: Vec<FrameFault>,
    web_to_native: Vec<FrameFault>,
}

impl FaultPlan {
    /// Creates an empty plan
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a fault for one direction
    pub fn with_fault(mut self, direction: Direction, fault: FrameFault) -> Self {
        match direction {
            Direction::NativeToWeb => self.native_to_web.push(fault),
            Direction::WebToNative => self.web_to_native.push(fault),
        }
        self
    }

    pub fn faults(&self, direction: Direction) -> &[FrameFault] {
        match direction {
            Direction::NativeToWeb => &self.native_to_web,
            Direction::WebToNative => &self.web_to_native,
        }
    }
}

/// What to do with one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Verdict {
    Deliver,
    DeliverAfter(Duration),
    Drop,
}

/// Stateful application of one direction's faults
#[derive(Debug, Default)]
pub(crate) struct FaultInjector {
    drop_next: usize,
    drop_replies: usize,
    drop_operations: Vec<String>,
    delay_next: usize,
    delay: Duration,
}

impl FaultInjector {
    pub(crate) fn new(faults: &[FrameFault]) -> Self {
        let mut injector = Self::default();
        for fault in faults {
            match fault {
                FrameFault::DropNext { count } => injector.drop_next += count,
                FrameFault::DropReplies { count } => injector.drop_replies += count,
                FrameFault::DropMatching { operation } => {
                    injector.drop_operations.push(operation.clone())
                }
                FrameFault::DelayNext { count, duration } => {
                    injector.delay_next += count;
                    injector.delay = *duration;
                }
            }
        }
        injector
    }

    /// Decides the fate of one frame
    pub(crate) fn judge(&mut self, frame_text: &str) -> Verdict {
        if self.drop_next > 0 {
            self.drop_next -= 1;
            return Verdict::Drop;
        }

        // Only parse when a content-based fault is armed.
        if self.drop_replies > 0 || !self.drop_operations.is_empty() {
            match Frame::from_json(frame_text) {
                Ok(Frame::Reply(_)) if self.drop_replies > 0 => {
                    self.drop_replies -= 1;
                    return Verdict::Drop;
                }
                Ok(Frame::Invoke(envelope))
                    if self.drop_operations.contains(&envelope.operation) =>
                {
                    return Verdict::Drop;
                }
                _ => {}
            }
        }

        if self.delay_next > 0 {
            self.delay_next -= 1;
            return Verdict::DeliverAfter(self.delay);
        }

        Verdict::Deliver
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::InvocationPath;
    use ipc::{CorrelationId, InvocationRequest, ReplyEnvelope, ReplyOutcome, SchemaVersion};
    use wire_codec::WireValue;

    fn invoke(operation: &str) -> String {
        let request = InvocationRequest::new(
            InvocationPath::new("core").unwrap(),
            operation,
            SchemaVersion::new(1, 0),
            WireValue::empty_record(),
        );
        Frame::Invoke(request.correlate(CorrelationId::new(1)))
            .to_json()
            .unwrap()
    }

    fn reply() -> String {
        Frame::Reply(ReplyEnvelope {
            correlation_id: CorrelationId::new(1),
            outcome: ReplyOutcome::success(WireValue::Null),
        })
        .to_json()
        .unwrap()
    }

    #[test]
    fn test_empty_plan_delivers() {
        let mut injector = FaultInjector::new(&[]);
        assert_eq!(injector.judge(&invoke("clearEditor")), Verdict::Deliver);
        assert_eq!(injector.judge(&reply()), Verdict::Deliver);
    }

    #[test]
    fn test_drop_next() {
        let mut injector = FaultInjector::new(&[FrameFault::DropNext { count: 2 }]);
        assert_eq!(injector.judge(&invoke("a")), Verdict::Drop);
        assert_eq!(injector.judge(&reply()), Verdict::Drop);
        assert_eq!(injector.judge(&invoke("a")), Verdict::Deliver);
    }

    #[test]
    fn test_drop_replies_skips_invocations() {
        let mut injector = FaultInjector::new(&[FrameFault::DropReplies { count: 1 }]);
        assert_eq!(injector.judge(&invoke("a")), Verdict::Deliver);
        assert_eq!(injector.judge(&reply()), Verdict::Drop);
        assert_eq!(injector.judge(&reply()), Verdict::Deliver);
    }

    #[test]
    fn test_drop_matching_operation() {
        let mut injector = FaultInjector::new(&[FrameFault::DropMatching {
            operation: "insertText".to_string(),
        }]);
        assert_eq!(injector.judge(&invoke("insertText")), Verdict::Drop);
        assert_eq!(injector.judge(&invoke("insertText")), Verdict::Drop);
        assert_eq!(injector.judge(&invoke("clearEditor")), Verdict::Deliver);
    }

    #[test]
    fn test_delay_next() {
        let delay = Duration::from_millis(30);
        let mut injector = FaultInjector::new(&[FrameFault::DelayNext {
            count: 1,
            duration: delay,
        }]);
        assert_eq!(injector.judge(&reply()), Verdict::DeliverAfter(delay));
        assert_eq!(injector.judge(&reply()), Verdict::Deliver);
    }

    #[test]
    fn test_plan_directions_are_separate() {
        let plan = FaultPlan::new().with_fault(Direction::NativeToWeb, FrameFault::DropNext { count: 1 });
        assert_eq!(plan.faults(Direction::NativeToWeb).len(), 1);
        assert!(plan.faults(Direction::WebToNative).is_empty());
    }
}
