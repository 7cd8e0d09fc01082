//! In-process link pair
//!
//! Joins two transports with FIFO queues, one per direction. Used by tests
//! and the host binary in place of a real web view.

use crate::config::TransportConfig;
use crate::error::LinkError;
use crate::fault::{Direction, FaultInjector, FaultPlan, Verdict};
use crate::link::Link;
use crate::transport::{CallTransport, WeakTransport};
use parking_lot::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;

struct Queued {
    text: String,
    delay: Option<Duration>,
}

struct QueueLink {
    direction: Direction,
    tx: mpsc::UnboundedSender<Queued>,
    faults: Mutex<FaultInjector>,
}

impl Link for QueueLink {
    fn send(&self, frame: String) -> Result<(), LinkError> {
        let delay = match self.faults.lock().judge(&frame) {
            Verdict::Drop => {
                tracing::debug!(direction = ?self.direction, "frame dropped by fault plan");
                return Ok(());
            }
            Verdict::Deliver => None,
            Verdict::DeliverAfter(duration) => Some(duration),
        };
        self.tx
            .send(Queued { text: frame, delay })
            .map_err(|_| LinkError::Closed)
    }
}

fn pump(mut rx: mpsc::UnboundedReceiver<Queued>, target: WeakTransport) {
    tokio::spawn(async move {
        while let Some(queued) = rx.recv().await {
            if let Some(delay) = queued.delay {
                tokio::time::sleep(delay).await;
            }
            let Some(transport) = target.upgrade() else {
                break;
            };
            transport.receive(&queued.text);
        }
    });
}

/// Builds a native and a web transport joined to each other
///
/// Must be called from within a Tokio runtime.
pub fn connect(
    native: TransportConfig,
    web: TransportConfig,
    faults: FaultPlan,
) -> (CallTransport, CallTransport) {
    let (to_web, from_native) = mpsc::unbounded_channel();
    let (to_native, from_web) = mpsc::unbounded_channel();

    let native = CallTransport::new(
        native,
        QueueLink {
            direction: Direction::NativeToWeb,
            tx: to_web,
            faults: Mutex::new(FaultInjector::new(faults.faults(Direction::NativeToWeb))),
        },
    );
    let web = CallTransport::new(
        web,
        QueueLink {
            direction: Direction::WebToNative,
            tx: to_native,
            faults: Mutex::new(FaultInjector::new(faults.faults(Direction::WebToNative))),
        },
    );

    pump(from_native, web.downgrade());
    pump(from_web, native.downgrade());
    (native, web)
}
