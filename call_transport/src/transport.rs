//! Correlated calls over a frame link

use crate::config::TransportConfig;
use crate::error::TransportError;
use crate::link::Link;
use async_trait::async_trait;
use ipc::{
    CorrelationId, FailureKind, Frame, InvocationEnvelope, InvocationRequest, ReplyEnvelope,
    ReplyOutcome, SalvagedFrame,
};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::task::Poll;
use tokio::sync::{mpsc, oneshot};

/// Receives invocations that arrive from the far side
#[async_trait]
pub trait InboundHandler: Send + Sync {
    /// Produces the outcome of one invocation
    ///
    /// The transport discards the outcome of oneway invocations.
    async fn handle(&self, envelope: InvocationEnvelope) -> ReplyOutcome;
}

type Slot = oneshot::Sender<Result<ReplyOutcome, TransportError>>;

type Inbound = (Arc<dyn InboundHandler>, InvocationEnvelope);

#[derive(Default)]
struct PendingTable {
    slots: HashMap<CorrelationId, Slot>,
    closed: bool,
}

struct Shared {
    config: TransportConfig,
    link: Box<dyn Link>,
    next_id: AtomicU64,
    pending: Mutex<PendingTable>,
    handler: RwLock<Option<Arc<dyn InboundHandler>>>,
    /// Feeds the task that starts inbound handlers in arrival order
    inbound: Mutex<Option<mpsc::UnboundedSender<Inbound>>>,
}

/// Removes a pending slot when its call future finishes or is dropped
struct PendingGuard<'a> {
    shared: &'a Shared,
    id: CorrelationId,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if self.shared.pending.lock().slots.remove(&self.id).is_some() {
            tracing::debug!(
                transport = %self.shared.config.label,
                id = %self.id,
                "call abandoned by caller"
            );
        }
    }
}

/// One end of the bridge
///
/// Cloning is cheap; clones share the correlation table.
#[derive(Clone)]
pub struct CallTransport {
    shared: Arc<Shared>,
}

/// A non-owning reference to a [`CallTransport`]
#[derive(Clone)]
pub struct WeakTransport {
    shared: Weak<Shared>,
}

impl WeakTransport {
    pub fn upgrade(&self) -> Option<CallTransport> {
        self.shared.upgrade().map(|shared| CallTransport { shared })
    }
}

impl CallTransport {
    /// Creates a transport sending frames over `link`
    pub fn new(config: TransportConfig, link: impl Link + 'static) -> Self {
        Self {
            shared: Arc::new(Shared {
                config,
                link: Box::new(link),
                next_id: AtomicU64::new(1),
                pending: Mutex::new(PendingTable::default()),
                handler: RwLock::new(None),
                inbound: Mutex::new(None),
            }),
        }
    }

    pub fn config(&self) -> &TransportConfig {
        &self.shared.config
    }

    pub fn downgrade(&self) -> WeakTransport {
        WeakTransport {
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// Installs the handler for inbound invocations
    pub fn on_receive(&self, handler: Arc<dyn InboundHandler>) {
        *self.shared.handler.write() = Some(handler);
    }

    fn allocate_id(&self) -> CorrelationId {
        CorrelationId::new(self.shared.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Sends an invocation and waits for its correlated reply
    ///
    /// Resolves with the far side's outcome, or fails with `Timeout` after
    /// the configured bound, or `Disconnected` if the channel closes first.
    /// Dropping the returned future abandons the call; a reply that arrives
    /// afterwards is discarded.
    pub async fn call(&self, request: InvocationRequest) -> Result<ReplyOutcome, TransportError> {
        let operation = request.operation.clone();
        let id = self.allocate_id();
        let (tx, rx) = oneshot::channel();
        {
            let mut table = self.shared.pending.lock();
            if table.closed {
                return Err(TransportError::Disconnected);
            }
            table.slots.insert(id, tx);
        }
        let _guard = PendingGuard {
            shared: &self.shared,
            id,
        };

        let envelope = InvocationRequest {
            oneway: false,
            ..request
        }
        .correlate(id);
        let text = Frame::Invoke(envelope).to_json()?;
        self.shared.link.send(text)?;
        tracing::debug!(transport = %self.shared.config.label, %id, %operation, "call sent");

        let after = self.shared.config.call_timeout;
        match tokio::time::timeout(after, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(TransportError::Disconnected),
            Err(_) => {
                self.shared.pending.lock().slots.remove(&id);
                tracing::warn!(
                    transport = %self.shared.config.label,
                    %id,
                    %operation,
                    ?after,
                    "call timed out"
                );
                Err(TransportError::Timeout { operation, after })
            }
        }
    }

    /// Sends a fire-and-forget invocation
    ///
    /// Never waits; no reply slot is created.
    pub fn notify(&self, request: InvocationRequest) -> Result<(), TransportError> {
        if self.is_closed() {
            return Err(TransportError::Disconnected);
        }
        let id = self.allocate_id();
        let text = Frame::Invoke(request.oneway().correlate(id)).to_json()?;
        self.shared.link.send(text)?;
        Ok(())
    }

    /// Entry point for frame text arriving from the far side
    ///
    /// Inbound handlers are started one at a time, in the order their frames
    /// arrive, and then run concurrently. This must be called from within a
    /// Tokio runtime.
    pub fn receive(&self, text: &str) {
        match Frame::from_json(text) {
            Ok(Frame::Reply(reply)) => self.complete(reply.correlation_id, Ok(reply.outcome)),
            Ok(Frame::Invoke(envelope)) => self.dispatch(envelope),
            Ok(Frame::Close) => {
                tracing::info!(transport = %self.shared.config.label, "peer closed the bridge");
                self.shut_down(false);
            }
            Err(err) => match Frame::salvage(text) {
                Some(SalvagedFrame::Invoke(id)) => {
                    tracing::warn!(transport = %self.shared.config.label, %id, %err, "malformed invocation");
                    self.send_reply(ReplyEnvelope {
                        correlation_id: id,
                        outcome: ReplyOutcome::failure(FailureKind::DecodeError, err.to_string()),
                    });
                }
                Some(SalvagedFrame::Reply(id)) => {
                    tracing::warn!(transport = %self.shared.config.label, %id, %err, "malformed reply");
                    self.complete(
                        id,
                        Ok(ReplyOutcome::failure(FailureKind::DecodeError, err.to_string())),
                    );
                }
                None => {
                    tracing::warn!(transport = %self.shared.config.label, %err, "dropping unreadable frame");
                }
            },
        }
    }

    fn complete(&self, id: CorrelationId, result: Result<ReplyOutcome, TransportError>) {
        let slot = self.shared.pending.lock().slots.remove(&id);
        match slot {
            Some(tx) => {
                if tx.send(result).is_err() {
                    tracing::debug!(transport = %self.shared.config.label, %id, "caller gone before reply");
                }
            }
            None => {
                tracing::debug!(transport = %self.shared.config.label, %id, "late reply discarded");
            }
        }
    }

    fn dispatch(&self, envelope: InvocationEnvelope) {
        if self.is_closed() {
            tracing::debug!(transport = %self.shared.config.label, id = %envelope.correlation_id, "invocation after close dropped");
            return;
        }
        let handler = self.shared.handler.read().clone();
        let Some(handler) = handler else {
            if !envelope.oneway {
                self.send_reply(envelope.reply(ReplyOutcome::failure(
                    FailureKind::ModuleNotFound,
                    format!("No modules are hosted on '{}'", self.shared.config.label),
                )));
            }
            return;
        };

        let mut inbound = self.shared.inbound.lock();
        let queue = inbound.get_or_insert_with(|| self.spawn_starter());
        if queue.send((handler, envelope)).is_err() {
            tracing::debug!(transport = %self.shared.config.label, "inbound queue gone");
        }
    }

    fn spawn_starter(&self) -> mpsc::UnboundedSender<Inbound> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Inbound>();
        let target = self.downgrade();
        tokio::spawn(async move {
            while let Some((handler, envelope)) = rx.recv().await {
                let Some(transport) = target.upgrade() else {
                    break;
                };
                transport.start(handler, envelope).await;
            }
        });
        tx
    }

    /// Runs a handler up to its first suspension point, then leaves the rest
    /// to its own task
    ///
    /// Whatever a handler does before it first yields happens before the
    /// next envelope is looked at.
    async fn start(&self, handler: Arc<dyn InboundHandler>, envelope: InvocationEnvelope) {
        let id = envelope.correlation_id;
        if self.is_closed() {
            tracing::debug!(transport = %self.shared.config.label, %id, "invocation after close dropped");
            return;
        }
        let oneway = envelope.oneway;
        let mut running = Box::pin(async move { handler.handle(envelope).await });
        match futures::poll!(&mut running) {
            Poll::Ready(outcome) => self.finish(id, oneway, outcome),
            Poll::Pending => {
                let this = self.clone();
                tokio::spawn(async move {
                    let outcome = running.await;
                    this.finish(id, oneway, outcome);
                });
            }
        }
    }

    fn finish(&self, id: CorrelationId, oneway: bool, outcome: ReplyOutcome) {
        if !oneway {
            self.send_reply(ReplyEnvelope {
                correlation_id: id,
                outcome,
            });
        }
    }

    fn send_reply(&self, reply: ReplyEnvelope) {
        if self.is_closed() {
            return;
        }
        let id = reply.correlation_id;
        let sent = Frame::Reply(reply)
            .to_json()
            .map_err(TransportError::from)
            .and_then(|text| self.shared.link.send(text).map_err(TransportError::from));
        if let Err(err) = sent {
            tracing::debug!(transport = %self.shared.config.label, %id, %err, "reply not sent");
        }
    }

    /// Closes the channel
    ///
    /// Every pending call fails with `Disconnected` and the far side is told
    /// to do the same. Closing twice is a no-op.
    pub fn close(&self) {
        self.shut_down(true);
    }

    fn shut_down(&self, notify_peer: bool) {
        let drained: Vec<Slot> = {
            let mut table = self.shared.pending.lock();
            if table.closed {
                return;
            }
            table.closed = true;
            table.slots.drain().map(|(_, slot)| slot).collect()
        };
        self.shared.inbound.lock().take();
        let rejected = drained.len();
        for slot in drained {
            let _ = slot.send(Err(TransportError::Disconnected));
        }
        if notify_peer {
            if let Ok(text) = Frame::Close.to_json() {
                let _ = self.shared.link.send(text);
            }
        }
        tracing::info!(transport = %self.shared.config.label, rejected, "bridge closed");
    }

    pub fn is_closed(&self) -> bool {
        self.shared.pending.lock().closed
    }

    /// Returns the number of calls awaiting a reply
    pub fn pending_count(&self) -> usize {
        self.shared.pending.lock().slots.len()
    }
}

impl fmt::Debug for CallTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallTransport")
            .field("label", &self.shared.config.label)
            .field("pending", &self.pending_count())
            .field("closed", &self.is_closed())
            .finish()
    }
}
