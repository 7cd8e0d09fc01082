//! Inbound dispatch

use async_trait::async_trait;
use call_transport::InboundHandler;
use futures::FutureExt;
use ipc::{FailureDescriptor, FailureKind, InvocationEnvelope, ReplyOutcome};
use module_registry::{ModuleRegistry, RegistryError};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use wire_codec::WireValue;

/// Resolves inbound envelopes against a registry and runs their handlers
pub struct Dispatcher {
    registry: Arc<ModuleRegistry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<ModuleRegistry>) -> Self {
        Self { registry }
    }

    /// Runs one inbound invocation
    ///
    /// Checks happen in a fixed order: module, version, operation, delivery
    /// mode, parameter shape. The handler only runs when all of them pass.
    /// A handler still running when its module is unregistered is abandoned
    /// and the caller gets `ModuleGone`.
    pub async fn dispatch(&self, envelope: InvocationEnvelope) -> Result<WireValue, FailureDescriptor> {
        let InvocationEnvelope {
            correlation_id,
            path,
            operation,
            version,
            oneway,
            params,
        } = envelope;

        let entry = self.registry.resolve(&path).map_err(routing_failure)?;
        let contract = entry.contract();

        contract
            .version
            .admit(&path, version)
            .map_err(|err| FailureDescriptor::from(&err))?;

        let signature = contract.operation(&operation).ok_or_else(|| {
            FailureDescriptor::new(
                FailureKind::UnknownOperation,
                format!("Module '{}' has no operation '{}'", path, operation),
            )
        })?;

        // A oneway envelope for an acknowledged operation is refused too; the
        // transport drops the failure since nobody waits for it.
        if signature.delivery.is_oneway() != oneway {
            let sent = if oneway { "as a notification" } else { "expecting a reply" };
            return Err(FailureDescriptor::new(
                FailureKind::BadParams,
                format!(
                    "Operation '{}' on '{}' is {:?} but was sent {}",
                    operation, path, signature.delivery, sent
                ),
            ));
        }

        signature
            .params
            .validate(&params)
            .map_err(|err| FailureDescriptor::bad_params(&err))?;

        let module = Arc::clone(entry.module());
        let retirement = entry.retirement();
        let run = AssertUnwindSafe(module.invoke(&operation, params)).catch_unwind();

        tokio::select! {
            biased;
            _ = retirement.wait() => {
                tracing::debug!(%path, %operation, id = %correlation_id, "module retired mid-call");
                Err(FailureDescriptor::new(
                    FailureKind::ModuleGone,
                    format!("Module '{}' was torn down during '{}'", path, operation),
                ))
            }
            result = run => match result {
                Ok(Ok(output)) => Ok(output),
                Ok(Err(err)) => Err(err.into_failure()),
                Err(panic) => {
                    let message = panic_message(panic.as_ref());
                    tracing::error!(%path, %operation, %message, "handler panicked");
                    Err(FailureDescriptor::new(
                        FailureKind::Internal,
                        format!("Handler for '{}' panicked: {}", operation, message),
                    ))
                }
            },
        }
    }
}

fn routing_failure(err: RegistryError) -> FailureDescriptor {
    let kind = match err {
        RegistryError::Gone(_) => FailureKind::ModuleGone,
        _ => FailureKind::ModuleNotFound,
    };
    FailureDescriptor::new(kind, err.to_string())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[async_trait]
impl InboundHandler for Dispatcher {
    async fn handle(&self, envelope: InvocationEnvelope) -> ReplyOutcome {
        let id = envelope.correlation_id;
        match self.dispatch(envelope).await {
            Ok(result) => ReplyOutcome::success(result),
            Err(failure) => {
                tracing::debug!(%id, %failure, "invocation failed");
                ReplyOutcome::from(failure)
            }
        }
    }
}
