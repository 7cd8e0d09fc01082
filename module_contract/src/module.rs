//! Live module handlers

use crate::contract::ModuleContract;
use crate::operation::Operation;
use async_trait::async_trait;
use ipc::{FailureDescriptor, FailureKind};
use thiserror::Error;
use wire_codec::{DecodeError, WireDecode, WireEncode, WireValue};

/// Errors a module reports for one invocation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModuleError {
    /// Parameters did not decode; the operation was not run
    #[error("Bad parameters: {0}")]
    BadParams(DecodeError),

    #[error("Unknown operation '{operation}'")]
    UnknownOperation { operation: String },

    /// The operation ran and rejected this specific request
    #[error("{0}")]
    Rejected(FailureDescriptor),
}

impl ModuleError {
    /// Rejects with a domain failure kind
    pub fn rejected(kind: FailureKind, message: impl Into<String>) -> Self {
        ModuleError::Rejected(FailureDescriptor::new(kind, message))
    }

    /// Converts into the failure payload sent back to the caller
    pub fn into_failure(self) -> FailureDescriptor {
        match self {
            ModuleError::BadParams(err) => FailureDescriptor::bad_params(&err),
            ModuleError::UnknownOperation { operation } => FailureDescriptor::new(
                FailureKind::UnknownOperation,
                format!("Unknown operation '{}'", operation),
            ),
            ModuleError::Rejected(failure) => failure,
        }
    }
}

/// A live handler instance serving one contract
#[async_trait]
pub trait BridgeModule: Send + Sync {
    fn contract(&self) -> &ModuleContract;

    /// Runs one operation with its still-encoded parameter record
    async fn invoke(&self, operation: &str, params: WireValue) -> Result<WireValue, ModuleError>;
}

/// Decodes the parameter record of `O`
pub fn decode_params<O: Operation>(params: &WireValue) -> Result<O::Params, ModuleError> {
    O::Params::from_wire(params).map_err(ModuleError::BadParams)
}

/// Encodes the result of `O`
pub fn encode_output<O: Operation>(output: &O::Output) -> WireValue {
    output.to_wire()
}
