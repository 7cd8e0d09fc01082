//! Invocation errors

use call_transport::TransportError;
use ipc::{FailureCategory, FailureDescriptor, FailureKind};
use thiserror::Error;
use wire_codec::DecodeError;

/// Why an outbound invocation did not produce a result
#[derive(Debug, Error)]
pub enum InvocationError {
    /// No reply was obtained
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The far side replied with a failure
    #[error("{0}")]
    Remote(FailureDescriptor),

    /// The reply payload did not match the declared output type
    #[error("Reply did not match the declared output: {0}")]
    Decode(DecodeError),
}

impl InvocationError {
    pub fn kind(&self) -> FailureKind {
        match self {
            InvocationError::Transport(err) => err.kind(),
            InvocationError::Remote(failure) => failure.kind,
            InvocationError::Decode(_) => FailureKind::DecodeError,
        }
    }

    pub fn category(&self) -> FailureCategory {
        self.kind().category()
    }

    /// Returns the remote failure, if the far side sent one
    pub fn remote(&self) -> Option<&FailureDescriptor> {
        match self {
            InvocationError::Remote(failure) => Some(failure),
            _ => None,
        }
    }

    /// Converts into the uniform failure shape
    pub fn to_failure(&self) -> FailureDescriptor {
        match self {
            InvocationError::Remote(failure) => failure.clone(),
            other => FailureDescriptor::new(other.kind(), other.to_string()),
        }
    }
}

impl From<FailureDescriptor> for InvocationError {
    fn from(failure: FailureDescriptor) -> Self {
        InvocationError::Remote(failure)
    }
}
