//! Transport errors

use ipc::{FailureDescriptor, FailureKind, FrameError};
use std::time::Duration;
use thiserror::Error;

/// The link to the far side is gone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LinkError {
    #[error("Link closed")]
    Closed,
}

/// A call that produced no reply
#[derive(Debug, Error)]
pub enum TransportError {
    /// No reply within the bound; the far side may or may not have run it
    #[error("No reply to '{operation}' within {after:?}")]
    Timeout { operation: String, after: Duration },

    /// The channel closed while the call was pending
    #[error("Bridge disconnected")]
    Disconnected,

    #[error(transparent)]
    Encode(#[from] FrameError),
}

impl TransportError {
    pub fn kind(&self) -> FailureKind {
        match self {
            TransportError::Timeout { .. } => FailureKind::Timeout,
            TransportError::Disconnected => FailureKind::Disconnected,
            TransportError::Encode(_) => FailureKind::DecodeError,
        }
    }

    /// Converts into the uniform failure shape
    pub fn to_failure(&self) -> FailureDescriptor {
        FailureDescriptor::new(self.kind(), self.to_string())
    }
}

impl From<LinkError> for TransportError {
    fn from(_: LinkError) -> Self {
        TransportError::Disconnected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_failure_shape() {
        let err = TransportError::Timeout {
            operation: "getEditorText".to_string(),
            after: Duration::from_millis(50),
        };
        let failure = err.to_failure();
        assert_eq!(failure.kind, FailureKind::Timeout);
        assert_eq!(failure.message, "No reply to 'getEditorText' within 50ms");
    }

    #[test]
    fn test_link_error_is_disconnect() {
        let err = TransportError::from(LinkError::Closed);
        assert_eq!(err.kind(), FailureKind::Disconnected);
    }
}
