//! Failure payloads
//!
//! Every failure that reaches a caller has the same minimal shape:
//! `{ "kind": "...", "message": "..." }`.

use serde::{Deserialize, Serialize};
use std::fmt;
use wire_codec::DecodeError;

/// Failure taxonomy shared by both sides of the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    /// A payload did not match its declared shape
    DecodeError,
    /// Inbound parameters failed to decode; the handler was skipped
    BadParams,
    ModuleNotFound,
    /// The module was torn down with its surface
    ModuleGone,
    UnknownOperation,
    IncompatibleVersion,
    /// Editor-level: a text range is outside the document
    RangeError,
    /// Editor-level: a replace granularity tag is not known
    UnknownGranularity,
    /// A handler rejected the request for a reason of its own
    OperationFailed,
    /// A handler panicked
    Internal,
    Timeout,
    Disconnected,
}

/// Who is at fault for a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCategory {
    /// The request itself was malformed
    Protocol,
    /// The addressed module or operation does not exist (anymore)
    Routing,
    /// The far side understood the request and rejected it
    Operation,
    /// No reply was obtained; the effect is unknown
    Transport,
}

impl FailureKind {
    /// Returns the wire name of this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::DecodeError => "DecodeError",
            FailureKind::BadParams => "BadParams",
            FailureKind::ModuleNotFound => "ModuleNotFound",
            FailureKind::ModuleGone => "ModuleGone",
            FailureKind::UnknownOperation => "UnknownOperation",
            FailureKind::IncompatibleVersion => "IncompatibleVersion",
            FailureKind::RangeError => "RangeError",
            FailureKind::UnknownGranularity => "UnknownGranularity",
            FailureKind::OperationFailed => "OperationFailed",
            FailureKind::Internal => "Internal",
            FailureKind::Timeout => "Timeout",
            FailureKind::Disconnected => "Disconnected",
        }
    }

    pub fn category(&self) -> FailureCategory {
        match self {
            FailureKind::DecodeError | FailureKind::BadParams | FailureKind::IncompatibleVersion => {
                FailureCategory::Protocol
            }
            FailureKind::ModuleNotFound
            | FailureKind::ModuleGone
            | FailureKind::UnknownOperation => FailureCategory::Routing,
            FailureKind::RangeError
            | FailureKind::UnknownGranularity
            | FailureKind::OperationFailed
            | FailureKind::Internal => FailureCategory::Operation,
            FailureKind::Timeout | FailureKind::Disconnected => FailureCategory::Transport,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured failure carried in a reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureDescriptor {
    pub kind: FailureKind,
    pub message: String,
}

impl FailureDescriptor {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Parameters failed to decode against the declared shape
    pub fn bad_params(error: &DecodeError) -> Self {
        Self::new(FailureKind::BadParams, error.to_string())
    }

    /// A payload failed to decode
    pub fn decode(error: &DecodeError) -> Self {
        Self::new(FailureKind::DecodeError, error.to_string())
    }

    pub fn category(&self) -> FailureCategory {
        self.kind.category()
    }
}

impl fmt::Display for FailureDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for FailureDescriptor {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_payload_shape() {
        let failure = FailureDescriptor::new(FailureKind::RangeError, "from > to");
        let json = serde_json::to_string(&failure).unwrap();
        assert_eq!(json, r#"{"kind":"RangeError","message":"from > to"}"#);
    }

    #[test]
    fn test_kind_names_match_serde() {
        for kind in [
            FailureKind::DecodeError,
            FailureKind::BadParams,
            FailureKind::ModuleNotFound,
            FailureKind::ModuleGone,
            FailureKind::UnknownOperation,
            FailureKind::IncompatibleVersion,
            FailureKind::RangeError,
            FailureKind::UnknownGranularity,
            FailureKind::OperationFailed,
            FailureKind::Internal,
            FailureKind::Timeout,
            FailureKind::Disconnected,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn test_categories_separate_malformed_from_rejected() {
        assert_eq!(FailureKind::BadParams.category(), FailureCategory::Protocol);
        assert_eq!(FailureKind::RangeError.category(), FailureCategory::Operation);
        assert_eq!(FailureKind::ModuleGone.category(), FailureCategory::Routing);
        assert_eq!(FailureKind::Timeout.category(), FailureCategory::Transport);
    }

    #[test]
    fn test_bad_params_from_decode_error() {
        let err = DecodeError::MissingField {
            field: "text".to_string(),
        };
        let failure = FailureDescriptor::bad_params(&err);
        assert_eq!(failure.kind, FailureKind::BadParams);
        assert_eq!(failure.message, "missing required field 'text'");
        assert_eq!(failure.to_string(), "BadParams: missing required field 'text'");
    }
}
