//! Envelope types and frame structure

use crate::failure::{FailureDescriptor, FailureKind};
use core_types::InvocationPath;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use wire_codec::WireValue;

/// Correlation identifier of one invocation
///
/// Allocated by the sending transport from a monotonically increasing
/// counter, so it is unique among that transport's outstanding calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(u64);

impl CorrelationId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Call(#{})", self.0)
    }
}

/// Schema version of a module contract
///
/// This enables backward-compatible evolution of module contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Major version (breaking changes)
    pub major: u32,
    /// Minor version (backward-compatible additions)
    pub minor: u32,
}

impl SchemaVersion {
    /// Creates a new schema version
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}", self.major, self.minor)
    }
}

/// Compatibility result for version checking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compatibility {
    /// Versions are compatible
    Compatible,
    /// Caller version is too old, upgrade required
    UpgradeRequired,
    /// Version is not supported (too new)
    Unsupported,
}

/// Version policy of a hosted module
///
/// Defines which caller schema versions the module accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionPolicy {
    /// Current version the module implements
    current: SchemaVersion,
    /// Minimum major version supported (for N-1 compatibility)
    min_major: u32,
}

impl VersionPolicy {
    /// Creates a version policy for the current version
    pub const fn current(major: u32, minor: u32) -> Self {
        Self {
            current: SchemaVersion::new(major, minor),
            min_major: major,
        }
    }

    /// Sets the minimum supported major version
    ///
    /// Example: If current is v3.0 and min_major is 2,
    /// the policy accepts v2.x and v3.x, rejects v1.x and v4.x
    pub const fn with_min_major(mut self, min_major: u32) -> Self {
        self.min_major = min_major;
        self
    }

    /// Checks if an incoming schema version is compatible
    pub fn check_compatibility(&self, incoming: &SchemaVersion) -> Compatibility {
        if incoming.major > self.current.major {
            return Compatibility::Unsupported;
        }
        if incoming.major < self.min_major {
            return Compatibility::UpgradeRequired;
        }
        Compatibility::Compatible
    }

    /// Checks an incoming version, naming the module on failure
    pub fn admit(
        &self,
        path: &InvocationPath,
        incoming: SchemaVersion,
    ) -> Result<(), SchemaMismatchError> {
        match self.check_compatibility(&incoming) {
            Compatibility::Compatible => Ok(()),
            Compatibility::UpgradeRequired => Err(SchemaMismatchError::UpgradeRequired {
                path: path.clone(),
                expected_min: self.min_version(),
                received: incoming,
            }),
            Compatibility::Unsupported => Err(SchemaMismatchError::Unsupported {
                path: path.clone(),
                supported_range: (self.min_version(), self.current),
                received: incoming,
            }),
        }
    }

    /// Returns the current version
    pub fn current_version(&self) -> SchemaVersion {
        self.current
    }

    /// Returns the minimum supported version
    pub fn min_version(&self) -> SchemaVersion {
        SchemaVersion::new(self.min_major, 0)
    }
}

/// Error when a caller's schema version is not admitted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaMismatchError {
    #[error("Schema version too old for module '{path}': received {received}, expected at least {expected_min}. Please upgrade the caller.")]
    UpgradeRequired {
        path: InvocationPath,
        expected_min: SchemaVersion,
        received: SchemaVersion,
    },

    #[error("Schema version not supported by module '{path}': received {received}, supported range {}-{}", supported_range.0, supported_range.1)]
    Unsupported {
        path: InvocationPath,
        supported_range: (SchemaVersion, SchemaVersion),
        received: SchemaVersion,
    },
}

impl From<&SchemaMismatchError> for FailureDescriptor {
    fn from(err: &SchemaMismatchError) -> Self {
        FailureDescriptor::new(FailureKind::IncompatibleVersion, err.to_string())
    }
}

/// An outbound invocation before the transport assigns its correlation id
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationRequest {
    pub path: InvocationPath,
    pub operation: String,
    pub version: SchemaVersion,
    pub oneway: bool,
    pub params: WireValue,
}

impl InvocationRequest {
    /// Creates an acknowledged invocation request
    pub fn new(
        path: InvocationPath,
        operation: impl Into<String>,
        version: SchemaVersion,
        params: WireValue,
    ) -> Self {
        Self {
            path,
            operation: operation.into(),
            version,
            oneway: false,
            params,
        }
    }

    /// Marks the request fire-and-forget (no reply is produced)
    pub fn oneway(mut self) -> Self {
        self.oneway = true;
        self
    }

    /// Stamps the request with its correlation id
    pub fn correlate(self, correlation_id: CorrelationId) -> InvocationEnvelope {
        InvocationEnvelope {
            correlation_id,
            path: self.path,
            operation: self.operation,
            version: self.version,
            oneway: self.oneway,
            params: self.params,
        }
    }
}

/// Request envelope: which operation of which module, with what parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationEnvelope {
    pub correlation_id: CorrelationId,
    pub path: InvocationPath,
    pub operation: String,
    pub version: SchemaVersion,
    #[serde(default)]
    pub oneway: bool,
    pub params: WireValue,
}

impl InvocationEnvelope {
    /// Builds the reply to this envelope
    pub fn reply(&self, outcome: ReplyOutcome) -> ReplyEnvelope {
        ReplyEnvelope {
            correlation_id: self.correlation_id,
            outcome,
        }
    }
}

/// Outcome half of a reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ReplyOutcome {
    Success { result: WireValue },
    Failure { failure: FailureDescriptor },
}

impl ReplyOutcome {
    pub fn success(result: WireValue) -> Self {
        ReplyOutcome::Success { result }
    }

    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        ReplyOutcome::Failure {
            failure: FailureDescriptor::new(kind, message),
        }
    }

    /// Converts into a `Result`
    pub fn into_result(self) -> Result<WireValue, FailureDescriptor> {
        match self {
            ReplyOutcome::Success { result } => Ok(result),
            ReplyOutcome::Failure { failure } => Err(failure),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ReplyOutcome::Success { .. })
    }
}

impl From<FailureDescriptor> for ReplyOutcome {
    fn from(failure: FailureDescriptor) -> Self {
        ReplyOutcome::Failure { failure }
    }
}

/// Reply envelope: exactly one per acknowledged invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyEnvelope {
    pub correlation_id: CorrelationId,
    pub outcome: ReplyOutcome,
}

/// Errors while reading or writing frame text
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("Frame encoding failed: {0}")]
    Encode(serde_json::Error),

    #[error("Malformed frame: {0}")]
    Malformed(serde_json::Error),
}

/// The unit a link carries across the boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "frame", rename_all = "camelCase")]
pub enum Frame {
    Invoke(InvocationEnvelope),
    Reply(ReplyEnvelope),
    /// The sending side is closing the channel
    Close,
}

/// Which frame kind a malformed text claimed to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalvagedFrame {
    Invoke(CorrelationId),
    Reply(CorrelationId),
}

impl Frame {
    /// Serializes this frame to JSON text
    pub fn to_json(&self) -> Result<String, FrameError> {
        serde_json::to_string(self).map_err(FrameError::Encode)
    }

    /// Parses a frame from JSON text
    pub fn from_json(text: &str) -> Result<Self, FrameError> {
        serde_json::from_str(text).map_err(FrameError::Malformed)
    }

    /// Recovers the frame kind and correlation id from text that failed to parse
    ///
    /// This lets a receiver answer a malformed invocation with a failure
    /// instead of leaving its caller waiting for the timeout.
    pub fn salvage(text: &str) -> Option<SalvagedFrame> {
        let value: serde_json::Value = serde_json::from_str(text).ok()?;
        let id = CorrelationId::new(value.get("correlationId")?.as_u64()?);
        match value.get("frame")?.as_str()? {
            "invoke" => Some(SalvagedFrame::Invoke(id)),
            "reply" => Some(SalvagedFrame::Reply(id)),
            _ => None,
        }
    }
}
