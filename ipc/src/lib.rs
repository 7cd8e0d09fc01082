//! # Bridge Messages
//!
//! This crate defines the envelopes that cross the native↔web boundary.
//!
//! ## Philosophy
//!
//! - **Messages, not shared memory**: The two runtimes share nothing but text
//! - **Typed, not stringly-typed**: Envelopes carry schema versions and wire values
//! - **Correlated**: Every invocation carries an id its single reply echoes
//! - **Failures are payloads**: A failure is a `{kind, message}` value, never silence
//!
//! ## Architecture
//!
//! A [`Frame`] is the unit a link moves. It is one of:
//! - an [`InvocationEnvelope`] (path, operation, version, parameters, correlation id)
//! - a [`ReplyEnvelope`] (correlation id plus success value or [`FailureDescriptor`])
//! - a close notice, sent when one side's surface goes away

pub mod failure;
pub mod message;

pub use failure::{FailureCategory, FailureDescriptor, FailureKind};
pub use message::{
    Compatibility, CorrelationId, Frame, FrameError, InvocationEnvelope, InvocationRequest,
    ReplyEnvelope, ReplyOutcome, SalvagedFrame, SchemaMismatchError, SchemaVersion,
    VersionPolicy,
};
