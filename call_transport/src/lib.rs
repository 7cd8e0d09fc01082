//! # Call Transport
//!
//! Moves serialized invocations and their replies across the bridge.
//!
//! ## Philosophy
//!
//! - **Message passing with correlation**: a call is an envelope plus a
//!   pending-reply slot, never a direct invocation
//! - **Every wait is bounded**: each acknowledged call either resolves, times
//!   out, or is rejected when the channel closes
//! - **Replies are consumed at most once**: a slot is removed on timeout or
//!   abandonment, and a late reply for it is dropped
//! - **Malformed input is a value**: bad frames become failures, never panics
//!
//! ## Core Concepts
//!
//! - `Link`: one-way delivery of frame text to the far side
//! - `CallTransport`: correlation table, timeouts and inbound dispatch
//! - `InboundHandler`: what the transport hands inbound invocations to
//! - `loopback`: an in-process link pair with deterministic fault injection

pub mod config;
pub mod error;
pub mod fault;
pub mod link;
pub mod loopback;
pub mod transport;

pub use config::TransportConfig;
pub use error::{LinkError, TransportError};
pub use fault::{Direction, FaultPlan, FrameFault};
pub use link::Link;
pub use transport::{CallTransport, InboundHandler, WeakTransport};
