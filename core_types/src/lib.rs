//! # Core Types
//!
//! This crate defines the identifiers shared by both sides of the editor bridge.
//!
//! ## Philosophy
//!
//! - **Explicit over implicit**: Surfaces and modules are named by typed ids, not bare strings.
//! - **Validate at the edge**: An invocation path is checked once, when it is built.
//!
//! ## Key Types
//!
//! - [`SurfaceId`]: Unique identifier for one hosted editor surface
//! - [`InvocationPath`]: Stable routing key for a bridge module

pub mod ids;
pub mod path;

pub use ids::SurfaceId;
pub use path::{InvocationPath, PathError};
