//! # Module Contract
//!
//! Named, versioned interface declarations for bridge modules.
//!
//! ## Philosophy
//!
//! - **One source of truth**: an operation is declared once as a Rust type;
//!   the typed client, the dispatcher and the exported schema all derive
//!   their view of it from that declaration
//! - **Records, not positions**: every operation takes exactly one
//!   named-field parameter record
//! - **Schema as data**: contracts serialize to JSON so an external binding
//!   generator can emit the other side's stubs
//!
//! ## Core Concepts
//!
//! - `Operation`: compile-time description of one operation
//! - `ModuleContract`: invocation path, external name and operation list
//! - `BridgeSchema`: every contract of an application, for export
//! - `BridgeModule`: a live handler instance serving one contract

pub mod contract;
pub mod module;
pub mod operation;
pub mod schema;

pub use contract::{ContractBuilder, ContractError, ModuleContract, Side};
pub use module::{decode_params, encode_output, BridgeModule, ModuleError};
pub use operation::{Delivery, Operation, OperationSignature};
pub use schema::BridgeSchema;
