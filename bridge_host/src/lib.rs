//! # Bridge Host Runtime
//!
//! Runs a native↔web editor session in one process.
//!
//! ## Philosophy
//!
//! - **Host owns I/O**: modules never print; the host prints the transcript
//! - **Input is explicit commands**: a script, not a terminal
//! - **Deterministic mode is first-class**: the same script yields the same
//!   transcript
//!
//! ## Responsibilities
//!
//! The host runtime:
//! - Builds both surfaces over a loopback link
//! - Registers the core module on the web side
//! - Drives it through the native-side typed client
//! - Prints the exported bridge schema on request

pub mod runtime;
pub mod script;

pub use runtime::{
    exported_schema, HostRuntime, HostRuntimeConfig, HostRuntimeError, StepOutcome, StepReport,
    DEFAULT_SCRIPT,
};
pub use script::{EditorScript, ScriptCommand, ScriptError, ScriptStep};
