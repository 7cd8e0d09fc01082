//! # Editor Core
//!
//! The editor-facing module of the bridge and the engine it forwards to.
//!
//! ## Philosophy
//!
//! - **Contract first**: the seven operations are declared once and shared
//!   by the web-side module and the native-side client
//! - **Positions are UTF-16 code units**: the web engine's native unit
//! - **Domain errors are typed**: bad ranges and unknown granularities come
//!   back as their own failure kinds, distinct from malformed requests
//! - **Mechanism over policy**: the engine provides editing primitives;
//!   composite operations are built from them
//!
//! ## Design
//!
//! - `EditorEngine`: the editing collaborator behind the bridge
//! - `TextEditor`: in-memory engine for tests and the host binary
//! - `WebModuleCore`: serves the `core` path on the web side
//! - `WebBridgeCore`: typed client on the native side

pub mod buffer;
pub mod client;
pub mod editor;
pub mod engine;
pub mod error;
pub mod granularity;
pub mod module;
pub mod ops;
pub mod snapshot;

pub use buffer::{TextBuffer, TextRange};
pub use client::WebBridgeCore;
pub use editor::TextEditor;
pub use engine::{EditorEngine, PointerPosition};
pub use error::EditorError;
pub use granularity::ReplaceGranularity;
pub use module::{core_contract, core_path, WebModuleCore, CORE_MODULE_NAME, CORE_PATH, CORE_VERSION};
pub use snapshot::{EditorSnapshot, HoverState};
