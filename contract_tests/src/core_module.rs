//! Core module contract tests
//!
//! These tests define the stable contract of the editor-facing `core`
//! module as seen by the binding generator and by the web side.

use editor_core::{core_contract, CORE_MODULE_NAME, CORE_PATH, CORE_VERSION};
use ipc::SchemaVersion;

// ===== Core Contract Version =====
const CORE_SCHEMA_VERSION: SchemaVersion = SchemaVersion::new(1, 0);

// ===== Operation Identifiers =====
const OP_RESET_EDITOR: &str = "resetEditor";
const OP_CLEAR_EDITOR: &str = "clearEditor";
const OP_GET_EDITOR_TEXT: &str = "getEditorText";
const OP_INSERT_TEXT: &str = "insertText";
const OP_REPLACE_TEXT: &str = "replaceText";
const OP_HANDLE_MOUSE_ENTERED: &str = "handleMouseEntered";
const OP_HANDLE_MOUSE_EXITED: &str = "handleMouseExited";

// ===== Contract Tests =====
