//! # Bridge Contract Tests
//!
//! This crate provides "golden" tests for the bridge contracts to ensure
//! they don't drift accidentally over time.
//!
//! ## Philosophy
//!
//! - **Explicit over implicit**: contracts and wire shapes are written down
//!   as literal JSON
//! - **Testability first**: contract tests fail when an interface changes
//! - **Mechanism not policy**: define what must be stable, not how to use it
//!
//! ## Structure
//!
//! - `core_module`: names, parameter records, delivery and version of the
//!   editor-facing `core` module
//! - `frames`: invoke, reply and close frames as they cross the bridge
//! - `wire_values`: the JSON form of every wire shape
//! - `failures`: failure kinds and their categories

pub mod core_module;
pub mod failures;
pub mod frames;
pub mod wire_values;

/// Common test helpers for contract validation
pub mod test_helpers {
    use module_contract::{ModuleContract, OperationSignature};
    use serde_json::Value;

    /// Parses a golden JSON literal
    pub fn golden(text: &str) -> Value {
        serde_json::from_str(text).unwrap_or_else(|e| panic!("invalid golden JSON: {}", e))
    }

    /// Asserts a serialized value matches its golden JSON
    pub fn assert_golden<T: serde::Serialize>(actual: &T, expected: &str) {
        let actual = serde_json::to_value(actual).unwrap_or_else(|e| panic!("serialize: {}", e));
        assert_eq!(
            actual,
            golden(expected),
            "Wire shape changed:\n{}",
            serde_json::to_string_pretty(&actual).unwrap_or_default()
        );
    }

    /// Looks up an operation, failing loudly if the contract dropped it
    pub fn signature<'a>(contract: &'a ModuleContract, name: &str) -> &'a OperationSignature {
        contract
            .operation(name)
            .unwrap_or_else(|| panic!("Operation '{}' disappeared from '{}'", name, contract.path))
    }
}
