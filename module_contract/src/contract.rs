//! Module contracts

use crate::operation::{Operation, OperationSignature};
use core_types::InvocationPath;
use ipc::{SchemaVersion, VersionPolicy};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Which side of the bridge hosts a module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Side {
    /// The native host application
    Native,
    /// The web view running the editor engine
    Web,
}

impl Side {
    /// Returns the side across the bridge
    pub fn opposite(&self) -> Side {
        match self {
            Side::Native => Side::Web,
            Side::Web => Side::Native,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Native => write!(f, "native"),
            Side::Web => write!(f, "web"),
        }
    }
}

/// Errors raised while declaring a contract
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    #[error("Module '{path}' declares operation '{operation}' more than once")]
    DuplicateOperation {
        path: InvocationPath,
        operation: String,
    },

    #[error("Module '{path}' declares no operations")]
    Empty { path: InvocationPath },
}

/// A named, versioned interface declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleContract {
    pub path: InvocationPath,
    /// Externally visible module name; defaults to the path
    pub module_name: String,
    /// Whether a binding generator emits stubs for this module
    pub exported: bool,
    pub hosted_on: Side,
    pub version: VersionPolicy,
    operations: Vec<OperationSignature>,
}

impl ModuleContract {
    /// Starts declaring a contract
    pub fn builder(path: InvocationPath, hosted_on: Side) -> ContractBuilder {
        ContractBuilder {
            module_name: path.as_str().to_string(),
            path,
            exported: false,
            hosted_on,
            version: VersionPolicy::current(1, 0),
            operations: Vec::new(),
        }
    }

    /// Operation signatures in declaration order
    pub fn operations(&self) -> &[OperationSignature] {
        &self.operations
    }

    /// Looks up an operation by name
    pub fn operation(&self, name: &str) -> Option<&OperationSignature> {
        self.operations.iter().find(|op| op.name == name)
    }

    /// Version callers should stamp on invocations
    pub fn schema_version(&self) -> SchemaVersion {
        self.version.current_version()
    }
}

/// Builder for [`ModuleContract`]
#[derive(Debug, Clone)]
pub struct ContractBuilder {
    path: InvocationPath,
    module_name: String,
    exported: bool,
    hosted_on: Side,
    version: VersionPolicy,
    operations: Vec<OperationSignature>,
}

impl ContractBuilder {
    /// Overrides the externally visible module name
    pub fn module_name(mut self, name: impl Into<String>) -> Self {
        self.module_name = name.into();
        self
    }

    pub fn exported(mut self, exported: bool) -> Self {
        self.exported = exported;
        self
    }

    pub fn version(mut self, version: VersionPolicy) -> Self {
        self.version = version;
        self
    }

    /// Adds an operation
    pub fn operation<O: Operation>(mut self) -> Self {
        self.operations.push(OperationSignature::of::<O>());
        self
    }

    /// Finishes the declaration
    pub fn build(self) -> Result<ModuleContract, ContractError> {
        if self.operations.is_empty() {
            return Err(ContractError::Empty { path: self.path });
        }
        let mut seen = HashSet::new();
        for op in &self.operations {
            if !seen.insert(op.name.as_str()) {
                return Err(ContractError::DuplicateOperation {
                    path: self.path.clone(),
                    operation: op.name.clone(),
                });
            }
        }
        Ok(ModuleContract {
            path: self.path,
            module_name: self.module_name,
            exported: self.exported,
            hosted_on: self.hosted_on,
            version: self.version,
            operations: self.operations,
        })
    }
}
