//! Exported bridge schema
//!
//! The schema lists every module, operation and typed parameter of an
//! application. It is the input of the external binding generator, and
//! both sides' stubs are checked against it.

use crate::contract::ModuleContract;
use core_types::InvocationPath;
use serde::{Deserialize, Serialize};

/// Every contract of an application
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BridgeSchema {
    pub modules: Vec<ModuleContract>,
}

impl BridgeSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a contract
    pub fn with(mut self, contract: ModuleContract) -> Self {
        self.modules.push(contract);
        self
    }

    /// Keeps only modules flagged for export
    pub fn exported(&self) -> BridgeSchema {
        BridgeSchema {
            modules: self.modules.iter().filter(|m| m.exported).cloned().collect(),
        }
    }

    /// Looks up a module by invocation path
    pub fn module(&self, path: &InvocationPath) -> Option<&ModuleContract> {
        self.modules.iter().find(|m| &m.path == path)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::Side;
    use crate::operation::Operation;

    struct Title;

    impl Operation for Title {
        const NAME: &'static str = "title";
        type Params = ();
        type Output = String;
    }

    fn contract(path: &str, exported: bool) -> ModuleContract {
        ModuleContract::builder(InvocationPath::new(path).unwrap(), Side::Native)
            .exported(exported)
            .operation::<Title>()
            .build()
            .unwrap()
    }

    #[test]
    fn test_exported_filter() {
        let schema = BridgeSchema::new()
            .with(contract("window", true))
            .with(contract("debug", false));

        let exported = schema.exported();
        assert_eq!(exported.modules.len(), 1);
        assert_eq!(exported.modules[0].path.as_str(), "window");
    }

    #[test]
    fn test_schema_json_round_trip() {
        let schema = BridgeSchema::new().with(contract("window", true));
        let json = schema.to_json().unwrap();
        assert!(json.contains("\"hostedOn\": \"native\""));
        assert!(json.contains("\"moduleName\": \"window\""));

        let back = BridgeSchema::from_json(&json).unwrap();
        assert_eq!(back, schema);
        assert!(back.module(&InvocationPath::new("window").unwrap()).is_some());
    }
}
