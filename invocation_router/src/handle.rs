//! Typed module handles

use crate::error::InvocationError;
use crate::router::InvocationRouter;
use core_types::InvocationPath;
use ipc::{InvocationRequest, SchemaVersion};
use module_contract::{ModuleContract, Operation};
use wire_codec::{decode, WireEncode, WireValue};

/// A router bound to one module on the far side
///
/// Every call made through a handle carries the module's path and the
/// contract version the caller was built against.
#[derive(Clone, Debug)]
pub struct ModuleHandle {
    router: InvocationRouter,
    path: InvocationPath,
    version: SchemaVersion,
}

impl ModuleHandle {
    pub fn new(router: InvocationRouter, path: InvocationPath, version: SchemaVersion) -> Self {
        Self {
            router,
            path,
            version,
        }
    }

    /// Binds to the module a contract describes
    pub fn for_contract(router: InvocationRouter, contract: &ModuleContract) -> Self {
        Self::new(router, contract.path.clone(), contract.schema_version())
    }

    pub fn path(&self) -> &InvocationPath {
        &self.path
    }

    pub fn version(&self) -> SchemaVersion {
        self.version
    }

    pub fn router(&self) -> &InvocationRouter {
        &self.router
    }

    fn request(&self, operation: &str, params: WireValue) -> InvocationRequest {
        InvocationRequest::new(self.path.clone(), operation, self.version, params)
    }

    /// Invokes an operation by name
    pub async fn invoke(&self, operation: &str, params: WireValue) -> Result<WireValue, InvocationError> {
        self.router
            .invoke_request(self.request(operation, params))
            .await
    }

    /// Invokes `O` and decodes its declared output
    pub async fn call<O: Operation>(&self, params: &O::Params) -> Result<O::Output, InvocationError> {
        let result = self.invoke(O::NAME, params.to_wire()).await?;
        decode::<O::Output>(&result).map_err(InvocationError::Decode)
    }

    /// Sends `O` as a notification
    pub fn send<O: Operation>(&self, params: &O::Params) -> Result<(), InvocationError> {
        let request = self.request(O::NAME, params.to_wire());
        self.router.transport().notify(request)?;
        Ok(())
    }
}
