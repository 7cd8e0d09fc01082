//! The web-hosted core module

use crate::engine::{EditorEngine, PointerPosition};
use crate::error::EditorError;
use crate::ops::{
    ClearEditor, GetEditorText, HandleMouseEntered, HandleMouseExited, InsertText, ReplaceText,
    ResetEditor,
};
use async_trait::async_trait;
use core_types::InvocationPath;
use ipc::{SchemaVersion, VersionPolicy};
use module_contract::{
    decode_params, encode_output, BridgeModule, ContractError, ModuleContract, ModuleError,
    Operation, Side,
};
use parking_lot::Mutex;
use std::sync::Arc;
use wire_codec::WireValue;

/// Invocation path of the core module
pub const CORE_PATH: &str = "core";

/// Externally visible name of the core module
pub const CORE_MODULE_NAME: &str = "WebBridgeCore";

/// Contract version of the core module
pub const CORE_VERSION: SchemaVersion = SchemaVersion::new(1, 0);

pub fn core_path() -> InvocationPath {
    InvocationPath::from_static(CORE_PATH)
}

/// Declares the core module contract
pub fn core_contract() -> Result<ModuleContract, ContractError> {
    ModuleContract::builder(core_path(), Side::Web)
        .module_name(CORE_MODULE_NAME)
        .exported(true)
        .version(VersionPolicy::current(CORE_VERSION.major, CORE_VERSION.minor))
        .operation::<ResetEditor>()
        .operation::<ClearEditor>()
        .operation::<GetEditorText>()
        .operation::<InsertText>()
        .operation::<ReplaceText>()
        .operation::<HandleMouseEntered>()
        .operation::<HandleMouseExited>()
        .build()
}

/// Serves the core contract by forwarding to an editor engine
pub struct WebModuleCore<E> {
    contract: ModuleContract,
    engine: Arc<Mutex<E>>,
}

impl<E: EditorEngine + 'static> WebModuleCore<E> {
    pub fn new(engine: Arc<Mutex<E>>) -> Result<Self, ContractError> {
        Ok(Self {
            contract: core_contract()?,
            engine,
        })
    }

    pub fn engine(&self) -> &Arc<Mutex<E>> {
        &self.engine
    }
}

#[async_trait]
impl<E: EditorEngine + 'static> BridgeModule for WebModuleCore<E> {
    fn contract(&self) -> &ModuleContract {
        &self.contract
    }

    async fn invoke(&self, operation: &str, params: WireValue) -> Result<WireValue, ModuleError> {
        tracing::trace!(%operation, "core operation");
        match operation {
            ResetEditor::NAME => {
                let p = decode_params::<ResetEditor>(&params)?;
                self.engine.lock().reset(&p.text, p.read_only);
                Ok(encode_output::<ResetEditor>(&()))
            }
            ClearEditor::NAME => {
                decode_params::<ClearEditor>(&params)?;
                self.engine.lock().clear();
                Ok(encode_output::<ClearEditor>(&()))
            }
            GetEditorText::NAME => {
                decode_params::<GetEditorText>(&params)?;
                let text = self.engine.lock().text();
                Ok(encode_output::<GetEditorText>(&text))
            }
            InsertText::NAME => {
                let p = decode_params::<InsertText>(&params)?;
                self.engine
                    .lock()
                    .insert(&p.text, i64::from(p.from), i64::from(p.to))?;
                Ok(encode_output::<InsertText>(&()))
            }
            ReplaceText::NAME => {
                let p = decode_params::<ReplaceText>(&params)?;
                let granularity =
                    p.granularity
                        .resolve()
                        .map_err(|_| EditorError::UnknownGranularity {
                            tag: p.granularity.as_str().to_string(),
                        })?;
                self.engine.lock().replace_scope(&p.text, granularity);
                Ok(encode_output::<ReplaceText>(&()))
            }
            HandleMouseEntered::NAME => {
                let p = decode_params::<HandleMouseEntered>(&params)?;
                self.engine.lock().pointer_entered(PointerPosition {
                    x: p.client_x,
                    y: p.client_y,
                });
                Ok(encode_output::<HandleMouseEntered>(&()))
            }
            HandleMouseExited::NAME => {
                let p = decode_params::<HandleMouseExited>(&params)?;
                self.engine.lock().pointer_exited(PointerPosition {
                    x: p.client_x,
                    y: p.client_y,
                });
                Ok(encode_output::<HandleMouseExited>(&()))
            }
            other => Err(ModuleError::UnknownOperation {
                operation: other.to_string(),
            }),
        }
    }
}
