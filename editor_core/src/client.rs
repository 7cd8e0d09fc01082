//! Native-side client for the core module

use crate::granularity::ReplaceGranularity;
use crate::module::{core_path, CORE_VERSION};
use crate::ops::{
    ClearEditor, EmptyParams, GetEditorText, HandleMouseEntered, HandleMouseExited, InsertText,
    InsertTextParams, MouseParams, ReplaceText, ReplaceTextParams, ResetEditor, ResetEditorParams,
};
use invocation_router::{InvocationError, InvocationRouter, ModuleHandle};
use wire_codec::{DomainInt, EnumTag};

/// Typed handle on the web-hosted `WebBridgeCore` module
///
/// ```no_run
/// # async fn demo(router: invocation_router::InvocationRouter) -> Result<(), invocation_router::InvocationError> {
/// use editor_core::{ReplaceGranularity, WebBridgeCore};
///
/// let core = WebBridgeCore::new(router);
/// core.insert_text("hello", 0, 0).await?;
/// core.replace_text("", ReplaceGranularity::Line).await?;
/// assert_eq!(core.get_editor_text().await?, "");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct WebBridgeCore {
    handle: ModuleHandle,
}

impl WebBridgeCore {
    pub fn new(router: InvocationRouter) -> Self {
        Self {
            handle: router.handle(core_path(), CORE_VERSION),
        }
    }

    pub fn handle(&self) -> &ModuleHandle {
        &self.handle
    }

    pub async fn reset_editor(&self, text: &str, read_only: bool) -> Result<(), InvocationError> {
        self.handle
            .call::<ResetEditor>(&ResetEditorParams {
                text: text.to_string(),
                read_only,
            })
            .await
    }

    pub async fn clear_editor(&self) -> Result<(), InvocationError> {
        self.handle.call::<ClearEditor>(&EmptyParams {}).await
    }

    pub async fn get_editor_text(&self) -> Result<String, InvocationError> {
        self.handle.call::<GetEditorText>(&EmptyParams {}).await
    }

    pub async fn insert_text(
        &self,
        text: &str,
        from: DomainInt,
        to: DomainInt,
    ) -> Result<(), InvocationError> {
        self.handle
            .call::<InsertText>(&InsertTextParams {
                text: text.to_string(),
                from,
                to,
            })
            .await
    }

    /// Accepts a known granularity or a raw tag
    pub async fn replace_text(
        &self,
        text: &str,
        granularity: impl Into<EnumTag<ReplaceGranularity>>,
    ) -> Result<(), InvocationError> {
        self.handle
            .call::<ReplaceText>(&ReplaceTextParams {
                text: text.to_string(),
                granularity: granularity.into(),
            })
            .await
    }

    /// Fire-and-forget; never waits for the web side
    pub fn handle_mouse_entered(&self, client_x: f64, client_y: f64) -> Result<(), InvocationError> {
        self.handle
            .send::<HandleMouseEntered>(&MouseParams { client_x, client_y })
    }

    /// Fire-and-forget; never waits for the web side
    pub fn handle_mouse_exited(&self, client_x: f64, client_y: f64) -> Result<(), InvocationError> {
        self.handle
            .send::<HandleMouseExited>(&MouseParams { client_x, client_y })
    }
}
