//! Resilience Test Utilities
//!
//! This crate provides shared utilities for resilience and integration tests.
//!
//! ## Test Philosophy
//!
//! - **Safety under faults**: callers always get a typed outcome, never silence
//! - **Deterministic failures**: all frame loss is reproducible via `FaultPlan`
//! - **No stale routing**: torn-down modules answer `ModuleGone`, not stale results
//! - **Symmetry**: either side can host modules and call the other

use async_trait::async_trait;
use call_transport::FaultPlan;
use core_types::InvocationPath;
use editor_core::{TextEditor, WebBridgeCore, WebModuleCore};
use lifecycle::{loopback_pair, EditorSurface, SurfaceConfig, SurfaceEvent};
use module_contract::{
    decode_params, encode_output, BridgeModule, ModuleContract, ModuleError, Operation, Side,
};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use wire_codec::{wire_record, WireValue};

pub const PACER_PATH: &str = "pacer";
pub const HOST_PATH: &str = "host";

wire_record! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct EchoParams {
        pub text: String => "text",
        pub delay_ms: u32 => "delayMs",
    }
}

wire_record! {
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct NoParams {}
}

wire_record! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct LinkParams {
        pub url: String => "url",
    }
}

/// Waits `delayMs`, records `text`, and returns it
pub struct Echo;

impl Operation for Echo {
    const NAME: &'static str = "echo";
    type Params = EchoParams;
    type Output = String;
}

/// Returns the native window title
pub struct GetTitle;

impl Operation for GetTitle {
    const NAME: &'static str = "getTitle";
    type Params = NoParams;
    type Output = String;
}

/// Asks the native side to open a link
pub struct OpenLink;

impl Operation for OpenLink {
    const NAME: &'static str = "openLink";
    type Params = LinkParams;
    type Output = ();
}

/// Web-hosted module whose handlers take a caller-chosen time
///
/// Every completed echo is recorded, so tests can observe effects that
/// outlive the caller's interest.
pub struct Pacer {
    contract: ModuleContract,
    effects: Mutex<Vec<String>>,
}

impl Pacer {
    pub fn new() -> Arc<Self> {
        let contract = ModuleContract::builder(pacer_path(), Side::Web)
            .operation::<Echo>()
            .build()
            .unwrap_or_else(|e| panic!("pacer contract: {}", e));
        Arc::new(Self {
            contract,
            effects: Mutex::new(Vec::new()),
        })
    }

    /// Echo texts in completion order
    pub fn effects(&self) -> Vec<String> {
        self.effects.lock().clone()
    }
}

#[async_trait]
impl BridgeModule for Pacer {
    fn contract(&self) -> &ModuleContract {
        &self.contract
    }

    async fn invoke(&self, operation: &str, params: WireValue) -> Result<WireValue, ModuleError> {
        match operation {
            Echo::NAME => {
                let p = decode_params::<Echo>(&params)?;
                tokio::time::sleep(Duration::from_millis(u64::from(p.delay_ms))).await;
                self.effects.lock().push(p.text.clone());
                Ok(encode_output::<Echo>(&p.text))
            }
            other => Err(ModuleError::UnknownOperation {
                operation: other.to_string(),
            }),
        }
    }
}

/// Native-hosted module the web side calls
pub struct HostWindow {
    contract: ModuleContract,
    title: String,
    opened: Mutex<Vec<String>>,
}

impl HostWindow {
    pub fn new(title: &str) -> Arc<Self> {
        let contract = ModuleContract::builder(host_path(), Side::Native)
            .module_name("EditorHost")
            .exported(true)
            .operation::<GetTitle>()
            .operation::<OpenLink>()
            .build()
            .unwrap_or_else(|e| panic!("host contract: {}", e));
        Arc::new(Self {
            contract,
            title: title.to_string(),
            opened: Mutex::new(Vec::new()),
        })
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().clone()
    }
}

#[async_trait]
impl BridgeModule for HostWindow {
    fn contract(&self) -> &ModuleContract {
        &self.contract
    }

    async fn invoke(&self, operation: &str, params: WireValue) -> Result<WireValue, ModuleError> {
        match operation {
            GetTitle::NAME => {
                decode_params::<GetTitle>(&params)?;
                Ok(encode_output::<GetTitle>(&self.title))
            }
            OpenLink::NAME => {
                let p = decode_params::<OpenLink>(&params)?;
                self.opened.lock().push(p.url);
                Ok(encode_output::<OpenLink>(&()))
            }
            other => Err(ModuleError::UnknownOperation {
                operation: other.to_string(),
            }),
        }
    }
}

pub fn pacer_path() -> InvocationPath {
    InvocationPath::from_static(PACER_PATH)
}

pub fn host_path() -> InvocationPath {
    InvocationPath::from_static(HOST_PATH)
}

/// Both sides of one editor session, attached and ready
pub struct Session {
    pub native: EditorSurface,
    pub web: EditorSurface,
    pub editor: Arc<Mutex<TextEditor>>,
    pub pacer: Arc<Pacer>,
    pub host: Arc<HostWindow>,
}

impl Session {
    /// Starts a session over a loopback link
    ///
    /// The web side hosts the core module and the pacer; the native side
    /// hosts the host window. Must be called within a Tokio runtime.
    pub fn start(faults: FaultPlan, call_timeout: Duration) -> Session {
        let (native, web) = loopback_pair(
            SurfaceConfig::new(Side::Native).with_call_timeout(call_timeout),
            SurfaceConfig::new(Side::Web).with_call_timeout(call_timeout),
            faults,
        );

        let editor = Arc::new(Mutex::new(TextEditor::new()));
        let core = WebModuleCore::new(Arc::clone(&editor))
            .unwrap_or_else(|e| panic!("core contract: {}", e));
        let pacer = Pacer::new();
        let host = HostWindow::new("Untitled.md");

        let mut web = web
            .with_module(Arc::new(core))
            .with_module(Arc::clone(&pacer) as Arc<dyn BridgeModule>);
        let mut native = native.with_module(Arc::clone(&host) as Arc<dyn BridgeModule>);

        native
            .handle_event(SurfaceEvent::Ready)
            .unwrap_or_else(|e| panic!("native attach: {}", e));
        web.handle_event(SurfaceEvent::Ready)
            .unwrap_or_else(|e| panic!("web attach: {}", e));

        Session {
            native,
            web,
            editor,
            pacer,
            host,
        }
    }

    /// Session with no faults and the default call bound
    pub fn healthy() -> Session {
        Self::start(FaultPlan::new(), Duration::from_secs(5))
    }

    /// Native-side client of the core module
    pub fn core(&self) -> WebBridgeCore {
        WebBridgeCore::new(self.native.router().clone())
    }

    /// Document text, read directly from the engine
    pub fn document(&self) -> String {
        self.editor.lock().snapshot().text
    }

    /// Asks the pacer to echo `text` after `delay_ms`
    pub async fn echo(
        &self,
        text: &str,
        delay_ms: u32,
    ) -> Result<String, invocation_router::InvocationError> {
        self.native
            .router()
            .call::<Echo>(
                &pacer_path(),
                &EchoParams {
                    text: text.to_string(),
                    delay_ms,
                },
            )
            .await
    }
}
