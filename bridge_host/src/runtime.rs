//! # Host Runtime
//!
//! Runs one native↔web editor session and feeds it scripted commands.

use crate::script::{EditorScript, ScriptCommand, ScriptError, ScriptStep};
use call_transport::FaultPlan;
use editor_core::{core_contract, EditorSnapshot, TextEditor, WebBridgeCore, WebModuleCore};
use invocation_router::InvocationError;
use ipc::FailureDescriptor;
use lifecycle::{loopback_pair, EditorSurface, SurfaceConfig, SurfaceError, SurfaceEvent};
use module_contract::{BridgeSchema, ContractError, Side};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use wire_codec::EnumTag;

/// Host runtime error types
#[derive(Debug, Error)]
pub enum HostRuntimeError {
    #[error("Script error: {0}")]
    ScriptError(#[from] ScriptError),

    #[error("Surface error: {0}")]
    SurfaceError(#[from] SurfaceError),

    #[error("Contract error: {0}")]
    ContractError(#[from] ContractError),

    #[error("Schema error: {0}")]
    SchemaError(#[from] serde_json::Error),
}

/// Built-in script run when none is given
pub const DEFAULT_SCRIPT: &str = r#"
# Two lines, then blank the second one
reset ""
insert "hello\nworld" 0 0
replace "" line
text
enter 12 34
exit 12 34
"#;

/// Host runtime configuration
#[derive(Debug, Clone)]
pub struct HostRuntimeConfig {
    /// Optional editor script; the built-in one runs otherwise
    pub script: Option<String>,
    /// Bound on every acknowledged call
    pub call_timeout: Duration,
    /// Maximum level of emitted log events
    pub log_level: tracing::Level,
    /// Print the exported schema instead of running a session
    pub print_schema: bool,
}

impl Default for HostRuntimeConfig {
    fn default() -> Self {
        Self {
            script: None,
            call_timeout: Duration::from_secs(5),
            log_level: tracing::Level::INFO,
            print_schema: false,
        }
    }
}

/// Result of one scripted command
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// Acknowledged by the web side
    Done,
    /// Document text read back
    Text(String),
    /// Notification handed to the transport
    Sent,
    Slept,
    Failed(FailureDescriptor),
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepOutcome::Done => write!(f, "ok"),
            StepOutcome::Text(text) => write!(f, "{:?}", text),
            StepOutcome::Sent => write!(f, "sent"),
            StepOutcome::Slept => write!(f, "slept"),
            StepOutcome::Failed(failure) => write!(f, "error {}", failure),
        }
    }
}

impl From<Result<(), InvocationError>> for StepOutcome {
    fn from(result: Result<(), InvocationError>) -> Self {
        match result {
            Ok(()) => StepOutcome::Done,
            Err(err) => StepOutcome::Failed(err.to_failure()),
        }
    }
}

/// One line of the session transcript
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    pub step: ScriptStep,
    pub outcome: StepOutcome,
}

impl fmt::Display for StepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>3}: {} -> {}", self.step.line, self.step.command, self.outcome)
    }
}

/// Returns the exported bridge schema as pretty JSON
pub fn exported_schema() -> Result<String, HostRuntimeError> {
    let schema = BridgeSchema::new().with(core_contract()?).exported();
    Ok(schema.to_json()?)
}

/// Host runtime
///
/// Owns both sides of one editor session. Must be created inside a Tokio
/// runtime.
pub struct HostRuntime {
    script: EditorScript,
    native: EditorSurface,
    web: EditorSurface,
    client: WebBridgeCore,
    editor: Arc<Mutex<TextEditor>>,
}

impl HostRuntime {
    /// Creates both surfaces and attaches them
    pub fn new(config: HostRuntimeConfig) -> Result<Self, HostRuntimeError> {
        let script = EditorScript::from_text(config.script.as_deref().unwrap_or(DEFAULT_SCRIPT))?;

        let (mut native, web) = loopback_pair(
            SurfaceConfig::new(Side::Native).with_call_timeout(config.call_timeout),
            SurfaceConfig::new(Side::Web).with_call_timeout(config.call_timeout),
            FaultPlan::new(),
        );

        let editor = Arc::new(Mutex::new(TextEditor::new()));
        let mut web = web.with_module(Arc::new(WebModuleCore::new(Arc::clone(&editor))?));

        native.handle_event(SurfaceEvent::Ready)?;
        web.handle_event(SurfaceEvent::Ready)?;

        let client = WebBridgeCore::new(native.router().clone());
        tracing::info!(native = %native.id(), web = %web.id(), "session started");

        Ok(Self {
            script,
            native,
            web,
            client,
            editor,
        })
    }

    /// Runs the script to completion
    ///
    /// A failed command does not stop the script; its failure is recorded
    /// in the transcript.
    pub async fn run(&mut self) -> Vec<StepReport> {
        let mut reports = Vec::with_capacity(self.script.remaining());
        while let Some(step) = self.script.next_step() {
            let outcome = self.execute(&step.command).await;
            if let StepOutcome::Failed(failure) = &outcome {
                tracing::warn!(line = step.line, %failure, "command failed");
            }
            reports.push(StepReport { step, outcome });
        }
        reports
    }

    async fn execute(&self, command: &ScriptCommand) -> StepOutcome {
        match command {
            ScriptCommand::Reset { text, read_only } => {
                self.client.reset_editor(text, *read_only).await.into()
            }
            ScriptCommand::Clear => self.client.clear_editor().await.into(),
            ScriptCommand::Text => match self.client.get_editor_text().await {
                Ok(text) => StepOutcome::Text(text),
                Err(err) => StepOutcome::Failed(err.to_failure()),
            },
            ScriptCommand::Insert { text, from, to } => {
                self.client.insert_text(text, *from, *to).await.into()
            }
            ScriptCommand::Replace { text, granularity } => self
                .client
                .replace_text(text, EnumTag::new(granularity.as_str()))
                .await
                .into(),
            ScriptCommand::Enter { x, y } => notified(self.client.handle_mouse_entered(*x, *y)),
            ScriptCommand::Exit { x, y } => notified(self.client.handle_mouse_exited(*x, *y)),
            ScriptCommand::Sleep(duration) => {
                tokio::time::sleep(*duration).await;
                StepOutcome::Slept
            }
        }
    }

    /// Current state of the web-side editor
    pub fn snapshot(&self) -> EditorSnapshot {
        self.editor.lock().snapshot()
    }

    /// Releases both surfaces
    pub fn shutdown(&mut self) {
        self.web.release();
        self.native.release();
        tracing::info!("session finished");
    }
}

fn notified(result: Result<(), InvocationError>) -> StepOutcome {
    match result {
        Ok(()) => StepOutcome::Sent,
        Err(err) => StepOutcome::Failed(err.to_failure()),
    }
}
