//! # Lifecycle
//!
//! Ties bridge modules to the editor surface that hosts them.
//!
//! ## Philosophy
//!
//! - **Explicit over implicit**: the surface owns its registry, transport
//!   and router; nothing is process-wide
//! - **Driven by the host**: the hosting view reports `Ready` and
//!   `Destroyed`, and the surface reacts deterministically
//! - **Nothing outlives its surface**: releasing a surface retires every
//!   module and fails every pending call
//!
//! ## Core Concepts
//!
//! - `SurfaceEvent`: what the hosting-surface notifier reports
//! - `SurfaceState`: `Detached → Attached → Released`
//! - `EditorSurface`: one session of one editor view

use call_transport::{loopback, CallTransport, FaultPlan, TransportConfig};
use core_types::SurfaceId;
use invocation_router::InvocationRouter;
use module_contract::{BridgeModule, Side};
use module_registry::{ModuleRegistry, RegistryError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Events from the hosting-surface notifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceEvent {
    /// The view finished loading and can exchange frames
    Ready,
    /// The view is gone
    Destroyed,
}

/// Lifecycle state of a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceState {
    /// Created, modules not yet registered
    Detached,
    /// Modules registered and dispatchable
    Attached,
    /// Torn down; terminal
    Released,
}

impl fmt::Display for SurfaceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceState::Detached => write!(f, "detached"),
            SurfaceState::Attached => write!(f, "attached"),
            SurfaceState::Released => write!(f, "released"),
        }
    }
}

/// Error types for surface lifecycle
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("Surface {0} is already attached")]
    AlreadyAttached(SurfaceId),

    #[error("Surface {0} was released and cannot attach again")]
    Released(SurfaceId),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Configuration for one side of an editor surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceConfig {
    pub side: Side,
    /// Bound on every acknowledged call this side makes
    pub call_timeout: Duration,
}

impl SurfaceConfig {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            call_timeout: TransportConfig::DEFAULT_CALL_TIMEOUT,
        }
    }

    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    /// Transport configuration derived from this surface configuration
    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig::new(self.side.to_string()).with_call_timeout(self.call_timeout)
    }
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self::new(Side::Native)
    }
}

/// One session of one editor view, on one side of the bridge
pub struct EditorSurface {
    id: SurfaceId,
    config: SurfaceConfig,
    registry: Arc<ModuleRegistry>,
    router: InvocationRouter,
    modules: Vec<Arc<dyn BridgeModule>>,
    state: SurfaceState,
}

impl EditorSurface {
    /// Creates a detached surface speaking over `transport`
    pub fn new(config: SurfaceConfig, transport: CallTransport) -> Self {
        let registry = Arc::new(ModuleRegistry::new());
        let router = InvocationRouter::new(transport, Arc::clone(&registry));
        Self {
            id: SurfaceId::new(),
            config,
            registry,
            router,
            modules: Vec::new(),
            state: SurfaceState::Detached,
        }
    }

    /// Adds a module this surface hosts
    ///
    /// The instance lives exactly as long as this surface session: it is
    /// registered on attach and retired on release.
    pub fn with_module(mut self, module: Arc<dyn BridgeModule>) -> Self {
        self.modules.push(module);
        self
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn side(&self) -> Side {
        self.config.side
    }

    pub fn state(&self) -> SurfaceState {
        self.state
    }

    pub fn router(&self) -> &InvocationRouter {
        &self.router
    }

    pub fn registry(&self) -> &Arc<ModuleRegistry> {
        &self.registry
    }

    /// Applies one event from the hosting-surface notifier
    pub fn handle_event(&mut self, event: SurfaceEvent) -> Result<(), SurfaceError> {
        match event {
            SurfaceEvent::Ready => self.attach(),
            SurfaceEvent::Destroyed => {
                self.release();
                Ok(())
            }
        }
    }

    /// Registers every hosted module
    ///
    /// Fails without registering anything partially visible: if one module
    /// is rejected, the ones registered before it are removed again.
    pub fn attach(&mut self) -> Result<(), SurfaceError> {
        match self.state {
            SurfaceState::Attached => return Err(SurfaceError::AlreadyAttached(self.id)),
            SurfaceState::Released => return Err(SurfaceError::Released(self.id)),
            SurfaceState::Detached => {}
        }

        for module in &self.modules {
            if let Err(err) = self.registry.register(Arc::clone(module)) {
                self.registry.teardown();
                return Err(err.into());
            }
        }
        self.state = SurfaceState::Attached;
        tracing::info!(
            surface = %self.id,
            side = %self.config.side,
            modules = self.registry.count(),
            "surface attached"
        );
        Ok(())
    }

    /// Tears down every module and closes the transport
    ///
    /// Idempotent. Pending calls in both directions fail with
    /// `Disconnected` or `ModuleGone`.
    pub fn release(&mut self) {
        if self.state == SurfaceState::Released {
            return;
        }
        self.registry.teardown();
        self.router.close();
        self.modules.clear();
        self.state = SurfaceState::Released;
        tracing::info!(surface = %self.id, side = %self.config.side, "surface released");
    }
}

impl Drop for EditorSurface {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for EditorSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorSurface")
            .field("id", &self.id)
            .field("side", &self.config.side)
            .field("state", &self.state)
            .field("modules", &self.registry.count())
            .finish()
    }
}

/// Builds a native and a web surface joined by an in-process link
///
/// Must be called from within a Tokio runtime.
pub fn loopback_pair(
    native: SurfaceConfig,
    web: SurfaceConfig,
    faults: FaultPlan,
) -> (EditorSurface, EditorSurface) {
    let (native_t, web_t) =
        loopback::connect(native.transport_config(), web.transport_config(), faults);
    (
        EditorSurface::new(native, native_t),
        EditorSurface::new(web, web_t),
    )
}
