//! # Module Registry
//!
//! Table of bridge modules available for dispatch on one side of one
//! editor surface.
//!
//! ## Philosophy
//!
//! - **Owned, not global**: each editor surface owns its own registry, so
//!   several windows never share dispatch state
//! - **Reads never mutate**: dispatch resolves under a read lock; only
//!   surface attach and detach write
//! - **Teardown is observable**: every resolved entry carries a retirement
//!   signal, so a call in flight when its module goes away resolves as
//!   gone instead of hanging

use core_types::InvocationPath;
use ipc::SchemaVersion;
use module_contract::{BridgeModule, ModuleContract};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;

/// Error types for registry operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Path already registered on this registry
    #[error("Module path '{0}' is already registered")]
    AlreadyRegistered(InvocationPath),

    /// External module name already taken by another path
    #[error("Module name '{0}' is already registered")]
    NameAlreadyRegistered(String),

    /// Path was never registered here
    #[error("No module registered at '{0}'")]
    NotFound(InvocationPath),

    /// Path was registered and has since been torn down
    #[error("Module '{0}' was torn down")]
    Gone(InvocationPath),
}

/// Descriptor for a registered module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDescriptor {
    pub path: InvocationPath,
    pub module_name: String,
    pub schema_version: SchemaVersion,
    pub exported: bool,
}

impl ModuleDescriptor {
    fn of(contract: &ModuleContract) -> Self {
        Self {
            path: contract.path.clone(),
            module_name: contract.module_name.clone(),
            schema_version: contract.schema_version(),
            exported: contract.exported,
        }
    }
}

/// Signal that fires once when a module is unregistered
#[derive(Debug, Clone)]
pub struct Retirement {
    rx: watch::Receiver<bool>,
}

impl Retirement {
    /// Checks if the module has already been retired
    pub fn is_retired(&self) -> bool {
        *self.rx.borrow()
    }

    /// Waits until the module is retired
    pub async fn wait(mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            // A dropped sender means the registry itself is gone.
            if self.rx.changed().await.is_err() {
                return;
            }
        }
    }
}

/// A resolved registry entry
#[derive(Clone)]
pub struct ModuleEntry {
    module: Arc<dyn BridgeModule>,
    retirement: Retirement,
}

impl ModuleEntry {
    pub fn module(&self) -> &Arc<dyn BridgeModule> {
        &self.module
    }

    pub fn contract(&self) -> &ModuleContract {
        self.module.contract()
    }

    /// Returns the retirement signal of this entry
    pub fn retirement(&self) -> Retirement {
        self.retirement.clone()
    }
}

impl std::fmt::Debug for ModuleEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleEntry")
            .field("path", &self.contract().path)
            .field("retired", &self.retirement.is_retired())
            .finish()
    }
}

struct LiveModule {
    module: Arc<dyn BridgeModule>,
    retire: watch::Sender<bool>,
}

#[derive(Default)]
struct RegistryState {
    live: HashMap<InvocationPath, LiveModule>,
    names: HashMap<String, InvocationPath>,
    retired: HashSet<InvocationPath>,
}

/// Module registry
///
/// Maps invocation paths to live handler instances.
#[derive(Default)]
pub struct ModuleRegistry {
    state: RwLock<RegistryState>,
}

impl ModuleRegistry {
    /// Creates a new, empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a module under the path and name its contract declares
    pub fn register(&self, module: Arc<dyn BridgeModule>) -> Result<(), RegistryError> {
        let contract = module.contract();
        let path = contract.path.clone();
        let name = contract.module_name.clone();

        let mut state = self.state.write();
        if state.live.contains_key(&path) {
            return Err(RegistryError::AlreadyRegistered(path));
        }
        if state.names.contains_key(&name) {
            return Err(RegistryError::NameAlreadyRegistered(name));
        }

        let (retire, _) = watch::channel(false);
        state.retired.remove(&path);
        state.names.insert(name.clone(), path.clone());
        state.live.insert(path.clone(), LiveModule { module, retire });
        tracing::info!(path = %path, module = %name, "module registered");
        Ok(())
    }

    /// Resolves a path to its live entry
    pub fn resolve(&self, path: &InvocationPath) -> Result<ModuleEntry, RegistryError> {
        let state = self.state.read();
        match state.live.get(path) {
            Some(live) => Ok(ModuleEntry {
                module: Arc::clone(&live.module),
                retirement: Retirement {
                    rx: live.retire.subscribe(),
                },
            }),
            None if state.retired.contains(path) => Err(RegistryError::Gone(path.clone())),
            None => Err(RegistryError::NotFound(path.clone())),
        }
    }

    /// Unregisters a module, retiring any dispatch still running on it
    pub fn unregister(&self, path: &InvocationPath) -> Result<(), RegistryError> {
        let mut state = self.state.write();
        let live = state
            .live
            .remove(path)
            .ok_or_else(|| RegistryError::NotFound(path.clone()))?;
        state.names.remove(&live.module.contract().module_name);
        state.retired.insert(path.clone());
        live.retire.send_replace(true);
        tracing::info!(path = %path, "module unregistered");
        Ok(())
    }

    /// Unregisters every module
    pub fn teardown(&self) {
        let mut state = self.state.write();
        let live = std::mem::take(&mut state.live);
        state.names.clear();
        for (path, module) in live {
            module.retire.send_replace(true);
            state.retired.insert(path);
        }
        tracing::info!(retired = state.retired.len(), "registry torn down");
    }

    /// Lists all registered modules, ordered by path
    pub fn descriptors(&self) -> Vec<ModuleDescriptor> {
        let state = self.state.read();
        let mut descriptors: Vec<_> = state
            .live
            .values()
            .map(|live| ModuleDescriptor::of(live.module.contract()))
            .collect();
        descriptors.sort_by(|a, b| a.path.cmp(&b.path));
        descriptors
    }

    /// Checks if a path is currently registered
    pub fn contains(&self, path: &InvocationPath) -> bool {
        self.state.read().live.contains_key(path)
    }

    /// Returns the number of registered modules
    pub fn count(&self) -> usize {
        self.state.read().live.len()
    }
}

impl std::fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("ModuleRegistry")
            .field("live", &state.live.keys().collect::<Vec<_>>())
            .field("retired", &state.retired.len())
            .finish()
    }
}
