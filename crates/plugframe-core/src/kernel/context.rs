use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::kernel::constants::{FRAMEWORK_VERSION, SYSTEM_PLUGIN_ID, SYSTEM_PLUGIN_SYMBOLIC_NAME};
use crate::kernel::diagnostics::{DiagnosticSink, FrameworkLog, LogSink};
use crate::kernel::error::{Error, KernelLifecyclePhase, Result};
use crate::kernel::global;
use crate::plugin_system::dependency::BlockingDependency;
use crate::plugin_system::error::PluginSystemError;
use crate::plugin_system::loader::{NoopActivator, StaticPluginLoader};
use crate::plugin_system::manifest::PluginManifest;
use crate::plugin_system::record::{InstalledPlugin, PluginHandle, PluginRecord, SystemPlugin};
use crate::plugin_system::registry::PluginRegistry;
use crate::plugin_system::traits::{ActivationContext, Plugin, PluginActivator, PluginId, PluginLoader, PluginState};
use crate::plugin_system::version::Version;
use crate::plugin_system::version_range::VersionRange;
use crate::storage::error::StorageSystemError;
use crate::storage::memory::MemoryPluginStorage;
use crate::storage::provider::PluginStorage;
use crate::storage::FrameworkProperties;

pub use crate::storage::config::DebugOptions;

/// Life-cycle of a framework instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameworkState {
    /// Created, `init()` not called yet
    Constructed,
    /// Registry populated and system plugin active
    Initialized,
    /// Shut down by `uninit()` (or a failed `init()`); may be initialized again
    Uninitialized,
}

impl fmt::Display for FrameworkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FrameworkState::Constructed => "constructed",
            FrameworkState::Initialized => "initialized",
            FrameworkState::Uninitialized => "uninitialized",
        };
        write!(f, "{}", name)
    }
}

/// Assembles a [`PluginFrameworkContext`] from its collaborators.
///
/// Anything not supplied falls back to in-memory storage, an empty
/// [`StaticPluginLoader`], a no-op system activator and a [`LogSink`].
pub struct ContextBuilder {
    props: FrameworkProperties,
    storage: Option<Arc<dyn PluginStorage>>,
    loader: Option<Arc<dyn PluginLoader>>,
    system_activator: Option<Arc<dyn PluginActivator>>,
    sink: Option<Arc<dyn DiagnosticSink>>,
}

impl ContextBuilder {
    pub fn new(props: FrameworkProperties) -> Self {
        Self {
            props,
            storage: None,
            loader: None,
            system_activator: None,
            sink: None,
        }
    }

    pub fn storage(mut self, storage: Arc<dyn PluginStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn loader(mut self, loader: Arc<dyn PluginLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Activator run when the system plugin is started by `init()` and stopped by `uninit()`
    pub fn system_activator(mut self, activator: Arc<dyn PluginActivator>) -> Self {
        self.system_activator = Some(activator);
        self
    }

    pub fn diagnostics(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Build the context. The framework id is allocated here.
    pub fn build(self) -> PluginFrameworkContext {
        let id = global::allocate_id();
        let debug = self.props.debug_options();
        let sink = self.sink.unwrap_or_else(|| Arc::new(LogSink));
        let storage = self
            .storage
            .unwrap_or_else(|| Arc::new(MemoryPluginStorage::new()));
        let log = FrameworkLog::new(id, sink);
        log.debug(&format!("Framework instance created with {} storage", storage.name()));

        PluginFrameworkContext {
            id,
            props: self.props,
            debug,
            storage,
            loader: self.loader.unwrap_or_else(|| Arc::new(StaticPluginLoader::new())),
            system_activator: self.system_activator.unwrap_or_else(|| Arc::new(NoopActivator)),
            log,
            state: RwLock::new(FrameworkState::Constructed),
            registry: Mutex::new(PluginRegistry::new()),
            initialized_once: AtomicBool::new(false),
        }
    }
}

/// The per-instance state of a plugin framework.
///
/// Owns the plugin registry, talks to the storage and loader collaborators
/// and performs dependency resolution. Framework-wide transitions
/// (`init`/`uninit`) are exclusive; plugin operations run concurrently with
/// each other and only serialize on the registry for short critical
/// sections. Activators are always invoked with the registry unlocked.
pub struct PluginFrameworkContext {
    id: u64,
    props: FrameworkProperties,
    debug: DebugOptions,
    storage: Arc<dyn PluginStorage>,
    loader: Arc<dyn PluginLoader>,
    system_activator: Arc<dyn PluginActivator>,
    log: FrameworkLog,
    state: RwLock<FrameworkState>,
    registry: Mutex<PluginRegistry>,
    initialized_once: AtomicBool,
}

impl PluginFrameworkContext {
    /// Create a context with default collaborators
    pub fn new(props: FrameworkProperties) -> Self {
        ContextBuilder::new(props).build()
    }

    pub fn builder(props: FrameworkProperties) -> ContextBuilder {
        ContextBuilder::new(props)
    }

    /// Id of this framework instance, unique within the process
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Diagnostic handle tagged with this instance's id
    pub fn log(&self) -> FrameworkLog {
        self.log.clone()
    }

    pub fn properties(&self) -> &FrameworkProperties {
        &self.props
    }

    pub fn debug_options(&self) -> DebugOptions {
        self.debug
    }

    pub fn storage(&self) -> &Arc<dyn PluginStorage> {
        &self.storage
    }

    pub async fn state(&self) -> FrameworkState {
        *self.state.read().await
    }

    /// Handle for a plugin id of this instance
    pub fn handle(&self, plugin_id: PluginId) -> PluginHandle {
        PluginHandle::new(self.id, plugin_id)
    }

    pub fn system_plugin(&self) -> PluginHandle {
        self.handle(SYSTEM_PLUGIN_ID)
    }

    /// Populate the registry from storage and start the system plugin.
    ///
    /// Valid once after construction and again after every `uninit()`.
    pub async fn init(&self) -> Result<()> {
        let mut state = self.state.write().await;
        if *state == FrameworkState::Initialized {
            return Err(self.violation(PluginSystemError::violation(
                "init",
                &self.subject(),
                "framework is already initialized",
            )));
        }

        // Only marked once the clean went through, so a failed clean is retried
        let first_init = !self.initialized_once.load(Ordering::SeqCst);
        if first_init && self.props.clean_storage_on_first_init() {
            self.log.info("Cleaning plugin storage on first init");
            self.storage.clear().map_err(|e| {
                Error::lifecycle(
                    KernelLifecyclePhase::Initialize,
                    "failed to clean plugin storage",
                    Some(e.into()),
                )
            })?;
        }
        self.initialized_once.store(true, Ordering::SeqCst);

        let stored = self.storage.installed().map_err(|e| {
            Error::lifecycle(
                KernelLifecyclePhase::Initialize,
                format!("failed to read installed plugins from {} storage", self.storage.name()),
                Some(e.into()),
            )
        })?;

        let system_version = Version::parse(FRAMEWORK_VERSION)?;
        {
            let mut registry = self.registry.lock().await;
            registry.clear();
            registry.insert(PluginRecord::System(SystemPlugin::new(system_version.clone())))?;

            for entry in stored {
                let stored_plugin = match entry {
                    Ok(stored_plugin) => stored_plugin,
                    Err(e) => {
                        self.log.warn(&format!("Skipping unreadable plugin record: {}", e));
                        continue;
                    }
                };
                let plugin = InstalledPlugin::new(stored_plugin.id, &stored_plugin.location, stored_plugin.manifest);
                if let Err(e) = registry.insert(PluginRecord::Installed(plugin)) {
                    self.log.warn(&format!(
                        "Skipping stored plugin {} at '{}': {}",
                        stored_plugin.id, stored_plugin.location, e
                    ));
                }
            }

            if let Some(system) = registry.get_mut(SYSTEM_PLUGIN_ID) {
                system.set_state(PluginState::Starting);
            }
        }

        let activation = ActivationContext {
            framework_id: self.id,
            plugin_id: SYSTEM_PLUGIN_ID,
            symbolic_name: SYSTEM_PLUGIN_SYMBOLIC_NAME.to_string(),
            version: system_version,
        };
        if let Err(e) = self.system_activator.start(&activation).await {
            self.registry.lock().await.clear();
            *state = FrameworkState::Uninitialized;
            self.log.error(&format!("System plugin failed to start: {}", e));
            return Err(Error::lifecycle(
                KernelLifecyclePhase::Initialize,
                "system plugin failed to start",
                Some(e),
            ));
        }

        let installed = {
            let mut registry = self.registry.lock().await;
            if let Some(system) = registry.get_mut(SYSTEM_PLUGIN_ID) {
                system.set_state(PluginState::Active);
            }
            registry.len() - 1
        };
        *state = FrameworkState::Initialized;
        self.log.info(&format!("Framework initialized with {} installed plugin(s)", installed));
        Ok(())
    }

    /// Stop every active plugin in reverse install order, then the system
    /// plugin, and empty the registry.
    ///
    /// Stop failures do not interrupt the shutdown; they are collected and
    /// returned together once the framework is uninitialized.
    pub async fn uninit(&self) -> Result<()> {
        let mut state = self.state.write().await;
        if *state != FrameworkState::Initialized {
            self.log.debug(&format!("uninit ignored, framework is {}", *state));
            return Ok(());
        }

        let active: Vec<PluginId> = {
            let registry = self.registry.lock().await;
            registry
                .iter()
                .rev()
                .filter(|p| !p.is_system() && p.state() == PluginState::Active)
                .map(|p| p.id())
                .collect()
        };

        let mut errors = Vec::new();
        for plugin_id in active {
            if let Err(e) = self.stop_active(plugin_id).await {
                self.log.warn(&format!("Error stopping plugin {} during shutdown: {}", plugin_id, e));
                errors.push(e.to_string());
            }
        }

        let system_activation = {
            let mut registry = self.registry.lock().await;
            match registry.get_mut(SYSTEM_PLUGIN_ID) {
                Some(system) => {
                    system.set_state(PluginState::Stopping);
                    Some(self.activation_context(&*system))
                }
                None => None,
            }
        };
        if let Some(activation) = system_activation {
            if let Err(e) = self.system_activator.stop(&activation).await {
                self.log.warn(&format!("Error stopping system plugin: {}", e));
                errors.push(format!("{}: {}", SYSTEM_PLUGIN_SYMBOLIC_NAME, e));
            }
        }

        self.registry.lock().await.clear();
        *state = FrameworkState::Uninitialized;
        self.log.info("Framework uninitialized");

        if errors.is_empty() {
            Ok(())
        } else {
            Err(PluginSystemError::ShutdownErrors(errors).into())
        }
    }

    /// Fails with `IllegalPlugin` unless `handle` was issued by this instance
    pub fn check_our_plugin(&self, handle: &PluginHandle) -> Result<()> {
        if handle.framework_id() != self.id {
            return Err(PluginSystemError::IllegalPlugin {
                framework_id: self.id,
                owner_id: handle.framework_id(),
                plugin_id: handle.plugin_id(),
            }
            .into());
        }
        Ok(())
    }

    /// Try to satisfy every mandatory Require-Plugin constraint of an
    /// installed plugin.
    ///
    /// On success the plugin, together with every installed provider pulled
    /// in along the way, becomes RESOLVED and `None` is returned. Otherwise
    /// the first constraint that no candidate satisfies is returned and no
    /// state changes.
    pub async fn resolve_plugin(&self, handle: &PluginHandle) -> Result<Option<BlockingDependency>> {
        self.check_our_plugin(handle)?;
        let state = self.state.read().await;
        self.require_initialized(*state, "resolve")?;

        let mut registry = self.registry.lock().await;
        let record = registry
            .get(handle.plugin_id())
            .ok_or(PluginSystemError::PluginNotFound(handle.plugin_id()))?;
        if record.state() != PluginState::Installed {
            return Err(self.violation(PluginSystemError::unexpected_state(
                "resolve",
                &record.describe(),
                PluginState::Installed,
                record.state(),
            )));
        }
        Ok(self.resolve_locked(&mut registry, handle.plugin_id()))
    }

    /// Install a plugin from `location`.
    ///
    /// Installing the same location twice returns the existing handle.
    pub async fn install(&self, location: &str, manifest: PluginManifest) -> Result<PluginHandle> {
        let state = self.state.read().await;
        self.require_initialized(*state, "install")?;

        if manifest.symbolic_name.trim().is_empty() {
            return Err(PluginSystemError::ManifestError {
                location: location.to_string(),
                message: "symbolic name is empty".to_string(),
            }
            .into());
        }
        if manifest.symbolic_name == SYSTEM_PLUGIN_SYMBOLIC_NAME {
            return Err(PluginSystemError::ManifestError {
                location: location.to_string(),
                message: format!("symbolic name '{}' is reserved", SYSTEM_PLUGIN_SYMBOLIC_NAME),
            }
            .into());
        }

        // The registry stays locked across the storage write so that two
        // installs of the same location cannot both succeed.
        let mut registry = self.registry.lock().await;
        if let Some(existing) = registry.find_by_location(location) {
            self.trace_lifecycle(&format!("{} already installed from '{}'", existing.describe(), location));
            return Ok(self.handle(existing.id()));
        }
        if registry
            .iter()
            .any(|p| p.symbolic_name() == manifest.symbolic_name && *p.version() == manifest.version)
        {
            return Err(PluginSystemError::DuplicatePlugin {
                symbolic_name: manifest.symbolic_name.clone(),
                version: manifest.version.to_string(),
            }
            .into());
        }

        let stored = self.storage.insert(location, &manifest)?;
        let plugin = InstalledPlugin::new(stored.id, &stored.location, stored.manifest);
        if let Err(e) = registry.insert(PluginRecord::Installed(plugin)) {
            if let Err(cleanup) = self.storage.remove(stored.id) {
                self.log.warn(&format!("Failed to discard stored record {}: {}", stored.id, cleanup));
            }
            return Err(e.into());
        }

        self.trace_lifecycle(&format!(
            "Installed {}:{} from '{}' as plugin {}",
            manifest.symbolic_name, manifest.version, location, stored.id
        ));
        Ok(self.handle(stored.id))
    }

    /// Resolve if needed, load the activator and start the plugin.
    pub async fn start_plugin(&self, handle: &PluginHandle) -> Result<()> {
        self.check_our_plugin(handle)?;
        let state = self.state.read().await;
        self.require_initialized(*state, "start")?;
        let plugin_id = handle.plugin_id();

        let plugin = {
            let mut registry = self.registry.lock().await;
            let record = registry
                .get(plugin_id)
                .ok_or(PluginSystemError::PluginNotFound(plugin_id))?;
            if record.is_system() {
                return Err(self.violation(PluginSystemError::violation(
                    "start",
                    &record.describe(),
                    "the system plugin is started by init()",
                )));
            }
            let subject = record.describe();
            match record.state() {
                PluginState::Active => return Ok(()),
                PluginState::Resolved => {}
                PluginState::Installed => {
                    if let Some(blocker) = self.resolve_locked(&mut registry, plugin_id) {
                        return Err(PluginSystemError::unresolvable(&subject, blocker).into());
                    }
                }
                other => {
                    return Err(self.violation(PluginSystemError::unexpected_state(
                        "start",
                        &subject,
                        PluginState::Resolved,
                        other,
                    )));
                }
            }

            let record = registry
                .get_mut(plugin_id)
                .ok_or(PluginSystemError::PluginNotFound(plugin_id))?;
            record.set_state(PluginState::Starting);
            self.trace_lifecycle(&format!("{} STARTING", subject));
            match record.as_installed() {
                Some(installed) => installed.clone(),
                None => return Err(PluginSystemError::PluginNotFound(plugin_id).into()),
            }
        };

        let activator = match self.loader.load(&plugin) {
            Ok(activator) => activator,
            Err(e) => {
                self.set_plugin_state(plugin_id, PluginState::Resolved).await;
                return Err(e.into());
            }
        };

        let activation = self.activation_context(&plugin);
        if let Err(e) = activator.start(&activation).await {
            self.set_plugin_state(plugin_id, PluginState::Resolved).await;
            return Err(PluginSystemError::ActivatorFailed {
                plugin: plugin.symbolic_name().to_string(),
                operation: "start".to_string(),
                message: e.to_string(),
            }
            .into());
        }

        let registered = {
            let mut registry = self.registry.lock().await;
            match registry.get_mut(plugin_id) {
                Some(record) => {
                    if let Some(installed) = record.as_installed_mut() {
                        installed.set_activator(activator.clone());
                    }
                    record.set_state(PluginState::Active);
                    self.trace_lifecycle(&format!("{} ACTIVE", record.describe()));
                    true
                }
                None => false,
            }
        };
        if registered {
            return Ok(());
        }

        // The record went away while the activator was starting; nothing else will stop it
        self.log.warn(&format!(
            "Plugin {}:{} disappeared while starting, stopping its activator",
            plugin.symbolic_name(),
            plugin.version()
        ));
        if let Err(e) = activator.stop(&activation).await {
            self.log.warn(&format!("Error stopping orphaned plugin {}: {}", plugin_id, e));
        }
        Err(PluginSystemError::PluginNotFound(plugin_id).into())
    }

    /// Stop an active plugin. Plugins in any other state are left alone.
    pub async fn stop_plugin(&self, handle: &PluginHandle) -> Result<()> {
        self.check_our_plugin(handle)?;
        let state = self.state.read().await;
        self.require_initialized(*state, "stop")?;
        self.check_not_system(handle.plugin_id(), "stop")?;
        self.stop_active(handle.plugin_id()).await
    }

    /// Stop the plugin if it is active, then remove it from the registry and storage
    pub async fn uninstall(&self, handle: &PluginHandle) -> Result<()> {
        self.check_our_plugin(handle)?;
        let state = self.state.read().await;
        self.require_initialized(*state, "uninstall")?;
        let plugin_id = handle.plugin_id();
        self.check_not_system(plugin_id, "uninstall")?;

        // State check, STOPPING transition and removal share one critical section
        let (pending, removed) = {
            let mut registry = self.registry.lock().await;
            let record = registry
                .get_mut(plugin_id)
                .ok_or(PluginSystemError::PluginNotFound(plugin_id))?;
            if matches!(record.state(), PluginState::Starting | PluginState::Stopping) {
                return Err(self.violation(PluginSystemError::violation(
                    "uninstall",
                    &record.describe(),
                    format!("plugin is {}", record.state()),
                )));
            }
            let pending = self.begin_stop(record);
            (pending, registry.remove(plugin_id))
        };

        let stopped = match pending {
            Some(pending) => self.finish_stop(pending).await,
            None => Ok(()),
        };

        if let Some(mut record) = removed {
            record.set_state(PluginState::Uninstalled);
            self.trace_lifecycle(&format!("{} UNINSTALLED", record.describe()));
        }
        match self.storage.remove(plugin_id) {
            Ok(()) => {}
            Err(StorageSystemError::RecordNotFound(_)) => {
                self.log.warn(&format!("Plugin {} had no stored record", plugin_id));
            }
            Err(e) => return Err(e.into()),
        }
        stopped
    }

    /// Snapshot of one plugin record
    pub async fn plugin(&self, handle: &PluginHandle) -> Result<PluginRecord> {
        self.check_our_plugin(handle)?;
        self.registry
            .lock()
            .await
            .get(handle.plugin_id())
            .cloned()
            .ok_or_else(|| PluginSystemError::PluginNotFound(handle.plugin_id()).into())
    }

    /// Snapshot of every plugin in install order, system plugin first
    pub async fn plugins(&self) -> Vec<PluginRecord> {
        self.registry.lock().await.iter().cloned().collect()
    }

    /// Plugins named `symbolic_name` with a version in `range`, highest version first
    pub async fn find_plugins(&self, symbolic_name: &str, range: &VersionRange) -> Vec<PluginRecord> {
        self.registry
            .lock()
            .await
            .find(symbolic_name, range)
            .into_iter()
            .cloned()
            .collect()
    }

    // Runs the registry walk and applies the outcome; the registry must be locked by the caller
    fn resolve_locked(&self, registry: &mut PluginRegistry, plugin_id: PluginId) -> Option<BlockingDependency> {
        let debug_resolve = self.debug.resolve;
        let log = &self.log;
        let mut trace = |message: &str| {
            if debug_resolve {
                log.debug(message);
            }
        };

        match registry.resolve(plugin_id, &mut trace) {
            Ok(resolved) => {
                for id in resolved {
                    if let Some(record) = registry.get_mut(id) {
                        if record.state() == PluginState::Installed {
                            record.set_state(PluginState::Resolved);
                            self.trace_lifecycle(&format!("{} RESOLVED", record.describe()));
                        }
                    }
                }
                None
            }
            Err(blocker) => {
                self.log.debug(&format!("Plugin {} cannot resolve, blocked by {}", plugin_id, blocker));
                Some(blocker)
            }
        }
    }

    // Stops an ACTIVE installed plugin; other states are a no-op. Ends in RESOLVED even if the activator fails.
    async fn stop_active(&self, plugin_id: PluginId) -> Result<()> {
        let pending = {
            let mut registry = self.registry.lock().await;
            let record = registry
                .get_mut(plugin_id)
                .ok_or(PluginSystemError::PluginNotFound(plugin_id))?;
            match self.begin_stop(record) {
                Some(pending) => pending,
                None => return Ok(()),
            }
        };

        let result = self.finish_stop(pending).await;
        self.set_plugin_state(plugin_id, PluginState::Resolved).await;
        result
    }

    // Moves an ACTIVE record to STOPPING; the registry must be locked by the caller
    fn begin_stop(&self, record: &mut PluginRecord) -> Option<PendingStop> {
        if record.state() != PluginState::Active {
            return None;
        }
        record.set_state(PluginState::Stopping);
        self.trace_lifecycle(&format!("{} STOPPING", record.describe()));
        Some(PendingStop {
            activator: record.as_installed().and_then(|p| p.activator().cloned()),
            activation: self.activation_context(&*record),
        })
    }

    // Runs the activator's stop with the registry unlocked
    async fn finish_stop(&self, pending: PendingStop) -> Result<()> {
        let result = match &pending.activator {
            Some(activator) => activator.stop(&pending.activation).await,
            None => Ok(()),
        };
        result.map_err(|e| {
            PluginSystemError::ActivatorFailed {
                plugin: pending.activation.symbolic_name.clone(),
                operation: "stop".to_string(),
                message: e.to_string(),
            }
            .into()
        })
    }

    async fn set_plugin_state(&self, plugin_id: PluginId, state: PluginState) {
        let mut registry = self.registry.lock().await;
        if let Some(record) = registry.get_mut(plugin_id) {
            record.set_state(state);
            self.trace_lifecycle(&format!("{} {}", record.describe(), state));
        }
    }

    fn check_not_system(&self, plugin_id: PluginId, operation: &str) -> Result<()> {
        if plugin_id != SYSTEM_PLUGIN_ID {
            return Ok(());
        }
        Err(self.violation(PluginSystemError::violation(
            operation,
            SYSTEM_PLUGIN_SYMBOLIC_NAME,
            "the system plugin is controlled by init() and uninit()",
        )))
    }

    fn require_initialized(&self, state: FrameworkState, operation: &str) -> Result<()> {
        if state == FrameworkState::Initialized {
            return Ok(());
        }
        Err(self.violation(PluginSystemError::violation(
            operation,
            &self.subject(),
            format!("framework is {}", state),
        )))
    }

    fn activation_context(&self, plugin: &dyn Plugin) -> ActivationContext {
        ActivationContext {
            framework_id: self.id,
            plugin_id: plugin.id(),
            symbolic_name: plugin.symbolic_name().to_string(),
            version: plugin.version().clone(),
        }
    }

    // Life-cycle violations are always reported before they are returned
    fn violation(&self, error: PluginSystemError) -> Error {
        self.log.error(&error.to_string());
        error.into()
    }

    fn trace_lifecycle(&self, message: &str) {
        if self.debug.lifecycle {
            self.log.debug(message);
        }
    }

    fn subject(&self) -> String {
        format!("framework #{}", self.id)
    }
}

/// A plugin taken to STOPPING whose activator still has to be called
struct PendingStop {
    activator: Option<Arc<dyn PluginActivator>>,
    activation: ActivationContext,
}

impl fmt::Debug for PluginFrameworkContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginFrameworkContext")
            .field("id", &self.id)
            .field("storage", &self.storage)
            .field("debug", &self.debug)
            .finish()
    }
}

impl Drop for PluginFrameworkContext {
    fn drop(&mut self) {
        global::release(self.id);
    }
}
