use std::fmt;
use std::sync::Arc;

use crate::kernel::constants;
use crate::plugin_system::dependency::PluginDependency;
use crate::plugin_system::manifest::PluginManifest;
use crate::plugin_system::traits::{Plugin, PluginActivator, PluginId, PluginState};
use crate::plugin_system::version::Version;

/// Caller-facing reference to a plugin of a specific framework instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PluginHandle {
    framework_id: u64,
    plugin_id: PluginId,
}

impl PluginHandle {
    pub fn new(framework_id: u64, plugin_id: PluginId) -> Self {
        Self { framework_id, plugin_id }
    }

    /// Id of the framework instance that issued this handle
    pub fn framework_id(&self) -> u64 {
        self.framework_id
    }

    pub fn plugin_id(&self) -> PluginId {
        self.plugin_id
    }
}

impl fmt::Display for PluginHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fw#{}/plugin#{}", self.framework_id, self.plugin_id)
    }
}

/// A plugin restored from storage or installed at runtime
#[derive(Clone)]
pub struct InstalledPlugin {
    id: PluginId,
    location: String,
    manifest: PluginManifest,
    state: PluginState,
    activator: Option<Arc<dyn PluginActivator>>,
}

impl InstalledPlugin {
    pub fn new(id: PluginId, location: &str, manifest: PluginManifest) -> Self {
        Self {
            id,
            location: location.to_string(),
            manifest,
            state: PluginState::Installed,
            activator: None,
        }
    }

    pub fn manifest(&self) -> &PluginManifest {
        &self.manifest
    }

    /// The activator, present once the plugin has been loaded
    pub fn activator(&self) -> Option<&Arc<dyn PluginActivator>> {
        self.activator.as_ref()
    }

    pub(crate) fn set_activator(&mut self, activator: Arc<dyn PluginActivator>) {
        self.activator = Some(activator);
    }
}

impl fmt::Debug for InstalledPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstalledPlugin")
            .field("id", &self.id)
            .field("location", &self.location)
            .field("symbolic_name", &self.manifest.symbolic_name)
            .field("version", &self.manifest.version.to_string())
            .field("state", &self.state)
            .field("loaded", &self.activator.is_some())
            .finish()
    }
}

impl Plugin for InstalledPlugin {
    fn id(&self) -> PluginId {
        self.id
    }

    fn symbolic_name(&self) -> &str {
        &self.manifest.symbolic_name
    }

    fn version(&self) -> &Version {
        &self.manifest.version
    }

    fn dependencies(&self) -> &[PluginDependency] {
        &self.manifest.require_plugin
    }

    fn state(&self) -> PluginState {
        self.state
    }

    fn location(&self) -> &str {
        &self.location
    }
}

/// The bootstrap plugin representing the framework itself
#[derive(Debug, Clone)]
pub struct SystemPlugin {
    version: Version,
    state: PluginState,
}

impl SystemPlugin {
    pub fn new(version: Version) -> Self {
        Self {
            version,
            state: PluginState::Installed,
        }
    }
}

impl Plugin for SystemPlugin {
    fn id(&self) -> PluginId {
        constants::SYSTEM_PLUGIN_ID
    }

    fn symbolic_name(&self) -> &str {
        constants::SYSTEM_PLUGIN_SYMBOLIC_NAME
    }

    fn version(&self) -> &Version {
        &self.version
    }

    fn dependencies(&self) -> &[PluginDependency] {
        &[]
    }

    fn state(&self) -> PluginState {
        self.state
    }

    fn location(&self) -> &str {
        constants::SYSTEM_PLUGIN_LOCATION
    }
}

/// Every kind of plugin the registry can hold
#[derive(Debug, Clone)]
pub enum PluginRecord {
    System(SystemPlugin),
    Installed(InstalledPlugin),
}

impl PluginRecord {
    pub fn is_system(&self) -> bool {
        matches!(self, PluginRecord::System(_))
    }

    pub fn as_installed(&self) -> Option<&InstalledPlugin> {
        match self {
            PluginRecord::Installed(plugin) => Some(plugin),
            PluginRecord::System(_) => None,
        }
    }

    pub(crate) fn as_installed_mut(&mut self) -> Option<&mut InstalledPlugin> {
        match self {
            PluginRecord::Installed(plugin) => Some(plugin),
            PluginRecord::System(_) => None,
        }
    }

    pub(crate) fn set_state(&mut self, state: PluginState) {
        match self {
            PluginRecord::System(plugin) => plugin.state = state,
            PluginRecord::Installed(plugin) => plugin.state = state,
        }
    }

    /// `symbolic_name:version` for log output
    pub fn describe(&self) -> String {
        format!("{}:{}", self.symbolic_name(), self.version())
    }
}

impl Plugin for PluginRecord {
    fn id(&self) -> PluginId {
        match self {
            PluginRecord::System(plugin) => plugin.id(),
            PluginRecord::Installed(plugin) => plugin.id(),
        }
    }

    fn symbolic_name(&self) -> &str {
        match self {
            PluginRecord::System(plugin) => plugin.symbolic_name(),
            PluginRecord::Installed(plugin) => plugin.symbolic_name(),
        }
    }

    fn version(&self) -> &Version {
        match self {
            PluginRecord::System(plugin) => plugin.version(),
            PluginRecord::Installed(plugin) => plugin.version(),
        }
    }

    fn dependencies(&self) -> &[PluginDependency] {
        match self {
            PluginRecord::System(plugin) => plugin.dependencies(),
            PluginRecord::Installed(plugin) => plugin.dependencies(),
        }
    }

    fn state(&self) -> PluginState {
        match self {
            PluginRecord::System(plugin) => plugin.state(),
            PluginRecord::Installed(plugin) => plugin.state(),
        }
    }

    fn location(&self) -> &str {
        match self {
            PluginRecord::System(plugin) => plugin.location(),
            PluginRecord::Installed(plugin) => plugin.location(),
        }
    }
}
