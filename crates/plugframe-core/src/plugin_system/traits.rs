use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::kernel::error::Result;
use crate::plugin_system::dependency::PluginDependency;
use crate::plugin_system::error::PluginSystemError;
use crate::plugin_system::record::InstalledPlugin;
use crate::plugin_system::version::Version;

/// Identifier of a plugin inside one framework instance. The system plugin is 0.
pub type PluginId = u64;

/// Life-cycle states of a plugin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluginState {
    /// Installed, dependencies not yet resolved
    Installed,
    /// All mandatory dependencies are satisfied
    Resolved,
    /// Activator start in progress
    Starting,
    /// Started successfully
    Active,
    /// Activator stop in progress
    Stopping,
    /// Removed from the framework
    Uninstalled,
}

impl PluginState {
    /// States in which a plugin counts as an acceptable dependency provider
    pub fn is_resolved(&self) -> bool {
        matches!(
            self,
            PluginState::Resolved | PluginState::Starting | PluginState::Active | PluginState::Stopping
        )
    }
}

impl fmt::Display for PluginState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PluginState::Installed => "INSTALLED",
            PluginState::Resolved => "RESOLVED",
            PluginState::Starting => "STARTING",
            PluginState::Active => "ACTIVE",
            PluginState::Stopping => "STOPPING",
            PluginState::Uninstalled => "UNINSTALLED",
        };
        write!(f, "{}", name)
    }
}

/// Capabilities shared by every plugin record, system plugin included
pub trait Plugin {
    /// Identifier within the owning framework
    fn id(&self) -> PluginId;

    /// Stable symbolic name
    fn symbolic_name(&self) -> &str;

    /// The version of the plugin
    fn version(&self) -> &Version;

    /// Require-Plugin constraints in declaration order
    fn dependencies(&self) -> &[PluginDependency];

    /// Current life-cycle state
    fn state(&self) -> PluginState;

    /// Install location
    fn location(&self) -> &str;
}

/// Information handed to an activator when it is started or stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationContext {
    pub framework_id: u64,
    pub plugin_id: PluginId,
    pub symbolic_name: String,
    pub version: Version,
}

/// Start/stop entry points of a plugin's loaded code
#[async_trait]
pub trait PluginActivator: Send + Sync {
    /// Called when the plugin moves from STARTING to ACTIVE
    async fn start(&self, context: &ActivationContext) -> Result<()>;

    /// Called when the plugin moves from STOPPING to RESOLVED
    async fn stop(&self, context: &ActivationContext) -> Result<()>;
}

/// Turns an installed plugin into runnable code. How that happens is up to the implementation.
pub trait PluginLoader: Send + Sync {
    fn load(&self, plugin: &InstalledPlugin) -> std::result::Result<Arc<dyn PluginActivator>, PluginSystemError>;
}
