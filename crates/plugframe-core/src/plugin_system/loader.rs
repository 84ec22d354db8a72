use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::kernel::error::Result;
use crate::plugin_system::error::PluginSystemError;
use crate::plugin_system::record::InstalledPlugin;
use crate::plugin_system::traits::{ActivationContext, Plugin, PluginActivator, PluginLoader};

/// Produces a fresh activator instance each time a plugin is loaded
pub type ActivatorFactory = Arc<dyn Fn() -> Arc<dyn PluginActivator> + Send + Sync>;

/// Activator for plugins that ship no code of their own
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopActivator;

#[async_trait]
impl PluginActivator for NoopActivator {
    async fn start(&self, context: &ActivationContext) -> Result<()> {
        log::trace!("No activator to start for {}", context.symbolic_name);
        Ok(())
    }

    async fn stop(&self, context: &ActivationContext) -> Result<()> {
        log::trace!("No activator to stop for {}", context.symbolic_name);
        Ok(())
    }
}

/// Loader backed by activators registered in-process.
///
/// The activator is looked up by the manifest's `activator` name, falling
/// back to the symbolic name. Plugins that declare no activator and have no
/// registration get a [`NoopActivator`].
#[derive(Default)]
pub struct StaticPluginLoader {
    factories: RwLock<HashMap<String, ActivatorFactory>>,
}

impl StaticPluginLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under an activator or symbolic name, replacing any previous one
    pub fn register<F>(&self, name: &str, factory: F)
    where
        F: Fn() -> Arc<dyn PluginActivator> + Send + Sync + 'static,
    {
        let mut factories = self.factories.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        factories.insert(name.to_string(), Arc::new(factory));
    }

    /// Check if a factory is registered under `name`
    pub fn is_registered(&self, name: &str) -> bool {
        let factories = self.factories.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        factories.contains_key(name)
    }

    fn factory(&self, name: &str) -> Option<ActivatorFactory> {
        let factories = self.factories.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        factories.get(name).cloned()
    }
}

impl fmt::Debug for StaticPluginLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let factories = self.factories.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut names: Vec<&String> = factories.keys().collect();
        names.sort();
        f.debug_struct("StaticPluginLoader").field("factories", &names).finish()
    }
}

impl PluginLoader for StaticPluginLoader {
    fn load(&self, plugin: &InstalledPlugin) -> std::result::Result<Arc<dyn PluginActivator>, PluginSystemError> {
        match &plugin.manifest().activator {
            Some(activator) => match self.factory(activator) {
                Some(factory) => Ok(factory()),
                None => Err(PluginSystemError::ActivatorFailed {
                    plugin: plugin.symbolic_name().to_string(),
                    operation: "load".to_string(),
                    message: format!("no activator registered under '{}'", activator),
                }),
            },
            None => Ok(self
                .factory(plugin.symbolic_name())
                .map(|factory| factory())
                .unwrap_or_else(|| Arc::new(NoopActivator))),
        }
    }
}
