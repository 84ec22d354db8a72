use std::sync::Arc;

use crate::kernel::constants;
use crate::kernel::context::{ContextBuilder, PluginFrameworkContext};
use crate::kernel::diagnostics::DiagnosticSink;
use crate::kernel::error::{Error, KernelLifecyclePhase, Result};
use crate::plugin_system::loader::StaticPluginLoader;
use crate::plugin_system::traits::PluginActivator;
use crate::storage::local::LocalPluginStorage;
use crate::storage::memory::MemoryPluginStorage;
use crate::storage::provider::PluginStorage;
use crate::storage::FrameworkProperties;

/// A plugin framework assembled from its properties.
///
/// Picks the storage (`plugframe.storage` set means a [`LocalPluginStorage`]
/// in that directory, otherwise in-memory), wires in a [`StaticPluginLoader`]
/// and owns the resulting [`PluginFrameworkContext`].
pub struct Framework {
    context: Arc<PluginFrameworkContext>,
    loader: Arc<StaticPluginLoader>,
}

impl Framework {
    /// Creates a framework with an empty activator registry
    pub fn new(props: FrameworkProperties) -> Self {
        Self::with_loader(props, Arc::new(StaticPluginLoader::new()))
    }

    /// Creates a framework that loads activators from `loader`
    pub fn with_loader(props: FrameworkProperties, loader: Arc<StaticPluginLoader>) -> Self {
        Self::assemble(ContextBuilder::new(props.clone()), &props, loader)
    }

    /// Like [`with_loader`](Self::with_loader) with a custom system activator and diagnostics sink
    pub fn with_collaborators(
        props: FrameworkProperties,
        loader: Arc<StaticPluginLoader>,
        system_activator: Arc<dyn PluginActivator>,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        let builder = ContextBuilder::new(props.clone())
            .system_activator(system_activator)
            .diagnostics(sink);
        Self::assemble(builder, &props, loader)
    }

    fn assemble(builder: ContextBuilder, props: &FrameworkProperties, loader: Arc<StaticPluginLoader>) -> Self {
        let storage: Arc<dyn PluginStorage> = match props.storage_location() {
            Some(dir) => Arc::new(LocalPluginStorage::new(dir)),
            None => Arc::new(MemoryPluginStorage::new()),
        };
        let context = builder.storage(storage).loader(loader.clone()).build();
        log::info!(
            "Created {} v{} framework #{}",
            constants::APP_NAME,
            constants::FRAMEWORK_VERSION,
            context.id()
        );
        Self {
            context: Arc::new(context),
            loader,
        }
    }

    pub fn context(&self) -> &Arc<PluginFrameworkContext> {
        &self.context
    }

    /// The activator registry used when plugins are started
    pub fn loader(&self) -> &Arc<StaticPluginLoader> {
        &self.loader
    }

    /// Initialize the framework
    pub async fn launch(&self) -> Result<()> {
        self.context.init().await.map_err(|e| match e {
            Error::KernelLifecycleError { .. } => e,
            other => Error::lifecycle(KernelLifecyclePhase::Bootstrap, "framework launch failed", Some(other)),
        })
    }

    /// Stop all plugins and uninitialize the framework
    pub async fn shutdown(&self) -> Result<()> {
        log::info!("Shutting down framework #{}", self.context.id());
        self.context.uninit().await
    }
}
