pub mod kernel;
pub mod plugin_system;
pub mod storage;

// Re-export key public types/traits for easier use by the binary
pub use kernel::error::Error as KernelError;
pub use kernel::{Framework, FrameworkState, PluginFrameworkContext};
pub use plugin_system::{
    BlockingDependency, Plugin, PluginDependency, PluginHandle, PluginManifest, PluginState, Version, VersionRange,
};
pub use storage::{FrameworkProperties, PluginStorage};

#[cfg(test)]
mod tests;
