//! # Plugframe Plugin System Errors
//!
//! Defines error types specific to the plugin system.
//!
//! [`PluginSystemError`] covers ownership checks on plugin handles, failed
//! dependency resolution, life-cycle precondition violations, activator
//! failures and the aggregated errors of a framework shutdown. Parsing errors
//! of versions and Require-Plugin headers are wrapped from
//! [`VersionError`] and [`DependencyError`].
use crate::plugin_system::dependency::{BlockingDependency, DependencyError};
use crate::plugin_system::traits::PluginState;
use crate::plugin_system::version::VersionError;
use crate::plugin_system::version_range::VersionRange;

#[derive(Debug, thiserror::Error)]
pub enum PluginSystemError {
    #[error("Plugin {plugin_id} belongs to framework #{owner_id}, not framework #{framework_id}")]
    IllegalPlugin {
        framework_id: u64,
        owner_id: u64,
        plugin_id: u64,
    },

    #[error("Plugin '{plugin}' cannot resolve: no installed plugin satisfies '{symbolic_name}' {range}")]
    UnresolvableDependency {
        plugin: String,
        symbolic_name: String,
        range: VersionRange,
    },

    #[error("Life-cycle violation in '{operation}' for '{subject}': {message}")]
    LifecycleViolation {
        operation: String,
        subject: String,
        message: String,
    },

    #[error("Plugin {0} is not installed in this framework")]
    PluginNotFound(u64),

    #[error("Plugin '{symbolic_name}' version {version} is already installed")]
    DuplicatePlugin { symbolic_name: String, version: String },

    #[error("Plugin manifest error for '{location}': {message}")]
    ManifestError { location: String, message: String },

    #[error("Activator of plugin '{plugin}' failed during '{operation}': {message}")]
    ActivatorFailed {
        plugin: String,
        operation: String,
        message: String,
    },

    #[error("Encountered errors during framework shutdown: {}", .0.join("; "))]
    ShutdownErrors(Vec<String>),

    #[error("Version parsing error: {0}")]
    VersionParsing(#[from] VersionError),

    #[error("Dependency declaration error: {0}")]
    DependencyParsing(#[from] DependencyError),
}

impl PluginSystemError {
    /// Builds an [`UnresolvableDependency`](Self::UnresolvableDependency) error for `plugin`
    pub fn unresolvable(plugin: &str, blocker: BlockingDependency) -> Self {
        PluginSystemError::UnresolvableDependency {
            plugin: plugin.to_string(),
            symbolic_name: blocker.symbolic_name,
            range: blocker.range,
        }
    }

    pub(crate) fn violation(operation: &str, subject: &str, message: impl Into<String>) -> Self {
        PluginSystemError::LifecycleViolation {
            operation: operation.to_string(),
            subject: subject.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn unexpected_state(operation: &str, subject: &str, expected: PluginState, actual: PluginState) -> Self {
        Self::violation(operation, subject, format!("expected state {}, found {}", expected, actual))
    }
}
