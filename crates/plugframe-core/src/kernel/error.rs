//! # Plugframe Kernel Errors
//!
//! Defines [`Error`], the error type returned by framework-level operations.
//!
//! Subsystem errors ([`PluginSystemError`], [`StorageSystemError`]) convert
//! into it with `?`; failures tied to a framework lifecycle transition are
//! reported as [`Error::KernelLifecycleError`] with the phase they occurred in.
use std::result::Result as StdResult;

use crate::plugin_system::dependency::DependencyError;
use crate::plugin_system::error::PluginSystemError;
use crate::plugin_system::version::VersionError;
use crate::storage::error::StorageSystemError;
use thiserror::Error as ThisError;

/// Error type of the plugframe core
#[derive(Debug, ThisError)]
pub enum Error {
    /// Specific, typed plugin system error
    #[error("Plugin system error: {0}")]
    PluginSystem(#[from] PluginSystemError),

    /// Specific, typed storage system error
    #[error("Storage system error: {0}")]
    StorageSystem(#[from] StorageSystemError),

    /// Error occurring during a specific framework lifecycle phase.
    #[error("Kernel lifecycle error during {phase}: {message}")]
    KernelLifecycleError {
        phase: KernelLifecyclePhase,
        message: String,
        #[source]
        source: Option<Box<Error>>, // Can wrap another kernel error or a subsystem error
    },

    /// Generic error with message
    #[error("Error: {0}")]
    Other(String),
}

/// Represents a specific phase in the framework's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
pub enum KernelLifecyclePhase {
    #[error("Bootstrap")]
    Bootstrap,
    #[error("Initialize")]
    Initialize,
    #[error("Shutdown")]
    Shutdown,
}

/// Shorthand for Result with our Error type
pub type Result<T> = StdResult<T, Error>;

impl Error {
    /// Wrap `source` as a failure of `phase`
    pub fn lifecycle(phase: KernelLifecyclePhase, message: impl Into<String>, source: Option<Error>) -> Self {
        Error::KernelLifecycleError {
            phase,
            message: message.into(),
            source: source.map(Box::new),
        }
    }

    /// The plugin system error inside, if any
    pub fn as_plugin_system(&self) -> Option<&PluginSystemError> {
        match self {
            Error::PluginSystem(e) => Some(e),
            _ => None,
        }
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}

impl From<VersionError> for Error {
    fn from(err: VersionError) -> Self {
        Error::PluginSystem(PluginSystemError::VersionParsing(err))
    }
}

impl From<DependencyError> for Error {
    fn from(err: DependencyError) -> Self {
        Error::PluginSystem(PluginSystemError::DependencyParsing(err))
    }
}
