//! # Plugframe Storage
//!
//! The persistence collaborator of a framework instance and the framework
//! property dictionary.
//!
//! A framework keeps all of its plugin state in memory and rebuilds it from a
//! [`PluginStorage`] at every `init()`. Two stores ship with the core:
//!
//! - **[`MemoryPluginStorage`]**: records live as long as the storage value.
//! - **[`LocalPluginStorage`]**: one JSON file per installed plugin in a
//!   directory, written atomically.
//!
//! [`FrameworkProperties`] (in [`config`]) is the configuration snapshot a
//! framework instance is constructed with; it can be loaded from JSON, YAML
//! or TOML files depending on enabled features.
pub mod config;
pub mod error;
pub mod local;
pub mod memory;
pub mod provider;

pub use config::{ConfigFormat, DebugOptions, FrameworkProperties};
pub use error::{StorageResult, StorageSystemError};
pub use local::LocalPluginStorage;
pub use memory::MemoryPluginStorage;
pub use provider::{PluginStorage, StoredPlugin};
