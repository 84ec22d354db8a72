use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::plugin_system::manifest::PluginManifest;
use crate::plugin_system::traits::PluginId;
use crate::storage::error::StorageResult;

/// A persisted plugin: its id, install location and manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredPlugin {
    pub id: PluginId,
    pub location: String,
    pub manifest: PluginManifest,
}

/// Persistent store of installed plugin metadata.
///
/// The framework reads everything back at `init()` and asks the store to
/// persist or discard single records on install and uninstall. Ids handed
/// out by [`insert`](PluginStorage::insert) start at 1 and are never reused.
pub trait PluginStorage: Send + Sync + Debug {
    /// Get the name of this storage
    fn name(&self) -> &str;

    /// All installed records in id order.
    ///
    /// The outer error means the store could not be enumerated at all; an
    /// inner error affects only that one record.
    fn installed(&self) -> StorageResult<Vec<StorageResult<StoredPlugin>>>;

    /// Persist a new record and assign its id
    fn insert(&self, location: &str, manifest: &PluginManifest) -> StorageResult<StoredPlugin>;

    /// Discard a record
    fn remove(&self, id: PluginId) -> StorageResult<()>;

    /// Discard every record
    fn clear(&self) -> StorageResult<()>;
}
