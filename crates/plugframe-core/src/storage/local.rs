use std::fmt;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::NamedTempFile; // Import NamedTempFile

use crate::plugin_system::manifest::PluginManifest;
use crate::plugin_system::traits::PluginId;
use crate::storage::error::{StorageResult, StorageSystemError};
use crate::storage::provider::{PluginStorage, StoredPlugin};

const RECORD_PREFIX: &str = "plugin-";
const RECORD_EXTENSION: &str = "json";
const NEXT_ID_FILE: &str = "next-id";

/// Plugin storage in a local directory, one `plugin-<id>.json` file per record.
///
/// Writes go through a temporary file in the same directory that is then
/// renamed over the target, so a crash never leaves a half-written record.
pub struct LocalPluginStorage {
    base_path: PathBuf,
    // Serializes id allocation between concurrent installs
    alloc_lock: Mutex<()>,
}

impl LocalPluginStorage {
    /// Create a new local storage rooted at `base_path`; the directory is created on first write
    pub fn new(base_path: PathBuf) -> Self {
        Self {
            base_path,
            alloc_lock: Mutex::new(()),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn record_path(&self, id: PluginId) -> PathBuf {
        self.base_path.join(format!("{}{}.{}", RECORD_PREFIX, id, RECORD_EXTENSION))
    }

    /// Extracts the id from a `plugin-<id>.json` file name
    fn record_id(path: &Path) -> Option<PluginId> {
        if path.extension().and_then(|ext| ext.to_str()) != Some(RECORD_EXTENSION) {
            return None;
        }
        path.file_stem()
            .and_then(|stem| stem.to_str())
            .and_then(|stem| stem.strip_prefix(RECORD_PREFIX))
            .and_then(|id| id.parse::<PluginId>().ok())
    }

    fn record_ids(&self) -> StorageResult<Vec<PluginId>> {
        let entries = match fs::read_dir(&self.base_path) {
            Ok(entries) => entries,
            // Nothing has been installed yet
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageSystemError::io(e, "read_dir", self.base_path.clone())),
        };

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StorageSystemError::io(e, "read_dir_entry", self.base_path.clone()))?;
            if entry.file_type().map_or(true, |kind| !kind.is_file()) {
                continue;
            }
            if let Some(id) = Self::record_id(&entry.path()) {
                ids.push(id);
            }
        }
        ids.sort_unstable();
        Ok(ids)
    }

    fn read_record(&self, id: PluginId) -> StorageResult<StoredPlugin> {
        let path = self.record_path(id);
        let contents = fs::read_to_string(&path).map_err(|e| StorageSystemError::io(e, "read_to_string", path.clone()))?;
        let record: StoredPlugin = serde_json::from_str(&contents).map_err(|e| StorageSystemError::DeserializationError {
            format: "json".to_string(),
            source: Box::new(e),
        })?;
        if record.id != id {
            return Err(StorageSystemError::InvalidRecord {
                path,
                reason: format!("file name says id {} but record says {}", id, record.id),
            });
        }
        Ok(record)
    }

    /// Next id to hand out: the persisted counter, or one past the highest record
    fn next_id(&self) -> StorageResult<PluginId> {
        let path = self.base_path.join(NEXT_ID_FILE);
        let from_records = self.record_ids()?.last().map_or(1, |max| max + 1);
        match fs::read_to_string(&path) {
            Ok(contents) => match contents.trim().parse::<PluginId>() {
                Ok(counter) => Ok(counter.max(from_records)),
                Err(e) => Err(StorageSystemError::InvalidRecord {
                    path,
                    reason: format!("invalid id counter: {}", e),
                }),
            },
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(from_records),
            Err(e) => Err(StorageSystemError::io(e, "read_to_string", path)),
        }
    }

    fn write_atomic(&self, path: &Path, contents: &[u8]) -> StorageResult<()> {
        fs::create_dir_all(&self.base_path).map_err(|e| StorageSystemError::io(e, "create_dir_all", self.base_path.clone()))?;

        // Create a named temporary file in the same directory as the target file
        let mut temp_file = NamedTempFile::new_in(&self.base_path)
            .map_err(|e| StorageSystemError::io(e, "create_temp_file", self.base_path.clone()))?;
        temp_file
            .write_all(contents)
            .map_err(|e| StorageSystemError::io(e, "write_to_temp_file", temp_file.path().to_path_buf()))?;

        // Persist the temporary file, atomically replacing the target file
        temp_file
            .persist(path)
            .map_err(|e| StorageSystemError::io(e.error, "persist_temp_file", path.to_path_buf()))?;
        Ok(())
    }
}

impl PluginStorage for LocalPluginStorage {
    fn name(&self) -> &str {
        "local"
    }

    fn installed(&self) -> StorageResult<Vec<StorageResult<StoredPlugin>>> {
        Ok(self.record_ids()?.into_iter().map(|id| self.read_record(id)).collect())
    }

    fn insert(&self, location: &str, manifest: &PluginManifest) -> StorageResult<StoredPlugin> {
        let _guard = self.alloc_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let id = self.next_id()?;
        let record = StoredPlugin {
            id,
            location: location.to_string(),
            manifest: manifest.clone(),
        };
        let json = serde_json::to_string_pretty(&record).map_err(|e| StorageSystemError::SerializationError {
            format: "json".to_string(),
            source: Box::new(e),
        })?;

        // The counter is persisted before the record; a failed record write only skips an id
        self.write_atomic(&self.base_path.join(NEXT_ID_FILE), (id + 1).to_string().as_bytes())?;
        self.write_atomic(&self.record_path(id), json.as_bytes())?;
        log::debug!("Stored plugin record {} for '{}' in {}", id, location, self.base_path.display());
        Ok(record)
    }

    fn remove(&self, id: PluginId) -> StorageResult<()> {
        let path = self.record_path(id);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageSystemError::RecordNotFound(id)),
            Err(e) => Err(StorageSystemError::io(e, "remove_file", path)),
        }
    }

    fn clear(&self) -> StorageResult<()> {
        let _guard = self.alloc_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        // The id counter is kept so ids stay unique across a clean
        for id in self.record_ids()? {
            let path = self.record_path(id);
            fs::remove_file(&path).map_err(|e| StorageSystemError::io(e, "remove_file", path))?;
        }
        Ok(())
    }
}

impl fmt::Debug for LocalPluginStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalPluginStorage")
            .field("base_path", &self.base_path)
            .finish()
    }
}
