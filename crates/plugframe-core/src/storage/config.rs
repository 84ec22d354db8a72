use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json;
#[cfg(feature = "yaml-config")]
use serde_yaml;
#[cfg(feature = "toml-config")]
use toml;

use crate::kernel::constants::{
    PROP_DEBUG_LIFECYCLE, PROP_DEBUG_RESOLVE, PROP_STORAGE, PROP_STORAGE_CLEAN, STORAGE_CLEAN_ON_FIRST_INIT,
};
use crate::storage::error::{StorageResult, StorageSystemError};

/// Supported property file formats
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigFormat {
    /// JSON format (.json)
    Json,
    /// YAML format (.yaml, .yml) - requires "yaml-config" feature
    #[cfg(feature = "yaml-config")]
    Yaml,
    /// TOML format (.toml) - requires "toml-config" feature
    #[cfg(feature = "toml-config")]
    Toml,
}

impl ConfigFormat {
    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => "yaml",
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => "toml",
        }
    }

    /// Determine format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                #[cfg(feature = "yaml-config")]
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                #[cfg(feature = "toml-config")]
                "toml" => Some(ConfigFormat::Toml),
                _ => None,
            })
    }
}

/// Debug switches read from the framework properties
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebugOptions {
    /// Trace every step of dependency resolution
    pub resolve: bool,
    /// Trace plugin and framework state transitions
    pub lifecycle: bool,
}

/// Framework configuration handed to a framework instance at construction.
///
/// The dictionary is opaque to the core apart from a handful of
/// `plugframe.*` keys; everything else is carried through untouched so
/// plugins and front ends can read their own settings from it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameworkProperties {
    #[serde(flatten)]
    values: HashMap<String, serde_json::Value>,
}

impl FrameworkProperties {
    /// Create a new empty property set
    pub fn new() -> Self {
        Self { values: HashMap::new() }
    }

    pub fn from_hashmap(values: HashMap<String, serde_json::Value>) -> Self {
        Self { values }
    }

    /// Get a property value, `None` when absent or of the wrong type
    pub fn get<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        self.values
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Get a property value with default
    pub fn get_or<T: for<'de> Deserialize<'de>>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    /// Set a property value
    pub fn set<T: Serialize>(&mut self, key: &str, value: T) -> StorageResult<()> {
        let json_value = serde_json::to_value(value).map_err(|e| StorageSystemError::SerializationError {
            format: "json".to_string(),
            source: Box::new(e),
        })?;
        self.values.insert(key.to_string(), json_value);
        Ok(())
    }

    /// Builder-style [`set`](Self::set) for string values, which cannot fail
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.values
            .insert(key.to_string(), serde_json::Value::String(value.into()));
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<serde_json::Value> {
        self.values.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// All keys, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.values.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Merge with another property set, overriding existing values
    pub fn merge(&mut self, other: &FrameworkProperties) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Serialize to string based on format
    pub fn serialize(&self, format: ConfigFormat) -> StorageResult<String> {
        fn failed<E: std::error::Error + Send + Sync + 'static>(format: ConfigFormat, e: E) -> StorageSystemError {
            StorageSystemError::SerializationError {
                format: format.extension().to_string(),
                source: Box::new(e),
            }
        }
        match format {
            ConfigFormat::Json => serde_json::to_string_pretty(&self).map_err(|e| failed(format, e)),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::to_string(&self).map_err(|e| failed(format, e)),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::to_string_pretty(&self).map_err(|e| failed(format, e)),
        }
    }

    /// Parse a property document in the given format
    pub fn parse(data: &str, format: ConfigFormat) -> StorageResult<Self> {
        fn failed<E: std::error::Error + Send + Sync + 'static>(format: ConfigFormat, e: E) -> StorageSystemError {
            StorageSystemError::DeserializationError {
                format: format.extension().to_string(),
                source: Box::new(e),
            }
        }
        match format {
            ConfigFormat::Json => serde_json::from_str(data).map_err(|e| failed(format, e)),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::from_str(data).map_err(|e| failed(format, e)),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::from_str(data).map_err(|e| failed(format, e)),
        }
    }

    /// Load a property file, picking the format from its extension
    pub fn load(path: &Path) -> StorageResult<Self> {
        let format = ConfigFormat::from_path(path)
            .ok_or_else(|| StorageSystemError::UnsupportedConfigFormat(path.display().to_string()))?;
        let data = fs::read_to_string(path).map_err(|e| StorageSystemError::io(e, "read_to_string", path.to_path_buf()))?;
        Self::parse(&data, format)
    }

    /// Directory for persistent plugin records, `None` for in-memory storage
    pub fn storage_location(&self) -> Option<PathBuf> {
        self.get::<String>(PROP_STORAGE)
            .filter(|location| !location.is_empty())
            .map(PathBuf::from)
    }

    /// Whether storage is wiped on the first `init()` of an instance
    pub fn clean_storage_on_first_init(&self) -> bool {
        self.get::<String>(PROP_STORAGE_CLEAN).as_deref() == Some(STORAGE_CLEAN_ON_FIRST_INIT)
    }

    pub fn debug_options(&self) -> DebugOptions {
        DebugOptions {
            resolve: self.flag(PROP_DEBUG_RESOLVE),
            lifecycle: self.flag(PROP_DEBUG_LIFECYCLE),
        }
    }

    // Accepts both JSON booleans and "true"/"false" strings
    fn flag(&self, key: &str) -> bool {
        match self.values.get(key) {
            Some(serde_json::Value::Bool(b)) => *b,
            Some(serde_json::Value::String(s)) => s.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }
}
