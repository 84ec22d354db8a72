use serde::{Deserialize, Serialize};

use crate::plugin_system::dependency::{DependencyError, PluginDependency};
use crate::plugin_system::version::Version;

/// Describes an installable plugin: identity, version and Require-Plugin constraints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginManifest {
    /// Stable identifier, independent of version
    pub symbolic_name: String,

    /// Plugin version; `0.0.0` when omitted
    #[serde(default)]
    pub version: Version,

    /// Human-readable name
    #[serde(default)]
    pub name: Option<String>,

    /// Plugin description
    #[serde(default)]
    pub description: Option<String>,

    /// Plugin vendor
    #[serde(default)]
    pub vendor: Option<String>,

    /// Name of the activator the loader should instantiate (optional)
    #[serde(default)]
    pub activator: Option<String>,

    /// Require-Plugin constraints, in declaration order
    #[serde(default)]
    pub require_plugin: Vec<PluginDependency>,
}

impl PluginManifest {
    /// Create a new plugin manifest without dependencies
    pub fn new(symbolic_name: &str, version: Version) -> Self {
        Self {
            symbolic_name: symbolic_name.to_string(),
            version,
            name: None,
            description: None,
            vendor: None,
            activator: None,
            require_plugin: Vec::new(),
        }
    }

    /// Add a dependency
    pub fn add_dependency(&mut self, dependency: PluginDependency) -> &mut Self {
        self.require_plugin.push(dependency);
        self
    }

    /// Add every clause of a Require-Plugin header
    pub fn add_require_header(&mut self, header: &str) -> Result<&mut Self, DependencyError> {
        let dependencies = PluginDependency::parse_header(header)?;
        self.require_plugin.extend(dependencies);
        Ok(self)
    }

    /// Set the activator name
    pub fn set_activator(&mut self, activator: &str) -> &mut Self {
        self.activator = Some(activator.to_string());
        self
    }

    /// Set the human-readable name
    pub fn set_name(&mut self, name: &str) -> &mut Self {
        self.name = Some(name.to_string());
        self
    }

    /// Set the description
    pub fn set_description(&mut self, description: &str) -> &mut Self {
        self.description = Some(description.to_string());
        self
    }

    /// Parse a manifest from its JSON form
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize the manifest to pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
