use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::plugin_system::version::{Version, VersionError};
use crate::plugin_system::version_range::VersionRange;

/// Header attribute carrying the version range of a Require-Plugin clause
pub const PLUGIN_VERSION_ATTRIBUTE: &str = "plugin-version";

/// Header directive selecting mandatory or optional resolution
pub const RESOLUTION_DIRECTIVE: &str = "resolution";

/// Whether an unsatisfied dependency blocks resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    /// The dependency must be satisfied for the plugin to resolve
    #[default]
    Mandatory,
    /// The dependency is wired when available, otherwise ignored
    Optional,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Mandatory => write!(f, "mandatory"),
            Resolution::Optional => write!(f, "optional"),
        }
    }
}

/// A Require-Plugin constraint: another plugin, by symbolic name and version range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginDependency {
    /// Symbolic name of the required plugin
    pub symbolic_name: String,

    /// Acceptable versions; unspecified means any version
    #[serde(default, rename = "version")]
    pub version_range: VersionRange,

    /// Whether the dependency blocks resolution when unsatisfied
    #[serde(default)]
    pub resolution: Resolution,
}

/// Error that can occur when reading dependency declarations
#[derive(Debug, Error)]
pub enum DependencyError {
    /// A clause without a symbolic name
    #[error("Require-Plugin clause '{0}' has no symbolic name")]
    EmptySymbolicName(String),

    /// The plugin-version attribute is not a valid range
    #[error("Invalid plugin-version for '{symbolic_name}': {source}")]
    InvalidRange {
        symbolic_name: String,
        #[source]
        source: VersionError,
    },

    /// Unknown value for the resolution directive
    #[error("Invalid resolution '{value}' for '{symbolic_name}', expected 'mandatory' or 'optional'")]
    InvalidResolution { symbolic_name: String, value: String },

    /// Unbalanced quotes or a parameter without '='
    #[error("Malformed Require-Plugin clause '{clause}': {reason}")]
    MalformedClause { clause: String, reason: String },
}

impl PluginDependency {
    /// Create a mandatory dependency with a specific version range
    pub fn required(symbolic_name: &str, version_range: VersionRange) -> Self {
        Self {
            symbolic_name: symbolic_name.to_string(),
            version_range,
            resolution: Resolution::Mandatory,
        }
    }

    /// Create a mandatory dependency accepting any version
    pub fn required_any(symbolic_name: &str) -> Self {
        Self::required(symbolic_name, VersionRange::unspecified())
    }

    /// Create an optional dependency with a specific version range
    pub fn optional(symbolic_name: &str, version_range: VersionRange) -> Self {
        Self {
            symbolic_name: symbolic_name.to_string(),
            version_range,
            resolution: Resolution::Optional,
        }
    }

    /// Create an optional dependency accepting any version
    pub fn optional_any(symbolic_name: &str) -> Self {
        Self::optional(symbolic_name, VersionRange::unspecified())
    }

    pub fn is_mandatory(&self) -> bool {
        self.resolution == Resolution::Mandatory
    }

    /// Check if a provider with the given version satisfies this dependency
    pub fn is_satisfied_by(&self, version: &Version) -> bool {
        self.version_range.includes(version)
    }

    /// Parses a Require-Plugin header value, e.g.
    /// `org.example.log; plugin-version="[1.0,2.0)", org.example.ui; resolution:=optional`
    pub fn parse_header(header: &str) -> Result<Vec<PluginDependency>, DependencyError> {
        let mut dependencies = Vec::new();
        for clause in split_unquoted(header, ',')? {
            let clause = clause.trim();
            if clause.is_empty() {
                continue;
            }
            dependencies.push(Self::parse_clause(clause)?);
        }
        Ok(dependencies)
    }

    fn parse_clause(clause: &str) -> Result<PluginDependency, DependencyError> {
        let mut parts = split_unquoted(clause, ';')?.into_iter();
        let symbolic_name = parts.next().map(str::trim).unwrap_or_default();
        if symbolic_name.is_empty() {
            return Err(DependencyError::EmptySymbolicName(clause.to_string()));
        }

        let mut dependency = PluginDependency::required_any(symbolic_name);
        for param in parts {
            let param = param.trim();
            if param.is_empty() {
                continue;
            }
            // Directives use ":=", attributes use "="
            let (key, value, is_directive) = if let Some((key, value)) = param.split_once(":=") {
                (key.trim(), value.trim(), true)
            } else if let Some((key, value)) = param.split_once('=') {
                (key.trim(), value.trim(), false)
            } else {
                return Err(DependencyError::MalformedClause {
                    clause: clause.to_string(),
                    reason: format!("parameter '{}' has no value", param),
                });
            };
            let value = unquote(value);

            match (key, is_directive) {
                (PLUGIN_VERSION_ATTRIBUTE, false) => {
                    dependency.version_range =
                        VersionRange::parse(value).map_err(|source| DependencyError::InvalidRange {
                            symbolic_name: symbolic_name.to_string(),
                            source,
                        })?;
                }
                (RESOLUTION_DIRECTIVE, true) => {
                    dependency.resolution = match value {
                        "mandatory" => Resolution::Mandatory,
                        "optional" => Resolution::Optional,
                        other => {
                            return Err(DependencyError::InvalidResolution {
                                symbolic_name: symbolic_name.to_string(),
                                value: other.to_string(),
                            })
                        }
                    };
                }
                _ => {
                    log::debug!("Ignoring unknown Require-Plugin parameter '{}' for '{}'", key, symbolic_name);
                }
            }
        }
        Ok(dependency)
    }
}

/// Splits on `separator` outside of double quotes
fn split_unquoted(input: &str, separator: char) -> Result<Vec<&str>, DependencyError> {
    let mut parts = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;
    for (idx, c) in input.char_indices() {
        if c == '"' {
            in_quotes = !in_quotes;
        } else if c == separator && !in_quotes {
            parts.push(&input[start..idx]);
            start = idx + c.len_utf8();
        }
    }
    if in_quotes {
        return Err(DependencyError::MalformedClause {
            clause: input.to_string(),
            reason: "unbalanced quotes".to_string(),
        });
    }
    parts.push(&input[start..]);
    Ok(parts)
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

impl fmt::Display for PluginDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let requirement_type = match self.resolution {
            Resolution::Mandatory => "Requires",
            Resolution::Optional => "Optional",
        };
        if self.version_range.is_specified() {
            write!(f, "{} plugin: {} (version: {})", requirement_type, self.symbolic_name, self.version_range)
        } else {
            write!(f, "{} plugin: {} (any version)", requirement_type, self.symbolic_name)
        }
    }
}

/// The first mandatory constraint of a plugin that no installed plugin can satisfy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockingDependency {
    /// Symbolic name of the missing provider
    pub symbolic_name: String,
    /// The range no candidate satisfied
    pub range: VersionRange,
}

impl From<&PluginDependency> for BlockingDependency {
    fn from(dependency: &PluginDependency) -> Self {
        Self {
            symbolic_name: dependency.symbolic_name.clone(),
            range: dependency.version_range.clone(),
        }
    }
}

impl fmt::Display for BlockingDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.symbolic_name, self.range)
    }
}
