use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Error type for version and version range parsing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    /// The text is not a valid `major[.minor[.micro[.qualifier]]]` version
    #[error("Invalid version format '{input}': {reason}")]
    InvalidFormat { input: String, reason: String },

    /// The text is not a valid version range
    #[error("Malformed version range '{input}': {reason}")]
    MalformedRange {
        input: String,
        reason: String,
        #[source]
        source: Option<Box<VersionError>>,
    },
}

impl VersionError {
    fn invalid(input: &str, reason: impl Into<String>) -> Self {
        VersionError::InvalidFormat {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed(input: &str, reason: impl Into<String>) -> Self {
        VersionError::MalformedRange {
            input: input.to_string(),
            reason: reason.into(),
            source: None,
        }
    }

    pub(crate) fn malformed_from(input: &str, reason: impl Into<String>, source: VersionError) -> Self {
        VersionError::MalformedRange {
            input: input.to_string(),
            reason: reason.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// A plugin version: `major.minor.micro` plus an optional qualifier.
///
/// Ordering compares the numeric parts first and falls back to a byte-wise
/// comparison of the qualifier, so `1.0.0` < `1.0.0.alpha` < `1.0.0.beta`.
/// The derived ordering relies on the field order below.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Version {
    major: u32,
    minor: u32,
    micro: u32,
    qualifier: String,
}

impl Version {
    /// Maximum number of dot-separated segments in the textual form
    pub const MAX_SEGMENTS: usize = 4;

    /// Creates a version without qualifier
    pub fn new(major: u32, minor: u32, micro: u32) -> Self {
        Self {
            major,
            minor,
            micro,
            qualifier: String::new(),
        }
    }

    /// Creates a version with a qualifier, validating the qualifier characters
    pub fn with_qualifier(major: u32, minor: u32, micro: u32, qualifier: &str) -> Result<Self, VersionError> {
        validate_qualifier(qualifier, qualifier)?;
        Ok(Self {
            major,
            minor,
            micro,
            qualifier: qualifier.to_string(),
        })
    }

    /// The empty version `0.0.0`
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses a version string like "1", "1.2", "1.2.3" or "1.2.3.beta-1"
    pub fn parse(version: &str) -> Result<Self, VersionError> {
        if version.is_empty() {
            return Err(VersionError::invalid(version, "empty version string"));
        }

        let parts: Vec<&str> = version.split('.').collect();
        if parts.len() > Self::MAX_SEGMENTS {
            return Err(VersionError::invalid(
                version,
                format!("expected at most {} segments, found {}", Self::MAX_SEGMENTS, parts.len()),
            ));
        }

        let parse_part = |part: &str, label: &str| -> Result<u32, VersionError> {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(VersionError::invalid(
                    version,
                    format!("{} component '{}' is not a non-negative integer", label, part),
                ));
            }
            part.parse::<u32>()
                .map_err(|e| VersionError::invalid(version, format!("{} component '{}': {}", label, part, e)))
        };

        let major = parse_part(parts[0], "major")?;
        let minor = match parts.get(1) {
            Some(part) => parse_part(part, "minor")?,
            None => 0,
        };
        let micro = match parts.get(2) {
            Some(part) => parse_part(part, "micro")?,
            None => 0,
        };
        let qualifier = match parts.get(3) {
            Some(part) => {
                validate_qualifier(version, part)?;
                part.to_string()
            }
            None => String::new(),
        };

        Ok(Self {
            major,
            minor,
            micro,
            qualifier,
        })
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn minor(&self) -> u32 {
        self.minor
    }

    pub fn micro(&self) -> u32 {
        self.micro
    }

    /// The qualifier, empty when none was given
    pub fn qualifier(&self) -> &str {
        &self.qualifier
    }

    /// Whether this is the empty version `0.0.0`
    pub fn is_empty(&self) -> bool {
        *self == Self::empty()
    }
}

fn validate_qualifier(input: &str, qualifier: &str) -> Result<(), VersionError> {
    match qualifier
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
    {
        Some(bad) => Err(VersionError::invalid(
            input,
            format!("qualifier '{}' contains invalid character '{}'", qualifier, bad),
        )),
        None => Ok(()),
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.micro)?;
        if !self.qualifier.is_empty() {
            write!(f, ".{}", self.qualifier)?;
        }
        Ok(())
    }
}

// Manifests and stored records carry versions in their canonical text form.
impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Version::parse(&text).map_err(serde::de::Error::custom)
    }
}
