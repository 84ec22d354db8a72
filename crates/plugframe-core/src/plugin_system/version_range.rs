use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::plugin_system::version::{Version, VersionError};

/// An interval over [`Version`] space.
///
/// Textual grammar (bit-exact with [`fmt::Display`]):
///
/// ```text
/// RANGE    := VERSION | INTERVAL
/// INTERVAL := ('[' | '(') VERSION ',' VERSION (']' | ')')
/// ```
///
/// A single version means "at least this version". Square brackets include
/// the endpoint, parentheses exclude it. Whitespace is only trimmed around
/// the versions inside the brackets.
#[derive(Debug, Clone)]
pub struct VersionRange {
    low: Version,
    high: Option<Version>,
    low_included: bool,
    high_included: bool,
}

impl VersionRange {
    /// The unspecified range `[0.0.0, ∞)`, accepting every version
    pub fn unspecified() -> Self {
        Self {
            low: Version::empty(),
            high: None,
            low_included: true,
            high_included: false,
        }
    }

    /// Range with no upper bound: `low ≤ v`
    pub fn at_least(low: Version) -> Self {
        Self {
            low,
            high: None,
            low_included: true,
            high_included: false,
        }
    }

    /// Bounded range; fails when `low > high`
    pub fn bounded(low: Version, high: Version, low_included: bool, high_included: bool) -> Result<Self, VersionError> {
        if low > high {
            return Err(VersionError::malformed(
                &format!("{}{},{}{}", if low_included { '[' } else { '(' }, low, high, if high_included { ']' } else { ')' }),
                "lower bound is greater than upper bound",
            ));
        }
        Ok(Self {
            low,
            high: Some(high),
            low_included,
            high_included,
        })
    }

    /// Parses the textual range form
    pub fn parse(range: &str) -> Result<Self, VersionError> {
        let open_exclusive = range.starts_with('(');
        let open_inclusive = range.starts_with('[');

        if !(open_exclusive || open_inclusive) {
            return Version::parse(range)
                .map(Self::at_least)
                .map_err(|e| VersionError::malformed_from(range, "invalid version", e));
        }

        let close_inclusive = range.ends_with(']');
        let close_exclusive = range.ends_with(')');
        if range.len() < 2 || !(close_inclusive || close_exclusive) {
            return Err(VersionError::malformed(range, "missing closing bracket"));
        }

        let inner = &range[1..range.len() - 1];
        let comma = match inner.find(',') {
            Some(idx) => idx,
            None => return Err(VersionError::malformed(range, "missing ',' between bounds")),
        };

        let low = Version::parse(inner[..comma].trim())
            .map_err(|e| VersionError::malformed_from(range, "invalid lower bound", e))?;
        let high = Version::parse(inner[comma + 1..].trim())
            .map_err(|e| VersionError::malformed_from(range, "invalid upper bound", e))?;

        if low > high {
            return Err(VersionError::malformed(range, "lower bound is greater than upper bound"));
        }

        Ok(Self {
            low,
            high: Some(high),
            low_included: open_inclusive,
            high_included: close_inclusive,
        })
    }

    pub fn low(&self) -> &Version {
        &self.low
    }

    /// Upper bound, `None` for an open-ended range
    pub fn high(&self) -> Option<&Version> {
        self.high.as_ref()
    }

    pub fn is_low_included(&self) -> bool {
        self.low_included
    }

    pub fn is_high_included(&self) -> bool {
        self.high_included
    }

    /// Whether a range was actually given, i.e. this is not the unspecified range
    pub fn is_specified(&self) -> bool {
        *self != Self::unspecified()
    }

    /// Checks whether `version` lies inside this range
    pub fn includes(&self, version: &Version) -> bool {
        if !self.is_specified() {
            return true;
        }

        match self.low.cmp(version) {
            Ordering::Less => {}
            Ordering::Equal if self.low_included => {}
            _ => return false,
        }

        match &self.high {
            None => true,
            Some(high) => match high.cmp(version) {
                Ordering::Greater => true,
                Ordering::Equal => self.high_included,
                Ordering::Less => false,
            },
        }
    }

    /// Checks whether `other` lies completely inside this range.
    ///
    /// Equal endpoints only count as contained when both ranges agree on the
    /// endpoint's inclusion flag. A bounded range never contains an
    /// open-ended one.
    pub fn contains_range(&self, other: &VersionRange) -> bool {
        if self == other {
            return true;
        }

        match self.low.cmp(&other.low) {
            Ordering::Less => {}
            Ordering::Equal if self.low_included == other.low_included => {}
            _ => return false,
        }

        let high = match &self.high {
            None => return true,
            Some(high) => high,
        };
        let other_high = match &other.high {
            None => return false,
            Some(other_high) => other_high,
        };

        match high.cmp(other_high) {
            Ordering::Greater => true,
            Ordering::Equal => self.high_included == other.high_included,
            Ordering::Less => false,
        }
    }

    /// Orders ranges by their lower bound only
    pub fn compare_low(&self, other: &VersionRange) -> Ordering {
        self.low.cmp(&other.low)
    }
}

impl Default for VersionRange {
    fn default() -> Self {
        Self::unspecified()
    }
}

impl From<Version> for VersionRange {
    fn from(version: Version) -> Self {
        Self::at_least(version)
    }
}

impl PartialEq for VersionRange {
    fn eq(&self, other: &Self) -> bool {
        if self.low != other.low {
            return false;
        }
        match (&self.high, &other.high) {
            (None, None) => true,
            (Some(high), Some(other_high)) => {
                high == other_high
                    && self.low_included == other.low_included
                    && self.high_included == other.high_included
            }
            _ => false,
        }
    }
}

impl Eq for VersionRange {}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.high {
            None => write!(f, "{}", self.low),
            Some(high) => write!(
                f,
                "{}{},{}{}",
                if self.low_included { '[' } else { '(' },
                self.low,
                high,
                if self.high_included { ']' } else { ')' }
            ),
        }
    }
}

impl FromStr for VersionRange {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VersionRange::parse(s)
    }
}

impl Serialize for VersionRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for VersionRange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        VersionRange::parse(&text).map_err(serde::de::Error::custom)
    }
}
