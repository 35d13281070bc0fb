//! `hsi_version` parsing.
//!
//! A contract version is `MAJOR.MINOR` with an optional `.PATCH`. Majors
//! gate breaking changes; minors only add optional fields and semantics.

use std::fmt;
use std::str::FromStr;

use serde_with::{DeserializeFromStr, SerializeDisplay};
use thiserror::Error;

/// Errors from parsing an `hsi_version` string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionParseError {
    #[error("version string is empty")]
    Empty,

    #[error("version '{0}' must have the form MAJOR.MINOR or MAJOR.MINOR.PATCH")]
    Shape(String),

    #[error("version component '{component}' in '{version}' is not a non-negative integer")]
    Component { version: String, component: String },
}

/// Parsed semantic contract version.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, SerializeDisplay, DeserializeFromStr,
)]
pub struct HsiVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: Option<u64>,
}

impl HsiVersion {
    pub const fn new(major: u64, minor: u64) -> Self {
        Self {
            major,
            minor,
            patch: None,
        }
    }

    pub const fn with_patch(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch: Some(patch),
        }
    }

    /// Whether a payload at `self` can be read by a consumer that knows
    /// `known`: same major, any minor.
    pub fn is_compatible_with(&self, known: &HsiVersion) -> bool {
        self.major == known.major
    }

    /// Whether `known` describes every field a payload at `self` may carry:
    /// compatible, and no newer minor.
    pub fn is_described_by(&self, known: &HsiVersion) -> bool {
        self.is_compatible_with(known) && self.minor <= known.minor
    }
}

impl fmt::Display for HsiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.patch {
            Some(patch) => write!(f, "{}.{}.{patch}", self.major, self.minor),
            None => write!(f, "{}.{}", self.major, self.minor),
        }
    }
}

impl FromStr for HsiVersion {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(VersionParseError::Empty);
        }

        let parts: Vec<&str> = s.split('.').collect();
        if !(2..=3).contains(&parts.len()) {
            return Err(VersionParseError::Shape(s.to_string()));
        }

        let component = |part: &str| -> Result<u64, VersionParseError> {
            // u64::from_str accepts a leading '+', the contract does not.
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(VersionParseError::Component {
                    version: s.to_string(),
                    component: part.to_string(),
                });
            }
            part.parse().map_err(|_| VersionParseError::Component {
                version: s.to_string(),
                component: part.to_string(),
            })
        };

        let major = component(parts[0])?;
        let minor = component(parts[1])?;
        let patch = parts.get(2).map(|p| component(p)).transpose()?;

        Ok(Self {
            major,
            minor,
            patch,
        })
    }
}
