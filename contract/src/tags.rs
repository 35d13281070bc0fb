//! Closed tag vocabularies of the contract.
//!
//! Each vocabulary is a closed enumeration parsed through `FromStr`.
//! [`Direction::from_wire`] returns `None` for a tag outside the vocabulary
//! so callers can tell "unrecognized value" apart from "field absent".

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, EnumIter, EnumString, IntoStaticStr};

/// Axis domains of the 1.x contract. Domains are a closed top-level set and
/// never nest inside one another.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    AsRefStr,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Domain {
    Affect,
    Behavior,
    Engagement,
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    /// All domains in wire order.
    pub fn all() -> Vec<Self> {
        Self::iter().collect()
    }
}

/// How a reading's score relates to the named axis.
///
/// Direction is advisory. `Bidirectional` tells a consumer that both ends of
/// the range are meaningful; it does not imply any numeric transform.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    AsRefStr,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Direction {
    HigherIsMore,
    HigherIsLess,
    Bidirectional,
}

impl Direction {
    pub fn from_wire(tag: &str) -> Option<Self> {
        tag.parse().ok()
    }

    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

/// Declared input channel kind of a source.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    AsRefStr,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SourceType {
    Sensor,
    App,
    SelfReport,
    Observer,
    Derived,
    Other,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

/// Numeric encoding of an embedding vector.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    AsRefStr,
    IntoStaticStr,
)]
pub enum Encoding {
    #[serde(rename = "float32")]
    #[strum(serialize = "float32")]
    Float32,
    #[serde(rename = "float64")]
    #[strum(serialize = "float64")]
    Float64,
    #[serde(rename = "fp16")]
    #[strum(serialize = "fp16")]
    Fp16,
    #[serde(rename = "int8")]
    #[strum(serialize = "int8")]
    Int8,
}

impl Encoding {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

/// Consent basis recorded in the privacy assertion.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    AsRefStr,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Consent {
    None,
    Implicit,
    Explicit,
}

impl Consent {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}
