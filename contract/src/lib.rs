//! HSI payload contract
//!
//! Typed wire model for Human State Interface payloads. Field names and
//! cardinalities here are the compatibility surface of the contract: they
//! must not change without a major version bump.
//!
//! Producers build a [`Payload`] and serialize it with serde; consumers that
//! need typed access deserialize one after the payload has passed validation.

pub mod payload;
pub mod tags;
pub mod version;

pub use payload::{
    AxisGroup, AxisReading, Axes, Embedding, Payload, PrivacyAssertion, Producer, Source, Window,
};
pub use tags::{Consent, Direction, Domain, Encoding, SourceType};
pub use version::{HsiVersion, VersionParseError};

/// Contract version emitted by producers built against this crate.
pub const CURRENT_VERSION: HsiVersion = HsiVersion::new(1, 0);
