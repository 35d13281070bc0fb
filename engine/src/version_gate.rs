//! Version gating.
//!
//! Reads `hsi_version` off the raw payload, checks the major against the
//! consumer's supported set and selects the compiled schema for it. Nothing
//! else in the payload is trusted before this passes.

use std::collections::BTreeSet;

use hsi_contract::HsiVersion;
use serde_json::Value;
use tracing::debug;

use crate::error::{EngineError, Result};
use crate::schema::{RegisteredSchema, SchemaRegistry};

/// Schema selection for one payload.
#[derive(Debug, Clone, Copy)]
pub struct GateDecision<'r> {
    pub version: HsiVersion,
    pub schema: &'r RegisteredSchema,
    /// `false` when the payload claims a minor newer than `schema` describes.
    pub minor_recognized: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct VersionGate<'a> {
    supported_majors: &'a BTreeSet<u64>,
}

impl<'a> VersionGate<'a> {
    pub fn new(supported_majors: &'a BTreeSet<u64>) -> Self {
        Self { supported_majors }
    }

    /// Parse the claimed version without consulting any registry.
    pub fn claimed_version(payload: &Value) -> Result<HsiVersion> {
        let object = payload
            .as_object()
            .ok_or_else(|| EngineError::MalformedVersion {
                reason: format!("payload is a JSON {}, not an object", json_kind(payload)),
            })?;

        let raw = match object.get("hsi_version") {
            None => {
                return Err(EngineError::MalformedVersion {
                    reason: "hsi_version is missing".to_string(),
                });
            }
            Some(Value::String(raw)) => raw,
            Some(other) => {
                return Err(EngineError::MalformedVersion {
                    reason: format!("hsi_version is a JSON {}, not a string", json_kind(other)),
                });
            }
        };

        raw.parse::<HsiVersion>()
            .map_err(|e| EngineError::MalformedVersion {
                reason: e.to_string(),
            })
    }

    /// Admit `payload` and select its schema from `registry`.
    pub fn admit<'r>(
        &self,
        payload: &Value,
        registry: &'r SchemaRegistry,
    ) -> Result<GateDecision<'r>> {
        let version = Self::claimed_version(payload)?;

        if !self.supported_majors.contains(&version.major) {
            return Err(EngineError::UnsupportedMajorVersion {
                major: version.major,
                supported: self.supported_majors.iter().copied().collect(),
            });
        }

        let schema = registry.load(version.major)?;
        let minor_recognized = version.is_described_by(&schema.version());
        if minor_recognized {
            debug!("Selected schema {} for payload {version}", schema.version());
        } else {
            debug!(
                "Payload {version} is newer than schema {}; validating unknown minor against it",
                schema.version()
            );
        }

        Ok(GateDecision {
            version,
            schema,
            minor_recognized,
        })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
