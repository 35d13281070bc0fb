//! Schema registry.
//!
//! One normative schema document per contract major, compiled once when the
//! registry is built and read-only afterwards. The registry is an explicit
//! value handed to the validator (usually behind an `Arc`), so consumers can
//! hold several registries side by side, e.g. to exercise two majors in one
//! test process.
//!
//! Each document declares the contract version it describes in its
//! `x-hsi-version` annotation. The highest minor a document describes is what
//! the version gate compares payload minors against.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use hsi_contract::HsiVersion;
use jsonschema::{Draft, JSONSchema};
use serde_json::Value;
use thiserror::Error;
use tracing::info;

/// Schema document for contract major 1, embedded at compile time.
pub const HSI_1_0_SCHEMA: &str = include_str!("hsi-1.0.schema.json");

/// Annotation carrying the contract version a schema document describes.
pub const VERSION_ANNOTATION: &str = "x-hsi-version";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaLoadError {
    #[error("no schema registered for HSI major version {major}")]
    NotRegistered { major: u64 },

    #[error("schema document is not valid JSON: {reason}")]
    Parse { reason: String },

    #[error("schema document has no usable '{VERSION_ANNOTATION}' annotation: {reason}")]
    MissingVersion { reason: String },

    #[error("schema document for major {major} failed to compile: {reason}")]
    Compile { major: u64, reason: String },

    #[error("a schema is already registered for HSI major version {major}")]
    Duplicate { major: u64 },
}

/// A compiled schema for one contract major.
pub struct RegisteredSchema {
    version: HsiVersion,
    compiled: JSONSchema,
    domains: BTreeSet<String>,
    axes_closed: bool,
}

impl RegisteredSchema {
    fn compile(document: &Value) -> Result<Self, SchemaLoadError> {
        let version = document
            .get(VERSION_ANNOTATION)
            .and_then(Value::as_str)
            .ok_or_else(|| SchemaLoadError::MissingVersion {
                reason: "annotation absent or not a string".to_string(),
            })?
            .parse::<HsiVersion>()
            .map_err(|e| SchemaLoadError::MissingVersion {
                reason: e.to_string(),
            })?;

        let compiled = JSONSchema::options()
            .with_draft(Draft::Draft202012)
            .compile(document)
            .map_err(|e| SchemaLoadError::Compile {
                major: version.major,
                reason: e.to_string(),
            })?;

        let domains = document
            .pointer("/properties/axes/properties")
            .and_then(Value::as_object)
            .map(|props| props.keys().cloned().collect())
            .unwrap_or_default();
        let axes_closed =
            document.pointer("/properties/axes/additionalProperties") == Some(&Value::Bool(false));

        Ok(Self {
            version,
            compiled,
            domains,
            axes_closed,
        })
    }

    pub fn major(&self) -> u64 {
        self.version.major
    }

    /// Contract version this document describes, including the highest minor.
    pub fn version(&self) -> HsiVersion {
        self.version
    }

    pub(crate) fn compiled(&self) -> &JSONSchema {
        &self.compiled
    }

    /// Axis domains this major declares under `axes`.
    pub fn domains(&self) -> impl Iterator<Item = &str> {
        self.domains.iter().map(String::as_str)
    }

    pub fn has_domain(&self, domain: &str) -> bool {
        self.domains.contains(domain)
    }

    /// Whether the schema itself rejects unknown domain keys under `axes`.
    pub fn closes_axes(&self) -> bool {
        self.axes_closed
    }
}

impl fmt::Debug for RegisteredSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredSchema")
            .field("version", &self.version)
            .field("domains", &self.domains)
            .field("axes_closed", &self.axes_closed)
            .finish_non_exhaustive()
    }
}

/// Immutable set of compiled schemas keyed by major.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: BTreeMap<u64, RegisteredSchema>,
}

impl SchemaRegistry {
    /// Registry holding every schema document shipped with the engine.
    pub fn builtin() -> Result<Self, SchemaLoadError> {
        Ok(Self::builder().with_document(HSI_1_0_SCHEMA)?.build())
    }

    pub fn builder() -> SchemaRegistryBuilder {
        SchemaRegistryBuilder::default()
    }

    pub fn load(&self, major: u64) -> Result<&RegisteredSchema, SchemaLoadError> {
        self.schemas
            .get(&major)
            .ok_or(SchemaLoadError::NotRegistered { major })
    }

    pub fn majors(&self) -> impl Iterator<Item = u64> + '_ {
        self.schemas.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

/// Collects schema documents before the registry is frozen.
#[derive(Debug, Default)]
pub struct SchemaRegistryBuilder {
    schemas: BTreeMap<u64, RegisteredSchema>,
}

impl SchemaRegistryBuilder {
    /// Register a schema document given as JSON text.
    pub fn with_document(self, text: &str) -> Result<Self, SchemaLoadError> {
        let document: Value =
            serde_json::from_str(text).map_err(|e| SchemaLoadError::Parse {
                reason: e.to_string(),
            })?;
        self.with_schema(document)
    }

    /// Register an already parsed schema document.
    pub fn with_schema(mut self, document: Value) -> Result<Self, SchemaLoadError> {
        let schema = RegisteredSchema::compile(&document)?;
        let major = schema.major();
        if self.schemas.contains_key(&major) {
            return Err(SchemaLoadError::Duplicate { major });
        }

        info!(
            "Registered HSI schema {} (domains: {:?})",
            schema.version(),
            schema.domains
        );
        self.schemas.insert(major, schema);
        Ok(self)
    }

    pub fn build(self) -> SchemaRegistry {
        SchemaRegistry {
            schemas: self.schemas,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hsi_contract::{CURRENT_VERSION, Domain};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn builtin_registry_holds_major_one() {
        let registry = SchemaRegistry::builtin().expect("builtin schemas compile");
        assert_eq!(registry.majors().collect::<Vec<_>>(), vec![1]);

        let schema = registry.load(1).expect("major 1 registered");
        assert_eq!(schema.version(), HsiVersion::new(1, 0));
        assert!(CURRENT_VERSION.is_described_by(&schema.version()));
        assert!(schema.closes_axes());
    }

    #[test]
    fn builtin_domains_match_the_contract_vocabulary() {
        let registry = SchemaRegistry::builtin().unwrap();
        let schema = registry.load(1).unwrap();
        let domains: Vec<&str> = schema.domains().collect();
        let expected: Vec<&str> = Domain::all().iter().map(Domain::as_str).collect();
        assert_eq!(domains, expected);
    }

    #[test]
    fn unknown_major_is_a_load_error() {
        let registry = SchemaRegistry::builtin().unwrap();
        assert_eq!(
            registry.load(2).unwrap_err(),
            SchemaLoadError::NotRegistered { major: 2 }
        );
    }

    #[test]
    fn duplicate_major_is_rejected() {
        let err = SchemaRegistry::builder()
            .with_document(HSI_1_0_SCHEMA)
            .unwrap()
            .with_document(HSI_1_0_SCHEMA)
            .unwrap_err();
        assert_eq!(err, SchemaLoadError::Duplicate { major: 1 });
    }

    #[test]
    fn document_without_version_annotation_is_rejected() {
        let err = SchemaRegistry::builder()
            .with_schema(json!({"type": "object"}))
            .unwrap_err();
        assert!(matches!(err, SchemaLoadError::MissingVersion { .. }));
    }

    #[test]
    fn invalid_json_text_is_a_parse_error() {
        let err = SchemaRegistry::builder()
            .with_document("{not json")
            .unwrap_err();
        assert!(matches!(err, SchemaLoadError::Parse { .. }));
    }

    #[test]
    fn uncompilable_document_is_a_compile_error() {
        let err = SchemaRegistry::builder()
            .with_schema(json!({"x-hsi-version": "3.0", "type": 12}))
            .unwrap_err();
        assert!(matches!(err, SchemaLoadError::Compile { major: 3, .. }));
    }

    #[test]
    fn open_axes_are_detected() {
        let registry = SchemaRegistry::builder()
            .with_schema(json!({
                "x-hsi-version": "2.1",
                "type": "object",
                "properties": {
                    "axes": {
                        "type": "object",
                        "properties": {"affect": {}, "cognition": {}}
                    }
                }
            }))
            .unwrap()
            .build();
        let schema = registry.load(2).unwrap();
        assert!(!schema.closes_axes());
        assert!(schema.has_domain("cognition"));
        assert!(!schema.has_domain("behavior"));
        assert_eq!(schema.version().minor, 1);
    }

    #[test]
    fn registry_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SchemaRegistry>();
    }
}
