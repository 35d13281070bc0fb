//! Validation entry point.

use std::sync::Arc;

use hsi_contract::Payload;
use serde_json::Value;
use tracing::debug;

use crate::axis_domain::AxisDomainValidator;
use crate::error::Result;
use crate::options::ValidationOptions;
use crate::privacy::PrivacyGate;
use crate::references::ReferenceResolver;
use crate::report::{ComplianceReporter, Diagnostics, Stage, ValidationResult};
use crate::schema::SchemaRegistry;
use crate::structural::StructuralValidator;
use crate::temporal::TemporalConsistencyChecker;
use crate::version_gate::VersionGate;

/// Validates HSI payloads against a shared, read-only schema registry.
///
/// Cloning is cheap and every clone shares the same registry, so one
/// validator can be handed to any number of threads.
#[derive(Debug, Clone)]
pub struct HsiValidator {
    registry: Arc<SchemaRegistry>,
}

impl HsiValidator {
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self { registry }
    }

    /// Validator over the schemas shipped with the engine.
    pub fn with_builtin_schemas() -> Result<Self> {
        Ok(Self::new(Arc::new(SchemaRegistry::builtin()?)))
    }

    pub fn registry(&self) -> &Arc<SchemaRegistry> {
        &self.registry
    }

    /// Validate a raw payload.
    ///
    /// Returns `Err` only for fatal contract-claim problems: a missing or
    /// unparseable `hsi_version`, an unsupported major, or a major with no
    /// registered schema. Every other problem is a violation in the result.
    pub fn validate(
        &self,
        payload: &Value,
        options: &ValidationOptions,
    ) -> Result<ValidationResult> {
        let decision =
            VersionGate::new(&options.supported_majors).admit(payload, &self.registry)?;
        let schema = decision.schema;

        let mut diagnostics = Diagnostics::new(options.mode);
        for stage in options.level.stages() {
            if diagnostics.is_saturated() {
                debug!("Fail-fast: skipping remaining stages from {stage}");
                break;
            }

            let before = diagnostics.len();
            match stage {
                Stage::Structural => StructuralValidator::check(payload, schema, &mut diagnostics),
                Stage::Reference => ReferenceResolver::check(payload, &mut diagnostics),
                Stage::Temporal => TemporalConsistencyChecker::check(payload, &mut diagnostics),
                Stage::AxisDomain => AxisDomainValidator::check(payload, schema, &mut diagnostics),
                Stage::Privacy => PrivacyGate::check(payload, &mut diagnostics),
            }
            debug!(
                "Stage {stage} finished with {} violation(s)",
                diagnostics.len() - before
            );
        }

        Ok(ComplianceReporter::new(options.level).finish(
            decision.version,
            decision.minor_recognized,
            diagnostics,
        ))
    }

    /// Parse `text` as JSON and validate it.
    pub fn validate_str(
        &self,
        text: &str,
        options: &ValidationOptions,
    ) -> Result<ValidationResult> {
        let payload: Value = serde_json::from_str(text)?;
        self.validate(&payload, options)
    }

    /// Validate a typed payload, e.g. one a producer is about to emit.
    pub fn validate_payload(
        &self,
        payload: &Payload,
        options: &ValidationOptions,
    ) -> Result<ValidationResult> {
        let value = serde_json::to_value(payload)?;
        self.validate(&value, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::options::ComplianceLevel;
    use crate::report::ViolationCode;
    use hsi_contract::{AxisReading, Domain, HsiVersion, Producer, Source, SourceType, Window};
    use pretty_assertions::assert_eq;

    fn payload() -> Payload {
        let mut payload = Payload::new(
            HsiVersion::new(1, 0),
            "2025-01-01T00:00:00Z",
            "2025-01-01T00:00:02Z",
            Producer {
                name: "focus-engine".into(),
                version: "0.4.2".into(),
                instance_id: None,
            },
        );
        payload.add_window(
            "w1",
            Window {
                start: "2024-12-31T23:55:00Z".into(),
                end: "2025-01-01T00:00:00Z".into(),
                label: None,
            },
        );
        payload.add_reading(
            Domain::Engagement,
            AxisReading::new("focus", Some(0.6), 0.9, "w1"),
        );
        payload
    }

    #[test]
    fn typed_payload_is_valid_at_both_levels() {
        let validator = HsiValidator::with_builtin_schemas().unwrap();
        for options in [ValidationOptions::basic(), ValidationOptions::strict()] {
            let result = validator.validate_payload(&payload(), &options).unwrap();
            assert!(result.valid, "{:?}", result.violations);
            assert_eq!(result.level, options.level);
            assert!(result.minor_recognized);
        }
    }

    #[test]
    fn producer_annotations_reach_the_validator() {
        let mut payload = payload();
        payload.add_source(
            "s1",
            Source {
                source_type: SourceType::Sensor,
                quality: 0.8,
                degraded: false,
                notes: Some("wrist strap".into()),
            },
        );
        let mut reading = AxisReading::new("heart_rate_variability", Some(0.4), 0.7, "w1");
        reading.unit = Some("ms".into());
        reading.notes = Some("rmssd over the window".into());
        reading.evidence_source_ids = Some(vec!["s1".into()]);
        payload.add_reading(Domain::Behavior, reading);

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["axes"]["behavior"]["readings"][0]["unit"], "ms");
        assert_eq!(value["sources"]["s1"]["notes"], "wrist strap");

        let result = HsiValidator::with_builtin_schemas()
            .unwrap()
            .validate_payload(&payload, &ValidationOptions::strict())
            .unwrap();
        assert!(result.valid, "{:?}", result.violations);
    }

    #[test]
    fn strict_only_failures_pass_basic() {
        let mut payload = payload();
        payload.window_ids.push("w2".into());
        let validator = HsiValidator::with_builtin_schemas().unwrap();

        let basic = validator
            .validate_payload(&payload, &ValidationOptions::basic())
            .unwrap();
        let strict = validator
            .validate_payload(&payload, &ValidationOptions::strict())
            .unwrap();
        assert!(basic.valid);
        assert!(!strict.valid);
        assert_eq!(strict.level, ComplianceLevel::Strict);
        assert!(strict.has_code(ViolationCode::ReferenceIntegrityViolation));
    }

    #[test]
    fn unparseable_text_is_malformed_payload() {
        let validator = HsiValidator::with_builtin_schemas().unwrap();
        let err = validator
            .validate_str("{\"hsi_version\": ", &ValidationOptions::default())
            .unwrap_err();
        assert!(matches!(err, EngineError::MalformedPayload(_)));
    }

    #[test]
    fn clones_share_the_registry() {
        let validator = HsiValidator::with_builtin_schemas().unwrap();
        let clone = validator.clone();
        assert!(Arc::ptr_eq(validator.registry(), clone.registry()));
    }
}
