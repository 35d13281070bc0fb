//! Structural and range validation against the compiled schema of the
//! selected major.
//!
//! Schema errors arrive as JSON pointers and are rendered as dotted field
//! paths. Root-level `additionalProperties` failures become one
//! [`ViolationCode::UnknownTopLevelFieldViolation`] per unknown key. Timestamp
//! parseability is checked here as well, since the schema carries no
//! `format` assertions.

use jsonschema::error::ValidationErrorKind;
use serde_json::Value;
use tracing::debug;

use crate::path::FieldPath;
use crate::report::{Diagnostics, Stage, Violation, ViolationCode};
use crate::schema::RegisteredSchema;
use crate::temporal::parse_instant;

const TIMESTAMP_FIELDS: [&str; 2] = ["observed_at_utc", "computed_at_utc"];

pub struct StructuralValidator;

impl StructuralValidator {
    pub fn check(payload: &Value, schema: &RegisteredSchema, diagnostics: &mut Diagnostics) {
        Self::check_schema(payload, schema, diagnostics);
        Self::check_timestamps(payload, diagnostics);
    }

    fn check_schema(payload: &Value, schema: &RegisteredSchema, diagnostics: &mut Diagnostics) {
        let Err(errors) = schema.compiled().validate(payload) else {
            return;
        };

        let axes = FieldPath::root().key("axes");
        for error in errors {
            if diagnostics.is_saturated() {
                return;
            }

            let path = FieldPath::from_pointer(&error.instance_path.to_string(), payload);
            match &error.kind {
                ValidationErrorKind::AdditionalProperties { unexpected } if path.is_root() => {
                    for key in unexpected {
                        diagnostics.push(Violation::new(
                            Stage::Structural,
                            ViolationCode::UnknownTopLevelFieldViolation,
                            &path.key(key.as_str()),
                            format!(
                                "unknown top-level field '{key}' is not part of HSI {}",
                                schema.version()
                            ),
                        ));
                    }
                }
                ValidationErrorKind::AdditionalProperties { unexpected } => {
                    for key in unexpected {
                        let message = if path == axes {
                            format!("unknown axis domain '{key}'")
                        } else {
                            format!("unknown field '{key}'")
                        };
                        diagnostics.push(Violation::new(
                            Stage::Structural,
                            ViolationCode::StructuralViolation,
                            &path.key(key.as_str()),
                            message,
                        ));
                    }
                }
                ValidationErrorKind::Required { property } => {
                    let name = property
                        .as_str()
                        .map_or_else(|| property.to_string(), str::to_string);
                    diagnostics.push(Violation::new(
                        Stage::Structural,
                        ViolationCode::StructuralViolation,
                        &path.key(name.as_str()),
                        format!("required field '{name}' is missing"),
                    ));
                }
                _ => {
                    diagnostics.push(Violation::new(
                        Stage::Structural,
                        ViolationCode::StructuralViolation,
                        &path,
                        error.to_string(),
                    ));
                }
            }
        }
    }

    fn check_timestamps(payload: &Value, diagnostics: &mut Diagnostics) {
        for field in TIMESTAMP_FIELDS {
            if let Some(raw) = payload.get(field).and_then(Value::as_str) {
                check_instant(raw, &FieldPath::root().key(field), diagnostics);
            }
        }

        let Some(windows) = payload.get("windows").and_then(Value::as_object) else {
            return;
        };
        for (id, window) in windows {
            for field in ["start", "end"] {
                if let Some(raw) = window.get(field).and_then(Value::as_str) {
                    let path = FieldPath::root().key("windows").key(id).key(field);
                    check_instant(raw, &path, diagnostics);
                }
            }
        }
    }
}

fn check_instant(raw: &str, path: &FieldPath, diagnostics: &mut Diagnostics) {
    if parse_instant(raw).is_none() {
        debug!("Rejecting timestamp {raw:?} at {path}");
        diagnostics.push(Violation::new(
            Stage::Structural,
            ViolationCode::StructuralViolation,
            path,
            format!("'{raw}' is not an RFC 3339 timestamp with an offset"),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ExecutionMode;
    use crate::schema::SchemaRegistry;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn minimal() -> Value {
        json!({
            "hsi_version": "1.0",
            "observed_at_utc": "2025-01-01T00:00:00Z",
            "computed_at_utc": "2025-01-01T00:00:01Z",
            "producer": {"name": "focus-engine", "version": "0.4.2"},
            "window_ids": ["w1"],
            "windows": {
                "w1": {"start": "2024-12-31T23:55:00Z", "end": "2025-01-01T00:00:00Z"}
            },
            "privacy": {
                "contains_pii": false,
                "raw_biosignals_allowed": false,
                "derived_metrics_allowed": true
            }
        })
    }

    fn run(payload: &Value, mode: ExecutionMode) -> Vec<Violation> {
        let registry = SchemaRegistry::builtin().unwrap();
        let schema = registry.load(1).unwrap();
        let mut diagnostics = Diagnostics::new(mode);
        StructuralValidator::check(payload, schema, &mut diagnostics);
        diagnostics.into_violations()
    }

    #[test]
    fn minimal_payload_is_structurally_valid() {
        assert_eq!(run(&minimal(), ExecutionMode::CollectAll), Vec::new());
    }

    #[test]
    fn each_unknown_root_key_is_reported_once() {
        let mut payload = minimal();
        payload["debug"] = json!(true);
        payload["trace_id"] = json!("abc");

        let violations = run(&payload, ExecutionMode::CollectAll);
        let mut paths: Vec<&str> = violations.iter().map(|v| v.path.as_str()).collect();
        paths.sort_unstable();
        assert_eq!(paths, vec!["debug", "trace_id"]);
        assert!(
            violations
                .iter()
                .all(|v| v.code == ViolationCode::UnknownTopLevelFieldViolation)
        );
    }

    #[test]
    fn out_of_range_score_points_at_the_reading() {
        let mut payload = minimal();
        payload["axes"] = json!({
            "affect": {"readings": [
                {"axis": "calm", "score": 1.2, "confidence": 0.9, "window_id": "w1"}
            ]}
        });

        let violations = run(&payload, ExecutionMode::CollectAll);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path, "axes.affect.readings[0].score");
        assert_eq!(violations[0].code, ViolationCode::StructuralViolation);
    }

    #[test]
    fn missing_required_field_names_the_field() {
        let mut payload = minimal();
        payload["producer"] = json!({"name": "focus-engine"});

        let violations = run(&payload, ExecutionMode::CollectAll);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path, "producer.version");
        assert_eq!(violations[0].message, "required field 'version' is missing");
    }

    #[test]
    fn unknown_domain_is_structural_under_closed_axes() {
        let mut payload = minimal();
        payload["axes"] = json!({"cognition": {"readings": []}});

        let violations = run(&payload, ExecutionMode::CollectAll);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path, "axes.cognition");
        assert_eq!(violations[0].message, "unknown axis domain 'cognition'");
    }

    #[test]
    fn open_extension_points_tolerate_unknown_keys() {
        let mut payload = minimal();
        payload["meta"] = json!({"pipeline": {"stage": 3}});
        payload["producer"]["build"] = json!("nightly");
        payload["axes"] = json!({"behavior": {"readings": [], "meta": {"note": "x"}, "extra": 1}});
        assert_eq!(run(&payload, ExecutionMode::CollectAll), Vec::new());
    }

    #[test]
    fn unparseable_timestamps_are_structural() {
        let mut payload = minimal();
        payload["observed_at_utc"] = json!("2025-01-01 00:00:00");
        payload["windows"]["w1"]["end"] = json!("later");

        let violations = run(&payload, ExecutionMode::CollectAll);
        let paths: Vec<&str> = violations.iter().map(|v| v.path.as_str()).collect();
        assert_eq!(paths, vec!["observed_at_utc", "windows.w1.end"]);
    }

    #[test]
    fn fail_fast_stops_after_first_violation() {
        let mut payload = minimal();
        payload["debug"] = json!(true);
        payload["observed_at_utc"] = json!("not a time");
        payload["producer"] = json!({});

        assert_eq!(run(&payload, ExecutionMode::FailFast).len(), 1);
        assert!(run(&payload, ExecutionMode::CollectAll).len() >= 4);
    }
}
