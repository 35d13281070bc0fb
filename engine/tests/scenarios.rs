//! End-to-end acceptance scenarios.

use hsi_engine::{
    HsiValidator, Stage, ValidationOptions, ValidationResult, Violation, ViolationCode,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn baseline() -> Value {
    json!({
        "hsi_version": "1.0",
        "observed_at_utc": "2025-03-14T09:00:00Z",
        "computed_at_utc": "2025-03-14T09:00:01Z",
        "producer": {"name": "focus-engine", "version": "0.4.2"},
        "window_ids": ["w1"],
        "windows": {
            "w1": {"start": "2025-03-14T08:55:00Z", "end": "2025-03-14T09:00:00Z"}
        },
        "axes": {
            "affect": {"readings": [
                {"axis": "calm", "score": 0.7, "confidence": 0.8, "window_id": "w1"}
            ]}
        },
        "privacy": {
            "contains_pii": false,
            "raw_biosignals_allowed": false,
            "derived_metrics_allowed": true
        }
    })
}

fn run(payload: &Value) -> (ValidationResult, ValidationResult) {
    let validator = HsiValidator::with_builtin_schemas().expect("builtin schemas");
    let basic = validator
        .validate(payload, &ValidationOptions::basic())
        .expect("basic");
    let strict = validator
        .validate(payload, &ValidationOptions::strict())
        .expect("strict");
    (basic, strict)
}

fn codes(violations: &[Violation]) -> Vec<ViolationCode> {
    violations.iter().map(|v| v.code).collect()
}

#[test]
fn well_formed_payload_is_valid_at_both_levels() -> anyhow::Result<()> {
    let validator = HsiValidator::with_builtin_schemas()?;
    let text = serde_json::to_string(&baseline())?;

    let basic = validator.validate_str(&text, &ValidationOptions::basic())?;
    let strict = validator.validate_str(&text, &ValidationOptions::strict())?;
    assert!(basic.valid, "{:#?}", basic.violations);
    assert!(strict.valid, "{:#?}", strict.violations);
    assert_eq!(strict.summary(), "HSI 1.0 payload is valid at strict");
    Ok(())
}

#[test]
fn undeclared_reading_window_fails_strict_only() {
    let mut payload = baseline();
    payload["axes"]["affect"]["readings"][0]["window_id"] = json!("w2");

    let (basic, strict) = run(&payload);
    assert!(basic.valid, "{:#?}", basic.violations);
    assert!(!strict.valid);
    assert_eq!(
        codes(&strict.violations),
        vec![ViolationCode::ReferenceIntegrityViolation]
    );
    assert_eq!(
        strict.violations[0].path,
        "axes.affect.readings[0].window_id"
    );
    assert_eq!(strict.violations[0].stage, Stage::Reference);
}

#[test]
fn computed_before_observed_fails_strict_only() {
    let mut payload = baseline();
    payload["computed_at_utc"] = json!("2025-03-14T08:59:00Z");

    let (basic, strict) = run(&payload);
    assert!(basic.valid, "{:#?}", basic.violations);
    assert_eq!(
        codes(&strict.violations),
        vec![ViolationCode::TemporalOrderViolation]
    );
}

#[test]
fn missing_privacy_fails_both_levels() {
    let mut payload = baseline();
    payload
        .as_object_mut()
        .expect("object payload")
        .remove("privacy");

    let (basic, strict) = run(&payload);
    for result in [&basic, &strict] {
        assert!(!result.valid);
        assert!(result.has_code(ViolationCode::StructuralViolation));
        assert!(result.has_code(ViolationCode::PrivacyViolation));
        let structural: Vec<&str> = result
            .violations_for(Stage::Structural)
            .map(|v| v.path.as_str())
            .collect();
        assert_eq!(structural, vec!["privacy"]);
    }
}

#[test]
fn unknown_top_level_field_fails_both_levels() {
    let mut payload = baseline();
    payload["foo"] = json!(1);

    let (basic, strict) = run(&payload);
    for result in [&basic, &strict] {
        assert_eq!(
            codes(&result.violations),
            vec![ViolationCode::UnknownTopLevelFieldViolation]
        );
        assert_eq!(result.violations[0].path, "foo");
    }
}

#[test]
fn null_score_requires_an_explanation_under_strict() {
    let mut explained = baseline();
    explained["axes"]["affect"]["readings"][0]["score"] = Value::Null;
    explained["meta"] = json!({"access_control_reason": "user paused sensing"});

    let (basic, strict) = run(&explained);
    assert!(basic.valid, "{:#?}", basic.violations);
    assert!(strict.valid, "{:#?}", strict.violations);

    let mut unexplained = explained;
    unexplained
        .as_object_mut()
        .expect("object payload")
        .remove("meta");

    let (basic, strict) = run(&unexplained);
    assert!(basic.valid, "{:#?}", basic.violations);
    assert_eq!(
        codes(&strict.violations),
        vec![ViolationCode::AxisDomainViolation]
    );
    assert_eq!(strict.violations[0].path, "axes.affect.readings[0].score");
}
