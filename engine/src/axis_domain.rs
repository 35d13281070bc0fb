//! Axis domain semantics.
//!
//! - Domain keys under `axes` must belong to the selected schema's domain
//!   set. When the schema closes `axes` itself, the structural stage already
//!   reports this and it is not repeated here.
//! - Domains never nest.
//! - `direction`, when present, must be a recognized tag.
//! - `score: null` needs an explanation in the top-level `meta` or the
//!   enclosing group's `meta`. An omitted axis is never "missing".
//!
//! Axis names inside a known domain are an open vocabulary and pass silently.

use hsi_contract::Direction;
use serde_json::Value;

use crate::path::FieldPath;
use crate::report::{Diagnostics, Stage, Violation, ViolationCode};
use crate::schema::RegisteredSchema;
use crate::walk::{axis_readings, domain_groups, is_non_empty_object};

fn violation(path: &FieldPath, message: String) -> Violation {
    Violation::new(
        Stage::AxisDomain,
        ViolationCode::AxisDomainViolation,
        path,
        message,
    )
}

pub struct AxisDomainValidator;

impl AxisDomainValidator {
    pub fn check(payload: &Value, schema: &RegisteredSchema, diagnostics: &mut Diagnostics) {
        Self::check_domains(payload, schema, diagnostics);
        Self::check_readings(payload, diagnostics);
    }

    fn check_domains(payload: &Value, schema: &RegisteredSchema, diagnostics: &mut Diagnostics) {
        if !schema.closes_axes() {
            if let Some(axes) = payload.get("axes").and_then(Value::as_object) {
                let base = FieldPath::root().key("axes");
                for name in axes.keys().filter(|name| !schema.has_domain(name)) {
                    diagnostics.push(violation(
                        &base.key(name.as_str()),
                        format!("'{name}' is not an axis domain of HSI {}", schema.version()),
                    ));
                }
            }
        }

        for group in domain_groups(payload) {
            for nested in group.group.keys().filter(|key| schema.has_domain(key)) {
                diagnostics.push(violation(
                    &group.path.key(nested.as_str()),
                    format!(
                        "domain '{nested}' is nested inside domain '{}'; domains are top-level only",
                        group.name
                    ),
                ));
            }
        }
    }

    fn check_readings(payload: &Value, diagnostics: &mut Diagnostics) {
        let payload_explains = is_non_empty_object(payload.get("meta"));

        for reading in axis_readings(payload) {
            if diagnostics.is_saturated() {
                return;
            }

            match reading.reading.get("direction") {
                None => {}
                Some(Value::String(tag)) if Direction::from_wire(tag).is_some() => {}
                Some(Value::String(tag)) => diagnostics.push(violation(
                    &reading.path.key("direction"),
                    format!("unrecognized direction '{tag}'"),
                )),
                Some(other) => diagnostics.push(violation(
                    &reading.path.key("direction"),
                    format!("direction must be a tag string, found {other}"),
                )),
            }

            let null_score = matches!(reading.reading.get("score"), Some(Value::Null));
            if null_score && !payload_explains && !is_non_empty_object(reading.group.get("meta")) {
                let axis = reading
                    .reading
                    .get("axis")
                    .and_then(Value::as_str)
                    .unwrap_or("<unnamed>");
                diagnostics.push(violation(
                    &reading.path.key("score"),
                    format!(
                        "axis '{axis}' has a null score but neither meta nor the domain meta explains it"
                    ),
                ));
            }
        }
    }
}
