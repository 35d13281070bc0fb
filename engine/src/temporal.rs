//! Temporal ordering of processing timestamps and windows.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::path::FieldPath;
use crate::report::{Diagnostics, Stage, Violation, ViolationCode};

/// Parse an RFC 3339 instant, normalizing its offset to UTC.
pub(crate) fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|instant| instant.with_timezone(&Utc))
}

fn instant_at<'a>(value: &'a Value, field: &str) -> Option<(&'a str, DateTime<Utc>)> {
    let raw = value.get(field)?.as_str()?;
    parse_instant(raw).map(|instant| (raw, instant))
}

/// Checks `computed_at_utc >= observed_at_utc` and `end >= start` for every
/// window. Values that do not parse are left to the structural stage.
pub struct TemporalConsistencyChecker;

impl TemporalConsistencyChecker {
    pub fn check(payload: &Value, diagnostics: &mut Diagnostics) {
        if let (Some((observed_raw, observed)), Some((computed_raw, computed))) = (
            instant_at(payload, "observed_at_utc"),
            instant_at(payload, "computed_at_utc"),
        ) {
            if computed < observed {
                diagnostics.push(Violation::new(
                    Stage::Temporal,
                    ViolationCode::TemporalOrderViolation,
                    &FieldPath::root().key("computed_at_utc"),
                    format!(
                        "computed_at_utc ({computed_raw}) is earlier than observed_at_utc ({observed_raw})"
                    ),
                ));
            }
        }

        let Some(windows) = payload.get("windows").and_then(Value::as_object) else {
            return;
        };
        for (id, window) in windows {
            if diagnostics.is_saturated() {
                return;
            }
            let (Some((start_raw, start)), Some((end_raw, end))) =
                (instant_at(window, "start"), instant_at(window, "end"))
            else {
                continue;
            };
            if end < start {
                diagnostics.push(Violation::new(
                    Stage::Temporal,
                    ViolationCode::TemporalOrderViolation,
                    &FieldPath::root().key("windows").key(id).key("end"),
                    format!("window '{id}' end ({end_raw}) is earlier than its start ({start_raw})"),
                ));
            }
        }
    }
}
