//! Privacy gate. Runs at every compliance level.
//!
//! A payload must carry a `privacy` assertion with `contains_pii: false`.
//! When `embedding_allowed` is `false`, the payload may not carry embeddings.
//! Free-text fields are never inspected.

use serde_json::Value;

use crate::path::FieldPath;
use crate::report::{Diagnostics, Stage, Violation, ViolationCode};

fn violation(path: &FieldPath, message: impl Into<String>) -> Violation {
    Violation::new(Stage::Privacy, ViolationCode::PrivacyViolation, path, message)
}

pub struct PrivacyGate;

impl PrivacyGate {
    pub fn check(payload: &Value, diagnostics: &mut Diagnostics) {
        let path = FieldPath::root().key("privacy");
        let privacy = match payload.get("privacy") {
            None => {
                diagnostics.push(violation(&path, "privacy assertion is missing"));
                return;
            }
            Some(Value::Object(privacy)) => privacy,
            Some(other) => {
                diagnostics.push(violation(
                    &path,
                    format!("privacy must be an object, found {other}"),
                ));
                return;
            }
        };

        match privacy.get("contains_pii") {
            Some(Value::Bool(false)) => {}
            None => diagnostics.push(violation(
                &path.key("contains_pii"),
                "contains_pii is missing; payloads must assert contains_pii: false",
            )),
            Some(other) => diagnostics.push(violation(
                &path.key("contains_pii"),
                format!("contains_pii must be false, found {other}"),
            )),
        }

        if privacy.get("embedding_allowed") == Some(&Value::Bool(false)) {
            let count = payload
                .get("embeddings")
                .and_then(Value::as_array)
                .map_or(0, Vec::len);
            if count > 0 {
                diagnostics.push(violation(
                    &FieldPath::root().key("embeddings"),
                    format!("{count} embedding(s) present but privacy.embedding_allowed is false"),
                ));
            }
        }
    }
}
