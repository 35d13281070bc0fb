//! Identifier integrity between the index arrays and everything citing them.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::path::FieldPath;
use crate::report::{Diagnostics, Stage, Violation, ViolationCode};
use crate::walk::{axis_readings, object_keys, string_set};

fn dangling(path: &FieldPath, message: String) -> Violation {
    Violation::new(
        Stage::Reference,
        ViolationCode::ReferenceIntegrityViolation,
        path,
        message,
    )
}

pub struct ReferenceResolver;

impl ReferenceResolver {
    pub fn check(payload: &Value, diagnostics: &mut Diagnostics) {
        Self::check_window_index(payload, diagnostics);
        Self::check_source_index(payload, diagnostics);
        Self::check_readings(payload, diagnostics);
        Self::check_embeddings(payload, diagnostics);
    }

    fn check_window_index(payload: &Value, diagnostics: &mut Diagnostics) {
        let (Some(declared), Some(defined)) = (
            string_set(payload, "window_ids"),
            object_keys(payload, "windows"),
        ) else {
            return;
        };
        index_mismatch(
            &declared,
            &defined,
            ("window_ids", "windows"),
            "window",
            diagnostics,
        );
    }

    fn check_source_index(payload: &Value, diagnostics: &mut Diagnostics) {
        match (payload.get("source_ids"), payload.get("sources")) {
            (None, None) => {}
            (Some(_), None) => diagnostics.push(dangling(
                &FieldPath::root().key("sources"),
                "source_ids is declared but sources is missing".to_string(),
            )),
            (None, Some(_)) => diagnostics.push(dangling(
                &FieldPath::root().key("source_ids"),
                "sources is declared but source_ids is missing".to_string(),
            )),
            (Some(_), Some(_)) => {
                let (Some(declared), Some(defined)) = (
                    string_set(payload, "source_ids"),
                    object_keys(payload, "sources"),
                ) else {
                    return;
                };
                index_mismatch(
                    &declared,
                    &defined,
                    ("source_ids", "sources"),
                    "source",
                    diagnostics,
                );
            }
        }
    }

    fn check_readings(payload: &Value, diagnostics: &mut Diagnostics) {
        let windows = object_keys(payload, "windows").unwrap_or_default();
        let sources = object_keys(payload, "sources");

        for reading in axis_readings(payload) {
            if diagnostics.is_saturated() {
                return;
            }

            if let Some(id) = reading.reading.get("window_id").and_then(Value::as_str) {
                if !windows.contains(id) {
                    diagnostics.push(dangling(
                        &reading.path.key("window_id"),
                        format!("window_id '{id}' does not resolve to a declared window"),
                    ));
                }
            }

            let Some(evidence) = reading
                .reading
                .get("evidence_source_ids")
                .and_then(Value::as_array)
            else {
                continue;
            };
            let base = reading.path.key("evidence_source_ids");
            // Citing evidence at all requires a source map, even for an empty list.
            let Some(sources) = sources.as_ref() else {
                diagnostics.push(dangling(
                    &base,
                    "evidence_source_ids is present but no sources are declared".to_string(),
                ));
                continue;
            };
            for (index, id) in evidence.iter().enumerate() {
                let Some(id) = id.as_str() else {
                    continue;
                };
                if !sources.contains(id) {
                    diagnostics.push(dangling(
                        &base.index(index),
                        format!("evidence source '{id}' does not resolve to a declared source"),
                    ));
                }
            }
        }
    }

    fn check_embeddings(payload: &Value, diagnostics: &mut Diagnostics) {
        let Some(embeddings) = payload.get("embeddings").and_then(Value::as_array) else {
            return;
        };
        let windows = object_keys(payload, "windows").unwrap_or_default();
        let base = FieldPath::root().key("embeddings");

        for (index, embedding) in embeddings.iter().enumerate() {
            if diagnostics.is_saturated() {
                return;
            }
            let path = base.index(index);

            if let Some(id) = embedding.get("window_id").and_then(Value::as_str) {
                if !windows.contains(id) {
                    diagnostics.push(dangling(
                        &path.key("window_id"),
                        format!("window_id '{id}' does not resolve to a declared window"),
                    ));
                }
            }

            let dimension = embedding.get("dimension").and_then(Value::as_u64);
            let vector = embedding.get("vector").and_then(Value::as_array);
            if let (Some(dimension), Some(vector)) = (dimension, vector) {
                if vector.len() as u64 != dimension {
                    diagnostics.push(dangling(
                        &path.key("dimension"),
                        format!(
                            "dimension {dimension} does not match vector length {}",
                            vector.len()
                        ),
                    ));
                }
            }
        }
    }
}

/// Report ids declared in the index but not defined, then ids defined but
/// not declared. Both lists come out sorted.
fn index_mismatch(
    declared: &BTreeSet<&str>,
    defined: &BTreeSet<&str>,
    (index_field, map_field): (&str, &str),
    noun: &str,
    diagnostics: &mut Diagnostics,
) {
    for id in declared.difference(defined) {
        diagnostics.push(dangling(
            &FieldPath::root().key(index_field),
            format!("{noun} id '{id}' is declared in {index_field} but missing from {map_field}"),
        ));
    }
    for id in defined.difference(declared) {
        diagnostics.push(dangling(
            &FieldPath::root().key(map_field).key(*id),
            format!("{noun} '{id}' is defined in {map_field} but not declared in {index_field}"),
        ));
    }
}
