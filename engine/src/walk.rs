//! Tolerant traversal of raw payloads.
//!
//! Semantic stages run on the raw JSON value even when the structural stage
//! has already found problems, so every accessor here skips shapes it does
//! not expect instead of failing.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use crate::path::FieldPath;

/// One domain group under `axes`.
pub(crate) struct DomainGroup<'a> {
    pub name: &'a str,
    pub path: FieldPath,
    pub group: &'a Map<String, Value>,
}

/// One axis reading with the group that encloses it.
pub(crate) struct ReadingRef<'a> {
    pub group: &'a Map<String, Value>,
    pub path: FieldPath,
    pub reading: &'a Map<String, Value>,
}

pub(crate) fn domain_groups(payload: &Value) -> Vec<DomainGroup<'_>> {
    let Some(axes) = payload.get("axes").and_then(Value::as_object) else {
        return Vec::new();
    };
    let base = FieldPath::root().key("axes");
    axes.iter()
        .filter_map(|(name, group)| {
            group.as_object().map(|group| DomainGroup {
                name,
                path: base.key(name),
                group,
            })
        })
        .collect()
}

pub(crate) fn axis_readings(payload: &Value) -> Vec<ReadingRef<'_>> {
    let mut readings = Vec::new();
    for domain in domain_groups(payload) {
        let Some(items) = domain.group.get("readings").and_then(Value::as_array) else {
            continue;
        };
        let base = domain.path.key("readings");
        for (index, item) in items.iter().enumerate() {
            if let Some(reading) = item.as_object() {
                readings.push(ReadingRef {
                    group: domain.group,
                    path: base.index(index),
                    reading,
                });
            }
        }
    }
    readings
}

/// Keys of the object at `field`, or `None` when absent or not an object.
pub(crate) fn object_keys<'a>(payload: &'a Value, field: &str) -> Option<BTreeSet<&'a str>> {
    payload
        .get(field)
        .and_then(Value::as_object)
        .map(|map| map.keys().map(String::as_str).collect())
}

/// String entries of the array at `field`, or `None` when absent or not an
/// array. Non-string entries are skipped.
pub(crate) fn string_set<'a>(value: &'a Value, field: &str) -> Option<BTreeSet<&'a str>> {
    value
        .get(field)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).collect())
}

pub(crate) fn is_non_empty_object(value: Option<&Value>) -> bool {
    value
        .and_then(Value::as_object)
        .is_some_and(|map| !map.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn readings_carry_dotted_paths() {
        let payload = json!({
            "axes": {
                "affect": {"readings": [{"axis": "calm"}, {"axis": "stress"}]},
                "behavior": {"readings": "not an array"},
                "engagement": 7
            }
        });
        let paths: Vec<String> = axis_readings(&payload)
            .iter()
            .map(|r| r.path.to_string())
            .collect();
        assert_eq!(
            paths,
            vec!["axes.affect.readings[0]", "axes.affect.readings[1]"]
        );
        assert_eq!(domain_groups(&payload).len(), 2);
    }

    #[test]
    fn id_helpers_skip_foreign_shapes() {
        let payload = json!({
            "window_ids": ["w1", 3, "w2"],
            "windows": {"w1": {}},
            "sources": []
        });
        assert_eq!(
            string_set(&payload, "window_ids"),
            Some(BTreeSet::from(["w1", "w2"]))
        );
        assert_eq!(object_keys(&payload, "windows"), Some(BTreeSet::from(["w1"])));
        assert_eq!(object_keys(&payload, "sources"), None);
        assert_eq!(string_set(&payload, "source_ids"), None);
    }

    #[test]
    fn empty_meta_is_not_an_explanation() {
        assert!(!is_non_empty_object(Some(&json!({}))));
        assert!(!is_non_empty_object(Some(&json!("text"))));
        assert!(!is_non_empty_object(None));
        assert!(is_non_empty_object(Some(&json!({"reason": "sensor gap"}))));
    }
}
