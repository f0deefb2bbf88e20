// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Generic deep comparison over anything serializable.
//!
//! Used for fragments that have no dedicated comparator, such as the many
//! cloud specific volume sources.

use crate::diff::DiffBatch;
use serde::Serialize;
use serde_json::Value;

/// One leaf-level difference between two values
#[derive(Debug, Clone, PartialEq)]
pub struct ValueChange {
    /// Dotted path from the compared root, empty for the root itself
    pub path: String,
    pub left: Option<Value>,
    pub right: Option<Value>,
}

impl ValueChange {
    pub fn describe(&self, subject: &str) -> String {
        let target = if self.path.is_empty() {
            subject.to_string()
        } else {
            format!("{} {}", subject, self.path)
        };
        format!(
            "{} differs: {} vs {}",
            target,
            render(self.left.as_ref()),
            render(self.right.as_ref())
        )
    }
}

/// Render a value for a diff message; absent values show as `<none>`
pub fn render(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "<none>".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Every difference between two JSON values. Null, `[]`, missing object keys and
/// objects holding nothing else are all equal.
pub fn diff_values(left: &Value, right: &Value) -> Vec<ValueChange> {
    let mut changes = Vec::new();
    walk("", Some(left), Some(right), &mut changes);
    changes
}

fn is_absent(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.values().all(is_absent),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn walk(path: &str, left: Option<&Value>, right: Option<&Value>, changes: &mut Vec<ValueChange>) {
    let left = left.filter(|v| !is_absent(v));
    let right = right.filter(|v| !is_absent(v));

    match (left, right) {
        (None, None) => {}
        (Some(Value::Object(a)), Some(Value::Object(b))) => {
            let mut keys: Vec<&String> = a.keys().chain(b.keys()).collect();
            keys.sort();
            keys.dedup();
            for key in keys {
                walk(&join(path, key), a.get(key), b.get(key), changes);
            }
        }
        (Some(Value::Array(a)), Some(Value::Array(b))) if a.len() == b.len() => {
            for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
                walk(&format!("{}[{}]", path, i), Some(x), Some(y), changes);
            }
        }
        (a, b) if a == b => {}
        (a, b) => changes.push(ValueChange {
            path: path.to_string(),
            left: a.cloned(),
            right: b.cloned(),
        }),
    }
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

/// Deep-compare two fragments and append one diff per differing leaf
pub fn compare_structural<T: Serialize>(subject: &str, left: &T, right: &T, batch: &mut DiffBatch) {
    let (left, right) = match (serde_json::to_value(left), serde_json::to_value(right)) {
        (Ok(l), Ok(r)) => (l, r),
        (Err(e), _) | (_, Err(e)) => {
            batch.diff(subject, format!("{} could not be compared: {}", subject, e));
            return;
        }
    };

    for change in diff_values(&left, &right) {
        batch.diff(subject, change.describe(subject));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ResourceKey, ResourceKind};
    use k8s_openapi::api::core::v1::AWSElasticBlockStoreVolumeSource;
    use serde_json::json;

    #[test]
    fn test_equal_values_have_no_changes() {
        let v = json!({"a": 1, "b": [1, 2, {"c": "x"}]});
        assert!(diff_values(&v, &v.clone()).is_empty());
    }

    #[test]
    fn test_null_equals_missing() {
        let a = json!({"a": 1, "b": null});
        let b = json!({"a": 1});
        assert!(diff_values(&a, &b).is_empty());
    }

    #[test]
    fn test_empty_collections_equal_missing() {
        let a = json!({"ports": [], "resources": {}, "nested": {"limits": {}}});
        let b = json!({"ports": null});
        assert!(diff_values(&a, &b).is_empty());
        assert!(diff_values(&json!([]), &Value::Null).is_empty());
        assert!(diff_values(&json!({}), &Value::Null).is_empty());

        let changes = diff_values(&json!({"ports": [80]}), &json!({"ports": []}));
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].describe("container app"), "container app ports differs: [80] vs <none>");
    }

    #[test]
    fn test_nested_change_has_dotted_path() {
        let a = json!({"spec": {"ports": [{"port": 80}]}});
        let b = json!({"spec": {"ports": [{"port": 81}]}});

        let changes = diff_values(&a, &b);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].path, "spec.ports[0].port");
        assert_eq!(changes[0].describe("service"), "service spec.ports[0].port differs: 80 vs 81");
    }

    #[test]
    fn test_array_length_mismatch_reports_whole_array() {
        let a = json!({"items": [1, 2]});
        let b = json!({"items": [1]});

        let changes = diff_values(&a, &b);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].path, "items");
    }

    #[test]
    fn test_missing_key_renders_none() {
        let a = json!({"fsType": "ext4"});
        let b = json!({});

        let changes = diff_values(&a, &b);
        assert_eq!(changes[0].describe("volume data"), "volume data fsType differs: ext4 vs <none>");
    }

    #[test]
    fn test_compare_structural_on_typed_fragment() {
        let mut batch = DiffBatch::new(ResourceKey::new(ResourceKind::Deployment, "default", "d1"));
        let left = AWSElasticBlockStoreVolumeSource {
            volume_id: "vol-1".to_string(),
            fs_type: Some("ext4".to_string()),
            ..Default::default()
        };
        let right = AWSElasticBlockStoreVolumeSource {
            volume_id: "vol-2".to_string(),
            fs_type: Some("ext4".to_string()),
            ..Default::default()
        };

        compare_structural("volume disk", &left, &right, &mut batch);
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.diffs()[0].message, "volume disk volumeID differs: vol-1 vs vol-2");

        let mut same = DiffBatch::new(ResourceKey::new(ResourceKind::Deployment, "default", "d1"));
        compare_structural("volume disk", &left, &left.clone(), &mut same);
        assert!(same.is_empty());
    }
}
