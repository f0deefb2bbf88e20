// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Final, printable outcome of a run.

use crate::diff::{ComparisonDiff, DiffBatch};
use serde::Serialize;
use std::fmt;

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct DriftReport {
    pub differs: bool,
    pub diffs: Vec<ComparisonDiff>,
}

impl DriftReport {
    /// Build a report from finalized batches, ordered by entity
    pub fn new(differs: bool, batches: Vec<DiffBatch>) -> Self {
        let mut batches = batches;
        batches.sort_by(|a, b| a.key().cmp(b.key()));
        Self {
            differs,
            diffs: batches.into_iter().flat_map(DiffBatch::into_diffs).collect(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for DriftReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut current = None;
        for diff in &self.diffs {
            if current != Some(&diff.key) {
                writeln!(f, "{}", diff.key)?;
                current = Some(&diff.key);
            }
            writeln!(f, "  [{}] {}: {}", diff.severity, diff.subject, diff.message)?;
        }
        if self.differs {
            write!(f, "Clusters differ")
        } else {
            write!(f, "Clusters are identical")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ResourceKey, ResourceKind};

    #[test]
    fn test_report_groups_diffs_by_entity_in_key_order() {
        let mut b = DiffBatch::new(ResourceKey::new(ResourceKind::Secret, "default", "s1"));
        b.final_diff("secret", "s1 missing in cluster 2");
        let mut a = DiffBatch::new(ResourceKey::new(ResourceKind::ConfigMap, "default", "cm1"));
        a.diff("data", "configmap cm1 key k differs: v1 vs v2");

        let report = DriftReport::new(true, vec![b, a]);
        let text = report.to_string();

        assert_eq!(
            text,
            "ConfigMap default/cm1\n  [warning] data: configmap cm1 key k differs: v1 vs v2\n\
             Secret default/s1\n  [critical] secret: s1 missing in cluster 2\n\
             Clusters differ"
        );
    }

    #[test]
    fn test_json_marks_final_diffs() {
        let mut batch = DiffBatch::new(ResourceKey::new(ResourceKind::Secret, "default", "s1"));
        batch.final_diff("secret", "s1 missing in cluster 2");

        let json = DriftReport::new(true, vec![batch]).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["differs"], true);
        assert_eq!(value["diffs"][0]["final"], true);
        assert_eq!(value["diffs"][0]["severity"], "critical");
        assert_eq!(value["diffs"][0]["key"]["kind"], "Secret");
    }

    #[test]
    fn test_identical_report() {
        let report = DriftReport::new(false, Vec::new());
        assert_eq!(report.to_string(), "Clusters are identical");
    }
}
