// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Pod volume comparison, dispatched by volume source.

use super::fields::compare_field;
use crate::context::EntityScope;
use crate::diff::{compare_structural, DiffBatch};
use crate::types::ClusterSide;
use k8s_openapi::api::core::v1::Volume;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Name of the populated volume source, e.g. `hostPath`
pub fn volume_source(volume: &Volume) -> String {
    serde_json::to_value(volume)
        .ok()
        .and_then(|value| {
            value
                .as_object()
                .and_then(|map| map.keys().find(|key| key.as_str() != "name").cloned())
        })
        .unwrap_or_else(|| "none".to_string())
}

/// Compare pod volumes by name
pub fn compare_volumes(
    scope: &EntityScope<'_>,
    left: Option<&Vec<Volume>>,
    right: Option<&Vec<Volume>>,
    batch: &mut DiffBatch,
) {
    let left: BTreeMap<&str, &Volume> = left
        .into_iter()
        .flatten()
        .map(|v| (v.name.as_str(), v))
        .collect();
    let right: BTreeMap<&str, &Volume> = right
        .into_iter()
        .flatten()
        .map(|v| (v.name.as_str(), v))
        .collect();
    let names: BTreeSet<&str> = left.keys().chain(right.keys()).copied().collect();

    for name in names {
        if scope.is_cancelled() || batch.is_final() {
            debug!("Stopping volume comparison at {}", name);
            return;
        }

        let subject = format!("volume {}", name);
        match (left.get(name), right.get(name)) {
            (Some(l), Some(r)) => compare_volume(&subject, l, r, batch),
            (Some(_), None) => {
                batch.diff(&subject, format!("{} missing in {}", subject, ClusterSide::Second));
            }
            (None, Some(_)) => {
                batch.diff(&subject, format!("{} missing in {}", subject, ClusterSide::First));
            }
            (None, None) => {}
        }
    }
}

fn compare_volume(subject: &str, left: &Volume, right: &Volume, batch: &mut DiffBatch) {
    let source = volume_source(left);
    if !compare_field(subject, "source", &source, &volume_source(right), batch) {
        return;
    }

    if let (Some(l), Some(r)) = (&left.host_path, &right.host_path) {
        compare_field(subject, "hostPath path", &l.path, &r.path, batch);
        compare_field(subject, "hostPath type", &l.type_, &r.type_, batch);
    } else if let (Some(l), Some(r)) = (&left.empty_dir, &right.empty_dir) {
        compare_field(subject, "emptyDir medium", &l.medium, &r.medium, batch);
        compare_field(subject, "emptyDir sizeLimit", &l.size_limit, &r.size_limit, batch);
    } else if let (Some(l), Some(r)) = (&left.secret, &right.secret) {
        compare_field(subject, "secret name", &l.secret_name, &r.secret_name, batch);
        compare_field(subject, "secret defaultMode", &l.default_mode, &r.default_mode, batch);
        compare_field(subject, "secret optional", &l.optional, &r.optional, batch);
        compare_structural(&format!("{} secret items", subject), &l.items, &r.items, batch);
    } else if let (Some(l), Some(r)) = (&left.nfs, &right.nfs) {
        compare_field(subject, "nfs server", &l.server, &r.server, batch);
        compare_field(subject, "nfs path", &l.path, &r.path, batch);
        compare_field(subject, "nfs readOnly", &l.read_only, &r.read_only, batch);
    } else if let (Some(l), Some(r)) = (&left.persistent_volume_claim, &right.persistent_volume_claim) {
        compare_field(subject, "claimName", &l.claim_name, &r.claim_name, batch);
        compare_field(subject, "claim readOnly", &l.read_only, &r.read_only, batch);
    } else if let (Some(l), Some(r)) = (&left.downward_api, &right.downward_api) {
        compare_field(subject, "downwardAPI defaultMode", &l.default_mode, &r.default_mode, batch);
        compare_structural(&format!("{} downwardAPI items", subject), &l.items, &r.items, batch);
    } else if let (Some(l), Some(r)) = (&left.config_map, &right.config_map) {
        compare_field(subject, "configMap name", &l.name, &r.name, batch);
        compare_field(subject, "configMap defaultMode", &l.default_mode, &r.default_mode, batch);
        compare_field(subject, "configMap optional", &l.optional, &r.optional, batch);
        compare_structural(&format!("{} configMap items", subject), &l.items, &r.items, batch);
    } else if let (Some(l), Some(r)) = (&left.csi, &right.csi) {
        compare_field(subject, "csi driver", &l.driver, &r.driver, batch);
        compare_field(subject, "csi fsType", &l.fs_type, &r.fs_type, batch);
        compare_field(subject, "csi readOnly", &l.read_only, &r.read_only, batch);
        compare_structural(
            &format!("{} csi volumeAttributes", subject),
            &l.volume_attributes,
            &r.volume_attributes,
            batch,
        );
        compare_structural(
            &format!("{} csi nodePublishSecretRef", subject),
            &l.node_publish_secret_ref,
            &r.node_publish_secret_ref,
            batch,
        );
    } else {
        compare_structural(subject, left, right, batch);
    }
}
