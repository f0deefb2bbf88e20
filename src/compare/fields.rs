// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Pairwise comparators for spec fragments.

use crate::diff::structural::render;
use crate::diff::DiffBatch;
use crate::types::ClusterSide;
use k8s_openapi::api::core::v1::{Probe, ServicePort, VolumeMount};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// A spec fragment that knows how to report its differences from a peer
pub trait Fragment {
    /// Append every difference between `self` (cluster 1) and `other` (cluster 2)
    fn compare(&self, other: &Self, subject: &str, batch: &mut DiffBatch);
}

fn to_display<T: Serialize>(value: &T) -> String {
    render(serde_json::to_value(value).ok().as_ref())
}

/// Compare one field; returns true when equal
pub fn compare_field<T>(subject: &str, field: &str, left: &T, right: &T, batch: &mut DiffBatch) -> bool
where
    T: PartialEq + Serialize,
{
    if left == right {
        return true;
    }
    let target = if field.is_empty() {
        subject.to_string()
    } else {
        format!("{} {}", subject, field)
    };
    batch.diff(
        subject,
        format!("{} differs: {} vs {}", target, to_display(left), to_display(right)),
    );
    false
}

/// Report one-sided presence; yields both sides when present in both
pub fn both<'a, T>(
    subject: &str,
    left: Option<&'a T>,
    right: Option<&'a T>,
    batch: &mut DiffBatch,
) -> Option<(&'a T, &'a T)> {
    match (left, right) {
        (Some(l), Some(r)) => Some((l, r)),
        (Some(_), None) => {
            batch.diff(subject, format!("{} is set only in {}", subject, ClusterSide::First));
            None
        }
        (None, Some(_)) => {
            batch.diff(subject, format!("{} is set only in {}", subject, ClusterSide::Second));
            None
        }
        (None, None) => None,
    }
}

/// Compare two optional fragments
pub fn compare_optional<T: Fragment>(
    subject: &str,
    left: Option<&T>,
    right: Option<&T>,
    batch: &mut DiffBatch,
) {
    if let Some((l, r)) = both(subject, left, right, batch) {
        l.compare(r, subject, batch);
    }
}

/// Compare two lists whose items are identified by a key rather than position
pub fn compare_keyed<T, F>(prefix: &str, left: &[T], right: &[T], key: F, batch: &mut DiffBatch)
where
    T: Fragment,
    F: Fn(&T) -> String,
{
    let left: BTreeMap<String, &T> = left.iter().map(|item| (key(item), item)).collect();
    let right: BTreeMap<String, &T> = right.iter().map(|item| (key(item), item)).collect();

    for (name, l) in &left {
        let subject = format!("{} {}", prefix, name);
        match right.get(name) {
            Some(r) => l.compare(r, &subject, batch),
            None => {
                batch.diff(&subject, format!("{} missing in {}", subject, ClusterSide::Second));
            }
        }
    }
    for name in right.keys().filter(|name| !left.contains_key(*name)) {
        let subject = format!("{} {}", prefix, name);
        batch.diff(&subject, format!("{} missing in {}", subject, ClusterSide::First));
    }
}

/// Symmetric key comparison with a per-key value check
pub fn compare_string_maps(
    subject: &str,
    left: Option<&BTreeMap<String, String>>,
    right: Option<&BTreeMap<String, String>>,
    batch: &mut DiffBatch,
) {
    let empty = BTreeMap::new();
    let left = left.unwrap_or(&empty);
    let right = right.unwrap_or(&empty);

    let keys: BTreeSet<&String> = left.keys().chain(right.keys()).collect();
    for key in keys {
        match (left.get(key), right.get(key)) {
            (Some(_), None) => {
                batch.diff(subject, format!("{} key {} missing in {}", subject, key, ClusterSide::Second));
            }
            (None, Some(_)) => {
                batch.diff(subject, format!("{} key {} missing in {}", subject, key, ClusterSide::First));
            }
            (Some(l), Some(r)) if l != r => {
                batch.diff(subject, format!("{} key {} differs: {} vs {}", subject, key, l, r));
            }
            _ => {}
        }
    }
}

impl Fragment for BTreeMap<String, String> {
    fn compare(&self, other: &Self, subject: &str, batch: &mut DiffBatch) {
        compare_string_maps(subject, Some(self), Some(other), batch);
    }
}

fn probe_handler(probe: &Probe) -> &'static str {
    if probe.exec.is_some() {
        "exec"
    } else if probe.http_get.is_some() {
        "httpGet"
    } else if probe.tcp_socket.is_some() {
        "tcpSocket"
    } else if probe.grpc.is_some() {
        "grpc"
    } else {
        "none"
    }
}

impl Fragment for Probe {
    fn compare(&self, other: &Self, subject: &str, batch: &mut DiffBatch) {
        let handler = probe_handler(self);
        if !compare_field(subject, "handler", &handler, &probe_handler(other), batch) {
            return;
        }

        if let (Some(l), Some(r)) = (&self.exec, &other.exec) {
            compare_field(subject, "command", &l.command, &r.command, batch);
        }
        if let (Some(l), Some(r)) = (&self.http_get, &other.http_get) {
            compare_field(subject, "path", &l.path, &r.path, batch);
            compare_field(subject, "port", &l.port, &r.port, batch);
            compare_field(subject, "scheme", &l.scheme, &r.scheme, batch);
            compare_field(subject, "host", &l.host, &r.host, batch);
        }
        if let (Some(l), Some(r)) = (&self.tcp_socket, &other.tcp_socket) {
            compare_field(subject, "port", &l.port, &r.port, batch);
        }
        if let (Some(l), Some(r)) = (&self.grpc, &other.grpc) {
            compare_field(subject, "port", &l.port, &r.port, batch);
            compare_field(subject, "service", &l.service, &r.service, batch);
        }

        compare_field(
            subject,
            "initialDelaySeconds",
            &self.initial_delay_seconds,
            &other.initial_delay_seconds,
            batch,
        );
        compare_field(subject, "periodSeconds", &self.period_seconds, &other.period_seconds, batch);
        compare_field(subject, "timeoutSeconds", &self.timeout_seconds, &other.timeout_seconds, batch);
        compare_field(
            subject,
            "successThreshold",
            &self.success_threshold,
            &other.success_threshold,
            batch,
        );
        compare_field(
            subject,
            "failureThreshold",
            &self.failure_threshold,
            &other.failure_threshold,
            batch,
        );
    }
}

impl Fragment for VolumeMount {
    fn compare(&self, other: &Self, subject: &str, batch: &mut DiffBatch) {
        compare_field(subject, "mountPath", &self.mount_path, &other.mount_path, batch);
        compare_field(subject, "readOnly", &self.read_only, &other.read_only, batch);
        compare_field(subject, "subPath", &self.sub_path, &other.sub_path, batch);
        compare_field(subject, "subPathExpr", &self.sub_path_expr, &other.sub_path_expr, batch);
        compare_field(
            subject,
            "mountPropagation",
            &self.mount_propagation,
            &other.mount_propagation,
            batch,
        );
    }
}

impl Fragment for ServicePort {
    fn compare(&self, other: &Self, subject: &str, batch: &mut DiffBatch) {
        compare_field(subject, "port", &self.port, &other.port, batch);
        compare_field(subject, "protocol", &self.protocol, &other.protocol, batch);
        compare_field(subject, "targetPort", &self.target_port, &other.target_port, batch);
        compare_field(subject, "appProtocol", &self.app_protocol, &other.app_protocol, batch);
    }
}
