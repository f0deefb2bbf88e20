// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::types::{ClusterSide, ResourceKind};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DriftError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Failed to parse kubeconfig: {0}")]
    KubeconfigError(String),

    #[error("Failed to list {kind} in namespace {namespace} on {side}: {source}")]
    ListError {
        kind: String,
        namespace: String,
        side: ClusterSide,
        #[source]
        source: kube::Error,
    },

    #[error("Failed to resolve {kind} {namespace}/{name} on {side}: {source}")]
    ReferenceError {
        kind: ResourceKind,
        namespace: String,
        name: String,
        side: ClusterSide,
        #[source]
        source: kube::Error,
    },

    #[error("Comparison task failed: {0}")]
    TaskFailed(String),
}

pub type Result<T> = std::result::Result<T, DriftError>;
