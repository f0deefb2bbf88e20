// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Namespace discovery utilities

use crate::error::{DriftError, Result};
use crate::kubernetes::ClusterClient;
use k8s_openapi::api::core::v1::Namespace;
use kube::{api::ListParams, Api, ResourceExt};
use std::collections::BTreeSet;
use tracing::{info, instrument};

/// List the names of every namespace in one cluster
#[instrument(skip(cluster), fields(side = %cluster.side()))]
pub async fn list_namespaces(cluster: &ClusterClient) -> Result<Vec<String>> {
    let namespaces: Api<Namespace> = Api::all(cluster.client().clone());
    let list = namespaces
        .list(&ListParams::default())
        .await
        .map_err(|source| DriftError::ListError {
            kind: "Namespace".to_string(),
            namespace: String::new(),
            side: cluster.side(),
            source,
        })?;

    Ok(list.items.iter().map(|ns| ns.name_any()).collect())
}

/// Union of the namespaces of both clusters, minus the excluded ones, sorted
pub async fn discover_namespaces(
    first: &ClusterClient,
    second: &ClusterClient,
    excluded: &[String],
) -> Result<Vec<String>> {
    let (a, b) = futures::try_join!(list_namespaces(first), list_namespaces(second))?;

    let namespaces: Vec<String> = a
        .into_iter()
        .chain(b)
        .filter(|ns| !excluded.contains(ns))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    info!("Discovered {} namespaces to compare", namespaces.len());
    Ok(namespaces)
}
