// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Client creation for the two compared clusters and typed list/get access.

use crate::config::ClusterSource;
use crate::error::{DriftError, Result};
use crate::types::ClusterSide;
use k8s_openapi::NamespaceResourceScope;
use kube::{
    api::ListParams,
    config::{KubeConfigOptions, Kubeconfig},
    Api, Client, Config as KConfig, Resource,
};
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use tracing::{debug, info, instrument};

/// Create a Kubernetes client for one side of the comparison
#[instrument(skip(source))]
pub async fn create_cluster_client(side: ClusterSide, source: &ClusterSource) -> Result<Client> {
    let options = KubeConfigOptions {
        context: source.context.clone(),
        ..Default::default()
    };

    let config = match (&source.kubeconfig, &source.context) {
        (Some(path), _) => {
            info!("Loading kubeconfig {} for {}", path.display(), side);
            let kubeconfig = Kubeconfig::read_from(path).map_err(|e| {
                DriftError::KubeconfigError(format!(
                    "Failed to read kubeconfig {}: {}",
                    path.display(),
                    e
                ))
            })?;
            KConfig::from_custom_kubeconfig(kubeconfig, &options)
                .await
                .map_err(|e| {
                    DriftError::KubeconfigError(format!("Failed to create config: {}", e))
                })?
        }
        (None, Some(_)) => KConfig::from_kubeconfig(&options).await.map_err(|e| {
            DriftError::KubeconfigError(format!("Failed to create config: {}", e))
        })?,
        (None, None) => KConfig::infer().await.map_err(|e| {
            DriftError::KubeconfigError(format!("Failed to infer config: {}", e))
        })?,
    };

    debug!("{} API server: {}", side, config.cluster_url);

    Client::try_from(config)
        .map_err(|e| DriftError::KubeconfigError(format!("Failed to create client: {}", e)))
}

/// Typed read access to the namespaced resources of one cluster
#[derive(Clone)]
pub struct ClusterClient {
    side: ClusterSide,
    client: Client,
}

impl ClusterClient {
    pub fn new(side: ClusterSide, client: Client) -> Self {
        Self { side, client }
    }

    pub fn side(&self) -> ClusterSide {
        self.side
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// List every resource of kind `K` in a namespace
    #[instrument(skip(self), fields(side = %self.side, kind = %K::kind(&())))]
    pub async fn list<K>(&self, namespace: &str) -> Result<Vec<K>>
    where
        K: Resource<Scope = NamespaceResourceScope, DynamicType = ()>
            + Clone
            + DeserializeOwned
            + Debug,
    {
        let api: Api<K> = Api::namespaced(self.client.clone(), namespace);
        let list = api
            .list(&ListParams::default())
            .await
            .map_err(|source| DriftError::ListError {
                kind: K::kind(&()).to_string(),
                namespace: namespace.to_string(),
                side: self.side,
                source,
            })?;

        debug!("Listed {} {} objects", list.items.len(), K::kind(&()));
        Ok(list.items)
    }

    /// Fetch one resource, `None` when it does not exist
    #[instrument(skip(self), fields(side = %self.side, kind = %K::kind(&())))]
    pub async fn get_opt<K>(&self, namespace: &str, name: &str) -> kube::Result<Option<K>>
    where
        K: Resource<Scope = NamespaceResourceScope, DynamicType = ()>
            + Clone
            + DeserializeOwned
            + Debug,
    {
        let api: Api<K> = Api::namespaced(self.client.clone(), namespace);
        api.get_opt(name).await
    }
}
