// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! On-demand lookup of ConfigMap and Secret keys referenced by environment variables.
//!
//! Every call fetches the object again; nothing is cached within a run.

use crate::error::{DriftError, Result};
use crate::kubernetes::ClusterClient;
use crate::types::{ClusterSide, ResourceKind};
use k8s_openapi::api::core::v1::{ConfigMap, Secret};
use std::fmt;
use tracing::{debug, instrument};

/// Object kinds an environment variable can point into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceSource {
    ConfigMap,
    Secret,
}

impl ReferenceSource {
    pub fn kind(&self) -> ResourceKind {
        match self {
            ReferenceSource::ConfigMap => ResourceKind::ConfigMap,
            ReferenceSource::Secret => ResourceKind::Secret,
        }
    }
}

/// A key inside a named ConfigMap or Secret
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyReference {
    pub source: ReferenceSource,
    pub name: String,
    pub key: String,
}

impl KeyReference {
    pub fn config_map(name: &str, key: &str) -> Self {
        Self {
            source: ReferenceSource::ConfigMap,
            name: name.to_string(),
            key: key.to_string(),
        }
    }

    pub fn secret(name: &str, key: &str) -> Self {
        Self {
            source: ReferenceSource::Secret,
            name: name.to_string(),
            key: key.to_string(),
        }
    }
}

impl fmt::Display for KeyReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} key {}", self.source.kind().label(), self.name, self.key)
    }
}

/// Outcome of a lookup that reached the API server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Value(String),
    /// The referenced object does not exist
    ObjectMissing,
    /// The object exists but lacks the key
    KeyMissing,
}

/// Resolves key references against one cluster
#[derive(Clone)]
pub struct ReferenceResolver {
    cluster: ClusterClient,
}

impl ReferenceResolver {
    pub fn new(cluster: ClusterClient) -> Self {
        Self { cluster }
    }

    pub fn side(&self) -> ClusterSide {
        self.cluster.side()
    }

    /// Fetch the referenced object and extract the key.
    /// Missing objects and keys are resolutions; transport and auth failures are errors.
    #[instrument(skip(self), fields(side = %self.side(), reference = %reference))]
    pub async fn resolve(&self, namespace: &str, reference: &KeyReference) -> Result<Resolution> {
        let fetch_error = |source: kube::Error| DriftError::ReferenceError {
            kind: reference.source.kind(),
            namespace: namespace.to_string(),
            name: reference.name.clone(),
            side: self.side(),
            source,
        };

        let resolution = match reference.source {
            ReferenceSource::ConfigMap => {
                match self
                    .cluster
                    .get_opt::<ConfigMap>(namespace, &reference.name)
                    .await
                    .map_err(fetch_error)?
                {
                    None => Resolution::ObjectMissing,
                    Some(cm) => config_map_value(&cm, &reference.key),
                }
            }
            ReferenceSource::Secret => {
                match self
                    .cluster
                    .get_opt::<Secret>(namespace, &reference.name)
                    .await
                    .map_err(fetch_error)?
                {
                    None => Resolution::ObjectMissing,
                    Some(secret) => secret_value(&secret, &reference.key),
                }
            }
        };

        debug!(found = matches!(resolution, Resolution::Value(_)), "Reference resolved");
        Ok(resolution)
    }
}

fn config_map_value(cm: &ConfigMap, key: &str) -> Resolution {
    if let Some(value) = cm.data.as_ref().and_then(|d| d.get(key)) {
        return Resolution::Value(value.clone());
    }
    cm.binary_data
        .as_ref()
        .and_then(|d| d.get(key))
        .map(|bytes| Resolution::Value(String::from_utf8_lossy(&bytes.0).into_owned()))
        .unwrap_or(Resolution::KeyMissing)
}

fn secret_value(secret: &Secret, key: &str) -> Resolution {
    if let Some(bytes) = secret.data.as_ref().and_then(|d| d.get(key)) {
        return Resolution::Value(String::from_utf8_lossy(&bytes.0).into_owned());
    }
    secret
        .string_data
        .as_ref()
        .and_then(|d| d.get(key))
        .map(|value| Resolution::Value(value.clone()))
        .unwrap_or(Resolution::KeyMissing)
}
