// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Top-level run: one task per namespace, kinds compared in order within each.

use crate::context::CompareContext;
use crate::diff::DriftReport;
use crate::error::{DriftError, Result};
use crate::kubernetes::discover_namespaces;
use crate::orchestrator::compare_resource_kind;
use crate::types::ClusterSide;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, instrument};

pub struct Driver {
    ctx: Arc<CompareContext>,
}

impl Driver {
    pub fn new(ctx: Arc<CompareContext>) -> Self {
        Self { ctx }
    }

    /// Compare both clusters. Ok(true) means they differ.
    ///
    /// The first failing namespace cancels and aborts the rest; a cancelled run
    /// is a failure, never "identical".
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<bool> {
        let namespaces = self.namespaces().await?;
        info!("Comparing {} namespaces", namespaces.len());

        let mut tasks = JoinSet::new();
        for namespace in namespaces {
            let ctx = self.ctx.clone();
            tasks.spawn(async move { compare_namespace(ctx, namespace).await });
        }

        let mut differs = false;
        while let Some(joined) = tasks.join_next().await {
            let failure = match joined {
                Ok(Ok(namespace_differs)) => {
                    differs |= namespace_differs;
                    continue;
                }
                Ok(Err(e)) => e,
                Err(e) => DriftError::TaskFailed(format!("namespace task failed: {}", e)),
            };

            error!("Comparison failed: {}", failure);
            self.ctx.cancel_token().cancel();
            tasks.abort_all();
            return Err(failure);
        }

        if self.ctx.cancel_token().is_cancelled() {
            return Err(DriftError::TaskFailed("comparison was cancelled".to_string()));
        }

        Ok(differs || self.ctx.storage().has_differences())
    }

    /// Close the diff storage and render its contents
    pub fn report(&self, differs: bool) -> DriftReport {
        DriftReport::new(differs, self.ctx.storage().finalize())
    }

    async fn namespaces(&self) -> Result<Vec<String>> {
        let config = self.ctx.config();
        if !config.namespaces.is_empty() {
            return Ok(config.namespaces.clone());
        }
        discover_namespaces(
            self.ctx.cluster(ClusterSide::First),
            self.ctx.cluster(ClusterSide::Second),
            &config.exclude_namespaces,
        )
        .await
    }
}

#[instrument(skip(ctx))]
async fn compare_namespace(ctx: Arc<CompareContext>, namespace: String) -> Result<bool> {
    let mut differs = false;
    for kind in ctx.config().kinds.clone() {
        if ctx.cancel_token().is_cancelled() {
            debug!("Cancelled before {}", kind);
            break;
        }
        differs |= compare_resource_kind(ctx.clone(), &namespace, kind).await?;
    }
    Ok(differs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::kubernetes::ClusterClient;
    use crate::test_utils::{config_map, container, deployment, namespace_list_json, secret, MockService};
    use crate::types::ResourceKind;
    use k8s_openapi::api::apps::v1::Deployment;
    use k8s_openapi::api::core::v1::{ConfigMap, Secret};

    fn make_config(namespaces: &[&str]) -> Config {
        Config {
            namespaces: namespaces.iter().map(|s| s.to_string()).collect(),
            kinds: vec![ResourceKind::Deployment, ResourceKind::ConfigMap, ResourceKind::Secret],
            ..Default::default()
        }
    }

    fn make_driver(first: MockService, second: MockService, config: Config) -> Driver {
        Driver::new(Arc::new(CompareContext::new(
            ClusterClient::new(ClusterSide::First, first.into_client()),
            ClusterClient::new(ClusterSide::Second, second.into_client()),
            config,
        )))
    }

    fn make_cluster(namespace: &str, deployments: &[Deployment], maps: &[ConfigMap], secrets: &[Secret]) -> MockService {
        MockService::new()
            .on_list(namespace, deployments)
            .on_list(namespace, maps)
            .on_list(namespace, secrets)
    }

    #[tokio::test]
    async fn test_identical_clusters() {
        let d = deployment("web", vec![container("app", "app:1.0")]);
        let cm = config_map("settings", &[("k", "v")]);
        let driver = make_driver(
            make_cluster("shop", &[d.clone()], &[cm.clone()], &[]),
            make_cluster("shop", &[d], &[cm], &[]),
            make_config(&["shop"]),
        );

        assert!(!driver.run().await.unwrap());
        let report = driver.report(false);
        assert!(report.diffs.is_empty());
        assert!(report.to_string().ends_with("Clusters are identical"));
    }

    #[tokio::test]
    async fn test_differences_across_namespaces() {
        let driver = make_driver(
            make_cluster("a", &[], &[config_map("cm1", &[("k", "v1")])], &[])
                .on_list::<Deployment>("b", &[])
                .on_list::<ConfigMap>("b", &[])
                .on_list("b", &[secret("s1", &[])]),
            make_cluster("a", &[], &[config_map("cm1", &[("k", "v2")])], &[])
                .on_list::<Deployment>("b", &[])
                .on_list::<ConfigMap>("b", &[])
                .on_list::<Secret>("b", &[]),
            make_config(&["a", "b"]),
        );

        let differs = driver.run().await.unwrap();
        assert!(differs);

        let report = driver.report(differs);
        let messages: Vec<&str> = report.diffs.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(
            messages,
            vec!["configmap cm1 key k differs: v1 vs v2", "s1 missing in cluster 2"]
        );
        assert!(report.diffs.iter().all(|d| d.is_final || d.key.kind != ResourceKind::Secret));
    }

    #[tokio::test]
    async fn test_failure_is_not_reported_as_identical() {
        let driver = make_driver(
            make_cluster("shop", &[], &[], &[])
                .on_error("/api/v1/namespaces/shop/configmaps", 401),
            make_cluster("shop", &[], &[], &[]),
            make_config(&["shop"]),
        );

        assert!(driver.run().await.is_err());
        assert!(driver.ctx.cancel_token().is_cancelled());
    }

    #[tokio::test]
    async fn test_discovers_namespaces_when_none_configured() {
        let first = make_cluster("team", &[], &[config_map("cm1", &[])], &[])
            .on_get("/api/v1/namespaces", 200, &namespace_list_json(&["team", "kube-system"]));
        let second = make_cluster("team", &[], &[], &[])
            .on_get("/api/v1/namespaces", 200, &namespace_list_json(&["team"]));

        let mut config = make_config(&[]);
        config.exclude_namespaces = vec!["kube-system".to_string()];
        let driver = make_driver(first, second, config);

        assert!(driver.run().await.unwrap());
        let report = driver.report(true);
        assert_eq!(report.diffs.len(), 1);
        assert_eq!(report.diffs[0].message, "cm1 missing in cluster 2");
        assert_eq!(report.diffs[0].key.namespace, "team");
    }

    #[tokio::test]
    async fn test_cancelled_run_fails() {
        let driver = make_driver(
            make_cluster("shop", &[], &[], &[]),
            make_cluster("shop", &[], &[], &[]),
            make_config(&["shop"]),
        );
        driver.ctx.cancel_token().cancel();

        assert!(driver.run().await.is_err());
    }

    #[tokio::test]
    async fn test_report_is_idempotent() {
        let driver = make_driver(
            make_cluster("shop", &[], &[], &[secret("s1", &[])]),
            make_cluster("shop", &[], &[], &[]),
            make_config(&["shop"]),
        );

        let differs = driver.run().await.unwrap();
        let first = driver.report(differs);
        let second = driver.report(differs);
        assert_eq!(first, second);
        assert_eq!(first.diffs.len(), 1);
    }
}
