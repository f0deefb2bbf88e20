// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Per (namespace, kind) comparison: list both clusters, match by name, compare
//! every matched pair concurrently and report orphans.

use crate::compare::ComparableKind;
use crate::context::{CompareContext, EntityScope};
use crate::diff::DiffBatch;
use crate::error::{DriftError, Result};
use crate::reconcile::{reconcile, MatchedPair};
use crate::types::{ClusterSide, ResourceKey, ResourceKind};
use k8s_openapi::api::apps::v1::{DaemonSet, Deployment, StatefulSet};
use k8s_openapi::api::batch::v1::{CronJob, Job};
use k8s_openapi::api::core::v1::{ConfigMap, Secret, Service};
use k8s_openapi::api::networking::v1::Ingress;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// What one comparison task reports back, exactly once
struct EntityOutcome {
    name: String,
    result: Result<DiffBatch>,
}

/// Compare every resource of kind `K` in one namespace.
///
/// Returns whether anything differs. A failing entity aborts the whole kind and
/// none of its batches are stored.
#[instrument(skip(ctx), fields(kind = %K::RESOURCE_KIND))]
pub async fn compare_kind<K: ComparableKind>(ctx: Arc<CompareContext>, namespace: &str) -> Result<bool> {
    let kind = K::RESOURCE_KIND;
    let (first, second) = futures::try_join!(
        ctx.cluster(ClusterSide::First).list::<K>(namespace),
        ctx.cluster(ClusterSide::Second).list::<K>(namespace),
    )?;

    let plan = reconcile(first, second, &ctx.config().exclusions_for(kind));
    let pairs = plan.pairs();
    let launched = pairs.len();

    let cancel = ctx.cancel_token().child_token();
    let (tx, mut rx) = mpsc::channel::<EntityOutcome>(launched.max(1));

    for pair in pairs {
        let tx = tx.clone();
        let ctx = ctx.clone();
        let cancel = cancel.clone();
        let namespace = namespace.to_string();
        tokio::spawn(async move {
            let name = pair.name.clone();
            let result = compare_entity(&ctx, &namespace, &cancel, pair).await;
            // The receiver is only gone when the kind was already aborted
            let _ = tx.send(EntityOutcome { name, result }).await;
        });
    }
    drop(tx);

    let mut batches = Vec::with_capacity(launched);
    while let Some(outcome) = rx.recv().await {
        match outcome.result {
            Ok(batch) => batches.push(batch),
            Err(e) => {
                warn!(entity = %outcome.name, "Comparison failed, aborting {} in {}", kind, namespace);
                cancel.cancel();
                return Err(e);
            }
        }
    }

    if batches.len() < launched {
        cancel.cancel();
        return Err(DriftError::TaskFailed(format!(
            "{} of {} {} comparisons in {} did not report",
            launched - batches.len(),
            launched,
            kind,
            namespace
        )));
    }

    let mut differs = plan.counts_differ();
    for batch in batches {
        differs |= batch.differs();
        ctx.storage().attach(batch);
    }

    for side in [ClusterSide::First, ClusterSide::Second] {
        for name in plan.missing_in(side) {
            let mut batch = DiffBatch::new(ResourceKey::new(kind, namespace, &name));
            batch.final_diff(kind.label(), format!("{} missing in {}", name, side));
            differs = true;
            ctx.storage().attach(batch);
        }
    }

    info!(namespace, matched = launched, differs, "Compared {}", kind);
    Ok(differs)
}

async fn compare_entity<K: ComparableKind>(
    ctx: &CompareContext,
    namespace: &str,
    cancel: &CancellationToken,
    pair: MatchedPair<K>,
) -> Result<DiffBatch> {
    let key = ResourceKey::new(K::RESOURCE_KIND, namespace, &pair.name);
    debug!(entity = %key, "Comparison started");

    let scope = EntityScope::new(ctx, namespace, cancel);
    let mut batch = DiffBatch::new(key);
    let result = K::compare(&scope, &pair.first, &pair.second, &mut batch).await;

    debug!(entity = %batch.key(), diffs = batch.len(), ok = result.is_ok(), "Comparison finished");
    result.map(|_| batch)
}

/// Dispatch to the comparison of one kind
pub async fn compare_resource_kind(
    ctx: Arc<CompareContext>,
    namespace: &str,
    kind: ResourceKind,
) -> Result<bool> {
    match kind {
        ResourceKind::Deployment => compare_kind::<Deployment>(ctx, namespace).await,
        ResourceKind::StatefulSet => compare_kind::<StatefulSet>(ctx, namespace).await,
        ResourceKind::DaemonSet => compare_kind::<DaemonSet>(ctx, namespace).await,
        ResourceKind::Job => compare_kind::<Job>(ctx, namespace).await,
        ResourceKind::CronJob => compare_kind::<CronJob>(ctx, namespace).await,
        ResourceKind::ConfigMap => compare_kind::<ConfigMap>(ctx, namespace).await,
        ResourceKind::Secret => compare_kind::<Secret>(ctx, namespace).await,
        ResourceKind::Service => compare_kind::<Service>(ctx, namespace).await,
        ResourceKind::Ingress => compare_kind::<Ingress>(ctx, namespace).await,
    }
}
