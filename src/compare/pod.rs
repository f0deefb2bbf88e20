// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Composite comparator for pod templates shared by every pod-controller kind.

use super::env::{compare_env, compare_env_from};
use super::fields::{both, compare_field, compare_keyed, compare_optional, compare_string_maps};
use super::image::compare_images;
use super::volumes::compare_volumes;
use crate::context::EntityScope;
use crate::diff::{compare_structural, DiffBatch};
use crate::error::Result;
use k8s_openapi::api::core::v1::{Container, PodSpec, PodTemplateSpec};
use tracing::debug;

/// Compare template labels, then the pod spec
pub async fn compare_pod_templates(
    scope: &EntityScope<'_>,
    left: &PodTemplateSpec,
    right: &PodTemplateSpec,
    batch: &mut DiffBatch,
) -> Result<()> {
    let labels = |t: &PodTemplateSpec| t.metadata.as_ref().and_then(|m| m.labels.clone());
    compare_string_maps(
        "template labels",
        labels(left).as_ref(),
        labels(right).as_ref(),
        batch,
    );

    if let Some((l, r)) = both("pod spec", left.spec.as_ref(), right.spec.as_ref(), batch) {
        compare_pod_specs(scope, l, r, batch).await?;
    }
    Ok(())
}

/// Compare two pod specs: containers, init containers, node selector, volumes.
/// Stops early on a final diff or cancellation.
pub async fn compare_pod_specs(
    scope: &EntityScope<'_>,
    left: &PodSpec,
    right: &PodSpec,
    batch: &mut DiffBatch,
) -> Result<()> {
    compare_container_list(scope, "container", &left.containers, &right.containers, batch).await?;

    let empty = Vec::new();
    compare_container_list(
        scope,
        "init container",
        left.init_containers.as_ref().unwrap_or(&empty),
        right.init_containers.as_ref().unwrap_or(&empty),
        batch,
    )
    .await?;

    if scope.is_cancelled() || batch.is_final() {
        return Ok(());
    }
    compare_string_maps(
        "node selector",
        left.node_selector.as_ref(),
        right.node_selector.as_ref(),
        batch,
    );

    compare_volumes(scope, left.volumes.as_ref(), right.volumes.as_ref(), batch);
    Ok(())
}

async fn compare_container_list(
    scope: &EntityScope<'_>,
    label: &str,
    left: &[Container],
    right: &[Container],
    batch: &mut DiffBatch,
) -> Result<()> {
    if left.len() != right.len() {
        batch.final_diff(
            format!("{}s", label),
            format!("{} count differs: {} vs {}", label, left.len(), right.len()),
        );
        return Ok(());
    }

    for (l, r) in left.iter().zip(right) {
        if scope.is_cancelled() || batch.is_final() {
            debug!("Stopping {} comparison before {}", label, l.name);
            return Ok(());
        }
        let subject = format!("{} {}", label, l.name);
        compare_container(scope, &subject, l, r, batch).await?;
    }
    Ok(())
}

async fn compare_container(
    scope: &EntityScope<'_>,
    subject: &str,
    left: &Container,
    right: &Container,
    batch: &mut DiffBatch,
) -> Result<()> {
    compare_field(subject, "name", &left.name, &right.name, batch);
    compare_images(
        subject,
        left.image.as_deref(),
        right.image.as_deref(),
        &scope.config().rolling_tags,
        batch,
    );
    compare_field(
        subject,
        "imagePullPolicy",
        &left.image_pull_policy,
        &right.image_pull_policy,
        batch,
    );

    let empty = Vec::new();
    compare_env(
        scope,
        subject,
        left.env.as_ref().unwrap_or(&empty),
        right.env.as_ref().unwrap_or(&empty),
        batch,
    )
    .await?;
    compare_env_from(subject, left.env_from.as_ref(), right.env_from.as_ref(), batch);

    compare_field(subject, "command", &left.command, &right.command, batch);
    compare_field(subject, "args", &left.args, &right.args, batch);

    compare_optional(
        &format!("{} liveness probe", subject),
        left.liveness_probe.as_ref(),
        right.liveness_probe.as_ref(),
        batch,
    );
    compare_optional(
        &format!("{} readiness probe", subject),
        left.readiness_probe.as_ref(),
        right.readiness_probe.as_ref(),
        batch,
    );
    compare_optional(
        &format!("{} startup probe", subject),
        left.startup_probe.as_ref(),
        right.startup_probe.as_ref(),
        batch,
    );

    compare_keyed(
        &format!("{} volume mount", subject),
        left.volume_mounts.as_deref().unwrap_or_default(),
        right.volume_mounts.as_deref().unwrap_or_default(),
        |m| m.name.clone(),
        batch,
    );

    compare_structural(&format!("{} ports", subject), &left.ports, &right.ports, batch);
    compare_structural(
        &format!("{} resources", subject),
        &left.resources,
        &right.resources,
        batch,
    );
    Ok(())
}
