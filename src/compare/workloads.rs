// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Pod-controller kinds: everything that embeds a pod template.

use super::fields::{both, compare_field};
use super::pod::compare_pod_templates;
use super::ComparableKind;
use crate::context::EntityScope;
use crate::diff::{compare_structural, DiffBatch};
use crate::error::Result;
use crate::types::ResourceKind;
use async_trait::async_trait;
use k8s_openapi::api::apps::v1::{DaemonSet, DaemonSetSpec, Deployment, DeploymentSpec, StatefulSet};
use k8s_openapi::api::batch::v1::{CronJob, Job, JobSpec};

#[async_trait]
impl ComparableKind for Deployment {
    const RESOURCE_KIND: ResourceKind = ResourceKind::Deployment;

    async fn compare(
        scope: &EntityScope<'_>,
        left: &Self,
        right: &Self,
        batch: &mut DiffBatch,
    ) -> Result<()> {
        let Some((l, r)) = both("spec", left.spec.as_ref(), right.spec.as_ref(), batch) else {
            return Ok(());
        };

        compare_field("spec", "replicas", &l.replicas, &r.replicas, batch);
        compare_structural("spec selector", &l.selector, &r.selector, batch);
        let strategy = |s: &DeploymentSpec| {
            s.strategy.as_ref().and_then(|st| st.type_.clone())
        };
        compare_field("spec", "strategy", &strategy(l), &strategy(r), batch);

        compare_pod_templates(scope, &l.template, &r.template, batch).await
    }
}

#[async_trait]
impl ComparableKind for StatefulSet {
    const RESOURCE_KIND: ResourceKind = ResourceKind::StatefulSet;

    async fn compare(
        scope: &EntityScope<'_>,
        left: &Self,
        right: &Self,
        batch: &mut DiffBatch,
    ) -> Result<()> {
        let Some((l, r)) = both("spec", left.spec.as_ref(), right.spec.as_ref(), batch) else {
            return Ok(());
        };

        compare_field("spec", "replicas", &l.replicas, &r.replicas, batch);
        compare_field("spec", "serviceName", &l.service_name, &r.service_name, batch);
        compare_structural("spec selector", &l.selector, &r.selector, batch);
        compare_field(
            "spec",
            "podManagementPolicy",
            &l.pod_management_policy,
            &r.pod_management_policy,
            batch,
        );

        compare_pod_templates(scope, &l.template, &r.template, batch).await
    }
}

#[async_trait]
impl ComparableKind for DaemonSet {
    const RESOURCE_KIND: ResourceKind = ResourceKind::DaemonSet;

    async fn compare(
        scope: &EntityScope<'_>,
        left: &Self,
        right: &Self,
        batch: &mut DiffBatch,
    ) -> Result<()> {
        let Some((l, r)) = both("spec", left.spec.as_ref(), right.spec.as_ref(), batch) else {
            return Ok(());
        };

        compare_structural("spec selector", &l.selector, &r.selector, batch);
        let strategy = |s: &DaemonSetSpec| {
            s.update_strategy.as_ref().and_then(|st| st.type_.clone())
        };
        compare_field("spec", "updateStrategy", &strategy(l), &strategy(r), batch);

        compare_pod_templates(scope, &l.template, &r.template, batch).await
    }
}

async fn compare_job_specs(
    scope: &EntityScope<'_>,
    subject: &str,
    left: &JobSpec,
    right: &JobSpec,
    batch: &mut DiffBatch,
) -> Result<()> {
    compare_field(subject, "parallelism", &left.parallelism, &right.parallelism, batch);
    compare_field(subject, "completions", &left.completions, &right.completions, batch);
    compare_field(subject, "backoffLimit", &left.backoff_limit, &right.backoff_limit, batch);

    compare_pod_templates(scope, &left.template, &right.template, batch).await
}

#[async_trait]
impl ComparableKind for Job {
    const RESOURCE_KIND: ResourceKind = ResourceKind::Job;

    async fn compare(
        scope: &EntityScope<'_>,
        left: &Self,
        right: &Self,
        batch: &mut DiffBatch,
    ) -> Result<()> {
        match both("spec", left.spec.as_ref(), right.spec.as_ref(), batch) {
            Some((l, r)) => compare_job_specs(scope, "spec", l, r, batch).await,
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ComparableKind for CronJob {
    const RESOURCE_KIND: ResourceKind = ResourceKind::CronJob;

    async fn compare(
        scope: &EntityScope<'_>,
        left: &Self,
        right: &Self,
        batch: &mut DiffBatch,
    ) -> Result<()> {
        let Some((l, r)) = both("spec", left.spec.as_ref(), right.spec.as_ref(), batch) else {
            return Ok(());
        };

        compare_field("spec", "schedule", &l.schedule, &r.schedule, batch);
        compare_field("spec", "suspend", &l.suspend, &r.suspend, batch);
        compare_field(
            "spec",
            "concurrencyPolicy",
            &l.concurrency_policy,
            &r.concurrency_policy,
            batch,
        );

        let job = (l.job_template.spec.as_ref(), r.job_template.spec.as_ref());
        match both("job template spec", job.0, job.1, batch) {
            Some((l, r)) => compare_job_specs(scope, "job template", l, r, batch).await,
            None => Ok(()),
        }
    }
}
