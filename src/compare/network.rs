// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Service and Ingress comparison.

use super::fields::{both, compare_field, compare_keyed, compare_string_maps, Fragment};
use super::ComparableKind;
use crate::context::EntityScope;
use crate::diff::{compare_structural, DiffBatch};
use crate::error::Result;
use crate::types::ResourceKind;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::{Service, ServicePort};
use k8s_openapi::api::networking::v1::{Ingress, IngressRule};

fn port_key(port: &ServicePort) -> String {
    match port.name.as_deref() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => port.port.to_string(),
    }
}

fn rule_key(rule: &IngressRule) -> String {
    rule.host.clone().unwrap_or_else(|| "*".to_string())
}

impl Fragment for IngressRule {
    fn compare(&self, other: &Self, subject: &str, batch: &mut DiffBatch) {
        compare_structural(subject, &self.http, &other.http, batch);
    }
}

#[async_trait]
impl ComparableKind for Service {
    const RESOURCE_KIND: ResourceKind = ResourceKind::Service;

    async fn compare(
        _scope: &EntityScope<'_>,
        left: &Self,
        right: &Self,
        batch: &mut DiffBatch,
    ) -> Result<()> {
        let Some((l, r)) = both("spec", left.spec.as_ref(), right.spec.as_ref(), batch) else {
            return Ok(());
        };

        compare_field("spec", "type", &l.type_, &r.type_, batch);
        compare_string_maps("selector", l.selector.as_ref(), r.selector.as_ref(), batch);
        compare_keyed(
            "port",
            l.ports.as_deref().unwrap_or_default(),
            r.ports.as_deref().unwrap_or_default(),
            port_key,
            batch,
        );
        Ok(())
    }
}

#[async_trait]
impl ComparableKind for Ingress {
    const RESOURCE_KIND: ResourceKind = ResourceKind::Ingress;

    async fn compare(
        _scope: &EntityScope<'_>,
        left: &Self,
        right: &Self,
        batch: &mut DiffBatch,
    ) -> Result<()> {
        let Some((l, r)) = both("spec", left.spec.as_ref(), right.spec.as_ref(), batch) else {
            return Ok(());
        };

        compare_field(
            "spec",
            "ingressClassName",
            &l.ingress_class_name,
            &r.ingress_class_name,
            batch,
        );
        compare_keyed(
            "rule",
            l.rules.as_deref().unwrap_or_default(),
            r.rules.as_deref().unwrap_or_default(),
            rule_key,
            batch,
        );
        compare_structural("tls", &l.tls, &r.tls, batch);
        Ok(())
    }
}
