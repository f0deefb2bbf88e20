// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! ConfigMap and Secret comparison.

use super::fields::{compare_field, compare_string_maps};
use super::ComparableKind;
use crate::context::EntityScope;
use crate::diff::DiffBatch;
use crate::error::Result;
use crate::types::{ClusterSide, ResourceKind};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::{ConfigMap, Secret};
use k8s_openapi::ByteString;
use kube::ResourceExt;
use std::collections::{BTreeMap, BTreeSet};

/// Like `compare_string_maps`, without ever printing a value
fn compare_hidden_maps(
    subject: &str,
    left: Option<&BTreeMap<String, ByteString>>,
    right: Option<&BTreeMap<String, ByteString>>,
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
                batch.diff(subject, format!("{} key {} values differ", subject, key));
            }
            _ => {}
        }
    }
}

#[async_trait]
impl ComparableKind for ConfigMap {
    const RESOURCE_KIND: ResourceKind = ResourceKind::ConfigMap;

    async fn compare(
        _scope: &EntityScope<'_>,
        left: &Self,
        right: &Self,
        batch: &mut DiffBatch,
    ) -> Result<()> {
        let subject = format!("configmap {}", left.name_any());
        compare_string_maps(&subject, left.data.as_ref(), right.data.as_ref(), batch);
        compare_hidden_maps(
            &format!("{} binaryData", subject),
            left.binary_data.as_ref(),
            right.binary_data.as_ref(),
            batch,
        );
        Ok(())
    }
}

#[async_trait]
impl ComparableKind for Secret {
    const RESOURCE_KIND: ResourceKind = ResourceKind::Secret;

    async fn compare(
        _scope: &EntityScope<'_>,
        left: &Self,
        right: &Self,
        batch: &mut DiffBatch,
    ) -> Result<()> {
        let subject = format!("secret {}", left.name_any());
        compare_field(&subject, "type", &left.type_, &right.type_, batch);
        compare_hidden_maps(&subject, left.data.as_ref(), right.data.as_ref(), batch);
        Ok(())
    }
}
