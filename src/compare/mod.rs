// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Comparators: the per-kind capability the orchestrator drives, plus the
//! fragment comparators the kinds are built from.

pub mod data;
pub mod env;
pub mod fields;
pub mod image;
pub mod network;
pub mod pod;
pub mod volumes;
pub mod workloads;

use crate::context::EntityScope;
use crate::diff::DiffBatch;
use crate::error::Result;
use crate::types::ResourceKind;
use async_trait::async_trait;
use k8s_openapi::NamespaceResourceScope;
use serde::de::DeserializeOwned;
use std::fmt::Debug;

pub use fields::Fragment;
pub use image::{compare_images, ImageRef};
pub use pod::{compare_pod_specs, compare_pod_templates};

/// A resource kind the orchestrator can list, match and compare
#[async_trait]
pub trait ComparableKind:
    kube::Resource<Scope = NamespaceResourceScope, DynamicType = ()>
    + Clone
    + DeserializeOwned
    + Debug
    + Send
    + Sync
    + 'static
{
    const RESOURCE_KIND: ResourceKind;

    /// Append every difference between two same-named entities to `batch`.
    /// Errors are reserved for failures talking to a cluster.
    async fn compare(
        scope: &EntityScope<'_>,
        left: &Self,
        right: &Self,
        batch: &mut DiffBatch,
    ) -> Result<()>;
}
