// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities for client creation, typed reads and namespace discovery.

pub mod client;
pub mod namespaces;

pub use client::{create_cluster_client, ClusterClient};
pub use namespaces::{discover_namespaces, list_namespaces};
