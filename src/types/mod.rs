// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Identity types shared by every layer of the comparison.

pub mod resource;

pub use resource::{ClusterSide, ResourceKey, ResourceKind};
