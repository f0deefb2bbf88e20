// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Diff collection: per-entity batches, the shared run storage and reporting.

pub mod batch;
pub mod report;
pub mod storage;
pub mod structural;

pub use batch::{BatchState, ComparisonDiff, DiffBatch, Severity};
pub use report::DriftReport;
pub use storage::DiffStorage;
pub use structural::compare_structural;
