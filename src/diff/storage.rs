// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Run-wide store of diff batches shared by all comparison tasks.

use crate::diff::batch::{DiffBatch, Severity};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct StorageInner {
    batches: Vec<DiffBatch>,
    finalized: bool,
}

/// Append-only collection of populated batches, guarded by a single lock.
///
/// Empty batches are never stored, so iteration only ever sees entities that
/// produced at least one diff. Locks are held only for the push or copy itself.
#[derive(Debug, Default)]
pub struct DiffStorage {
    inner: Mutex<StorageInner>,
}

impl DiffStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, StorageInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Attach a finished batch. Returns false when it was empty or the storage is finalized.
    pub fn attach(&self, batch: DiffBatch) -> bool {
        if batch.is_empty() {
            return false;
        }

        for diff in batch.diffs() {
            match diff.severity {
                Severity::Advisory => info!(
                    kind = %diff.key.kind,
                    namespace = %diff.key.namespace,
                    name = %diff.key.name,
                    subject = %diff.subject,
                    "{}",
                    diff.message
                ),
                _ => warn!(
                    kind = %diff.key.kind,
                    namespace = %diff.key.namespace,
                    name = %diff.key.name,
                    subject = %diff.subject,
                    severity = %diff.severity,
                    "{}",
                    diff.message
                ),
            }
        }

        let mut inner = self.lock();
        if inner.finalized {
            debug!(entity = %batch.key(), "Storage already finalized, dropping batch");
            return false;
        }
        inner.batches.push(batch);
        true
    }

    /// Consistent copy of every attached batch
    pub fn snapshot(&self) -> Vec<DiffBatch> {
        self.lock().batches.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().batches.is_empty()
    }

    /// True when any attached batch holds a non-advisory diff
    pub fn has_differences(&self) -> bool {
        self.lock().batches.iter().any(DiffBatch::differs)
    }

    pub fn is_finalized(&self) -> bool {
        self.lock().finalized
    }

    /// Close the storage and every batch in it. Later attaches are rejected.
    /// Calling this more than once returns the same contents.
    pub fn finalize(&self) -> Vec<DiffBatch> {
        let mut inner = self.lock();
        if !inner.finalized {
            inner.finalized = true;
            inner.batches.iter_mut().for_each(DiffBatch::finalize);
        }
        inner.batches.clone()
    }
}
