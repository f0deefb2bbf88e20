// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Differences found for a single compared entity.

use crate::types::ResourceKey;
use serde::Serialize;
use std::fmt;
use tracing::debug;

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational; the comparison may be unreliable but nothing differs
    Advisory,
    Warning,
    /// Attached to final diffs
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Advisory => f.write_str("advisory"),
            Severity::Warning => f.write_str("warning"),
            Severity::Critical => f.write_str("critical"),
        }
    }
}

/// A single difference between the two sides of an entity
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ComparisonDiff {
    /// Entity the difference belongs to
    pub key: ResourceKey,
    /// Fragment of the entity, e.g. "container app" or "volume data"
    pub subject: String,
    pub message: String,
    pub severity: Severity,
    /// Further comparison of the entity is meaningless once set
    #[serde(rename = "final")]
    pub is_final: bool,
}

impl ComparisonDiff {
    pub fn counts_as_difference(&self) -> bool {
        self.severity != Severity::Advisory
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BatchState {
    Empty,
    Populated,
    Finalized,
}

/// Ordered differences for one entity, owned by the comparing task until attached
#[derive(Clone, Debug)]
pub struct DiffBatch {
    key: ResourceKey,
    diffs: Vec<ComparisonDiff>,
    state: BatchState,
}

impl DiffBatch {
    pub fn new(key: ResourceKey) -> Self {
        Self {
            key,
            diffs: Vec::new(),
            state: BatchState::Empty,
        }
    }

    pub fn key(&self) -> &ResourceKey {
        &self.key
    }

    pub fn state(&self) -> BatchState {
        self.state
    }

    pub fn diffs(&self) -> &[ComparisonDiff] {
        &self.diffs
    }

    pub fn len(&self) -> usize {
        self.diffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diffs.is_empty()
    }

    pub fn is_final(&self) -> bool {
        self.state == BatchState::Finalized
    }

    /// True when at least one non-advisory diff was recorded
    pub fn differs(&self) -> bool {
        self.diffs.iter().any(ComparisonDiff::counts_as_difference)
    }

    /// Record an ordinary difference
    pub fn diff(&mut self, subject: impl Into<String>, message: impl Into<String>) -> bool {
        self.push(subject.into(), message.into(), Severity::Warning, false)
    }

    /// Record a difference that ends comparison of this entity
    pub fn final_diff(&mut self, subject: impl Into<String>, message: impl Into<String>) -> bool {
        self.push(subject.into(), message.into(), Severity::Critical, true)
    }

    /// Record a note that does not make the entity differ
    pub fn advisory(&mut self, subject: impl Into<String>, message: impl Into<String>) -> bool {
        self.push(subject.into(), message.into(), Severity::Advisory, false)
    }

    /// Append a diff. Returns false if the batch was already finalized and the diff dropped.
    pub fn push(&mut self, subject: String, message: String, severity: Severity, is_final: bool) -> bool {
        if self.is_final() {
            debug!(entity = %self.key, %message, "Dropping diff appended after finalization");
            return false;
        }

        self.diffs.push(ComparisonDiff {
            key: self.key.clone(),
            subject,
            message,
            severity,
            is_final,
        });
        self.state = if is_final {
            BatchState::Finalized
        } else {
            BatchState::Populated
        };
        true
    }

    /// Move to the terminal state; idempotent
    pub fn finalize(&mut self) {
        self.state = BatchState::Finalized;
    }

    pub fn into_diffs(self) -> Vec<ComparisonDiff> {
        self.diffs
    }
}
