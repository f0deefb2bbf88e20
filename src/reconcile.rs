// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Name-based matching of same-kind resources from both clusters.
//!
//! The plan is built by a single writer before any comparison task starts and
//! is only read afterwards.

use crate::types::ClusterSide;
use kube::ResourceExt;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    /// Position of the resource in its side's view
    pub index: usize,
    /// A resource with the same name exists on the other side
    pub matched: bool,
}

/// Both sides of an entity present in both clusters
#[derive(Debug)]
pub struct MatchedPair<K> {
    pub name: String,
    pub first: Arc<K>,
    pub second: Arc<K>,
}

/// Outcome of reconciling two resource lists
#[derive(Debug)]
pub struct ComparisonPlan<K> {
    first: HashMap<String, MatchRecord>,
    second: HashMap<String, MatchRecord>,
    first_view: Vec<Arc<K>>,
    second_view: Vec<Arc<K>>,
}

/// Match two same-kind lists by name, ignoring excluded names.
/// A name repeated within one list keeps its last occurrence.
pub fn reconcile<K: ResourceExt>(
    first: Vec<K>,
    second: Vec<K>,
    excluded: &HashSet<String>,
) -> ComparisonPlan<K> {
    let (first_view, mut first_records) = index(first, excluded, ClusterSide::First);
    let (second_view, mut second_records) = index(second, excluded, ClusterSide::Second);

    for (name, record) in first_records.iter_mut() {
        if let Some(other) = second_records.get_mut(name) {
            record.matched = true;
            other.matched = true;
        }
    }

    ComparisonPlan {
        first: first_records,
        second: second_records,
        first_view,
        second_view,
    }
}

fn index<K: ResourceExt>(
    items: Vec<K>,
    excluded: &HashSet<String>,
    side: ClusterSide,
) -> (Vec<Arc<K>>, HashMap<String, MatchRecord>) {
    let mut records = HashMap::with_capacity(items.len());
    let view: Vec<Arc<K>> = items.into_iter().map(normalize).collect();

    for (i, item) in view.iter().enumerate() {
        let name = item.name_any();
        if excluded.contains(&name) {
            continue;
        }
        let record = MatchRecord {
            index: i,
            matched: false,
        };
        if records.insert(name.clone(), record).is_some() {
            warn!("Duplicate name {} on {}, keeping the last occurrence", name, side);
        }
    }

    (view, records)
}

/// Drop server-side bookkeeping that no comparator reads
fn normalize<K: ResourceExt>(mut item: K) -> Arc<K> {
    item.meta_mut().managed_fields = None;
    Arc::new(item)
}

impl<K> ComparisonPlan<K> {
    pub fn records(&self, side: ClusterSide) -> &HashMap<String, MatchRecord> {
        match side {
            ClusterSide::First => &self.first,
            ClusterSide::Second => &self.second,
        }
    }

    fn view(&self, side: ClusterSide) -> &[Arc<K>] {
        match side {
            ClusterSide::First => &self.first_view,
            ClusterSide::Second => &self.second_view,
        }
    }

    /// Entities present in both clusters, ordered by name
    pub fn pairs(&self) -> Vec<MatchedPair<K>> {
        let mut pairs: Vec<MatchedPair<K>> = self
            .first
            .iter()
            .filter(|(_, record)| record.matched)
            .filter_map(|(name, record)| {
                let other = self.second.get(name)?;
                Some(MatchedPair {
                    name: name.clone(),
                    first: self.first_view.get(record.index)?.clone(),
                    second: self.second_view.get(other.index)?.clone(),
                })
            })
            .collect();
        pairs.sort_by(|a, b| a.name.cmp(&b.name));
        pairs
    }

    /// Names that exist on the other side but not on `side`, ordered
    pub fn missing_in(&self, side: ClusterSide) -> Vec<String> {
        let mut names: Vec<String> = self
            .records(side.other())
            .iter()
            .filter(|(_, record)| !record.matched)
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    /// Resource looked up by name on one side
    pub fn get(&self, side: ClusterSide, name: &str) -> Option<&Arc<K>> {
        let record = self.records(side).get(name)?;
        self.view(side).get(record.index)
    }

    /// True when the sides hold a different number of comparable entities
    pub fn counts_differ(&self) -> bool {
        self.first.len() != self.second.len()
    }
}
