// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Environment variable comparison with ConfigMap/Secret indirection resolved.

use crate::context::EntityScope;
use crate::diff::{compare_structural, DiffBatch};
use crate::error::Result;
use crate::resolver::{KeyReference, ReferenceResolver, ReferenceSource, Resolution};
use crate::types::ClusterSide;
use k8s_openapi::api::core::v1::{EnvFromSource, EnvVar, EnvVarSource};
use std::collections::{BTreeMap, BTreeSet};

/// Effective value of one variable in one cluster
#[derive(Debug, Clone, PartialEq)]
enum EnvValue {
    /// A literal or a successfully resolved non-secret reference
    Plain(String),
    /// A resolved Secret key; never printed
    Sensitive(String),
    /// A reference that could not be resolved
    Unresolved {
        reference: KeyReference,
        resolution: Resolution,
    },
    /// An optional reference whose target is absent; the variable is unset
    Unset,
    /// Field or resource references, compared as written
    Downward(EnvVarSource),
}

impl EnvValue {
    fn describe(&self) -> &'static str {
        match self {
            EnvValue::Plain(_) | EnvValue::Sensitive(_) => "value",
            EnvValue::Unresolved { .. } => "unresolved reference",
            EnvValue::Unset => "unset",
            EnvValue::Downward(_) => "field reference",
        }
    }
}

fn reference_of(var: &EnvVar) -> Option<(KeyReference, bool)> {
    let source = var.value_from.as_ref()?;
    if let Some(sel) = &source.config_map_key_ref {
        return Some((
            KeyReference::config_map(&sel.name, &sel.key),
            sel.optional.unwrap_or(false),
        ));
    }
    if let Some(sel) = &source.secret_key_ref {
        return Some((
            KeyReference::secret(&sel.name, &sel.key),
            sel.optional.unwrap_or(false),
        ));
    }
    None
}

/// Work out what the variable evaluates to in the resolver's cluster
async fn evaluate(var: &EnvVar, resolver: &ReferenceResolver, namespace: &str) -> Result<EnvValue> {
    if let Some((reference, optional)) = reference_of(var) {
        let value = match resolver.resolve(namespace, &reference).await? {
            Resolution::Value(value) if reference.source == ReferenceSource::Secret => {
                EnvValue::Sensitive(value)
            }
            Resolution::Value(value) => EnvValue::Plain(value),
            _ if optional => EnvValue::Unset,
            resolution => EnvValue::Unresolved {
                reference,
                resolution,
            },
        };
        return Ok(value);
    }

    if let Some(source) = &var.value_from {
        return Ok(EnvValue::Downward(source.clone()));
    }

    Ok(EnvValue::Plain(var.value.clone().unwrap_or_default()))
}

fn report_unresolved(
    subject: &str,
    name: &str,
    value: &EnvValue,
    side: ClusterSide,
    batch: &mut DiffBatch,
) -> bool {
    let EnvValue::Unresolved {
        reference,
        resolution,
    } = value
    else {
        return false;
    };

    let kind = reference.source.kind().label();
    let message = match resolution {
        Resolution::KeyMissing => format!(
            "{} env {}: key {} not found in {} {} in {}",
            subject, name, reference.key, kind, reference.name, side
        ),
        _ => format!(
            "{} env {}: {} {} not found in {}",
            subject, name, kind, reference.name, side
        ),
    };
    batch.diff(subject, message);
    true
}

/// Compare the env of two containers by variable name
pub async fn compare_env(
    scope: &EntityScope<'_>,
    subject: &str,
    left: &[EnvVar],
    right: &[EnvVar],
    batch: &mut DiffBatch,
) -> Result<()> {
    let left: BTreeMap<&str, &EnvVar> = left.iter().map(|v| (v.name.as_str(), v)).collect();
    let right: BTreeMap<&str, &EnvVar> = right.iter().map(|v| (v.name.as_str(), v)).collect();
    let names: BTreeSet<&str> = left.keys().chain(right.keys()).copied().collect();

    let first = scope.ctx.resolver(ClusterSide::First);
    let second = scope.ctx.resolver(ClusterSide::Second);

    for name in names {
        let (l, r) = match (left.get(name), right.get(name)) {
            (Some(l), Some(r)) => (*l, *r),
            (Some(_), None) => {
                batch.diff(
                    subject,
                    format!("{} env {} missing in {}", subject, name, ClusterSide::Second),
                );
                continue;
            }
            (None, Some(_)) => {
                batch.diff(
                    subject,
                    format!("{} env {} missing in {}", subject, name, ClusterSide::First),
                );
                continue;
            }
            (None, None) => continue,
        };

        let lv = evaluate(l, &first, scope.namespace).await?;
        let rv = evaluate(r, &second, scope.namespace).await?;

        let unresolved = report_unresolved(subject, name, &lv, ClusterSide::First, batch)
            | report_unresolved(subject, name, &rv, ClusterSide::Second, batch);
        if unresolved {
            continue;
        }

        match (&lv, &rv) {
            (EnvValue::Plain(a), EnvValue::Plain(b)) if a != b => {
                batch.diff(subject, format!("{} env {} differs: {} vs {}", subject, name, a, b));
            }
            (
                EnvValue::Plain(a) | EnvValue::Sensitive(a),
                EnvValue::Plain(b) | EnvValue::Sensitive(b),
            ) if a != b => {
                batch.diff(subject, format!("{} env {} values differ", subject, name));
            }
            (EnvValue::Downward(a), EnvValue::Downward(b)) => {
                compare_structural(&format!("{} env {}", subject, name), a, b, batch);
            }
            (
                EnvValue::Plain(_) | EnvValue::Sensitive(_),
                EnvValue::Plain(_) | EnvValue::Sensitive(_),
            )
            | (EnvValue::Unset, EnvValue::Unset) => {}
            (a, b) => {
                batch.diff(
                    subject,
                    format!(
                        "{} env {} source differs: {} vs {}",
                        subject,
                        name,
                        a.describe(),
                        b.describe()
                    ),
                );
            }
        }
    }

    Ok(())
}

/// Compare `envFrom` sources as written
pub fn compare_env_from(
    subject: &str,
    left: Option<&Vec<EnvFromSource>>,
    right: Option<&Vec<EnvFromSource>>,
    batch: &mut DiffBatch,
) {
    compare_structural(&format!("{} envFrom", subject), &left, &right, batch);
}
