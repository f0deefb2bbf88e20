// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::{defaults, env as keys};
use crate::types::ResourceKind;
use anyhow::{anyhow, Context, Result};
use regex::Regex;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::env;
use std::path::PathBuf;

/// Where the client for one cluster comes from
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterSource {
    /// Kubeconfig file; falls back to the inferred default when unset
    pub kubeconfig: Option<PathBuf>,
    /// Kubeconfig context; falls back to the current context when unset
    pub context: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Anchored tag patterns for which a tag-only comparison is unreliable
#[derive(Debug, Clone, Default)]
pub struct RollingTags(Vec<Regex>);

impl RollingTags {
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        patterns
            .into_iter()
            .map(|p| {
                Regex::new(&format!("^(?:{})$", p.as_ref()))
                    .with_context(|| format!("invalid rolling tag pattern '{}'", p.as_ref()))
            })
            .collect::<Result<Vec<_>>>()
            .map(RollingTags)
    }

    pub fn matches(&self, tag: &str) -> bool {
        self.0.iter().any(|re| re.is_match(tag))
    }
}

/// Layout of the optional YAML configuration file
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct FileConfig {
    cluster1: ClusterSource,
    cluster2: ClusterSource,
    namespaces: Option<Vec<String>>,
    exclude_namespaces: Option<Vec<String>>,
    kinds: Option<Vec<String>>,
    exclude: Option<Vec<String>>,
    rolling_tags: Option<Vec<String>>,
    output: Option<OutputFormat>,
}

/// Fully resolved comparison settings
#[derive(Debug, Clone)]
pub struct Config {
    pub first: ClusterSource,
    pub second: ClusterSource,
    /// Namespaces to compare; empty means discover them from both clusters
    pub namespaces: Vec<String>,
    /// Namespaces skipped during discovery
    pub exclude_namespaces: Vec<String>,
    pub kinds: Vec<ResourceKind>,
    /// Per-kind names omitted from matching and reporting
    pub exclusions: HashMap<ResourceKind, HashSet<String>>,
    pub rolling_tags: RollingTags,
    pub output: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            first: ClusterSource::default(),
            second: ClusterSource::default(),
            namespaces: Vec::new(),
            exclude_namespaces: Vec::new(),
            kinds: ResourceKind::ALL.to_vec(),
            exclusions: HashMap::new(),
            rolling_tags: RollingTags::default(),
            output: OutputFormat::Text,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, seeded by the optional config file
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = match lookup(keys::CONFIG_FILE) {
            Some(path) => {
                let raw = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read config file {}", path))?;
                serde_yaml::from_str::<FileConfig>(&raw)
                    .with_context(|| format!("failed to parse config file {}", path))?
            }
            None => FileConfig::default(),
        };

        let list = |key: &str, from_file: Option<Vec<String>>| -> Option<Vec<String>> {
            lookup(key).map(|v| split_list(&v)).or(from_file)
        };

        let first = ClusterSource {
            kubeconfig: lookup(keys::CLUSTER1_KUBECONFIG)
                .map(PathBuf::from)
                .or(file.cluster1.kubeconfig),
            context: lookup(keys::CLUSTER1_CONTEXT).or(file.cluster1.context),
        };
        let second = ClusterSource {
            kubeconfig: lookup(keys::CLUSTER2_KUBECONFIG)
                .map(PathBuf::from)
                .or(file.cluster2.kubeconfig),
            context: lookup(keys::CLUSTER2_CONTEXT).or(file.cluster2.context),
        };

        let namespaces = list(keys::NAMESPACES, file.namespaces).unwrap_or_default();
        let exclude_namespaces = list(keys::EXCLUDE_NAMESPACES, file.exclude_namespaces)
            .unwrap_or_else(|| to_strings(defaults::EXCLUDE_NAMESPACES));

        let kinds = match list(keys::KINDS, file.kinds) {
            Some(kinds) if !kinds.is_empty() => kinds
                .iter()
                .map(|k| k.parse::<ResourceKind>().map_err(|e| anyhow!(e)))
                .collect::<Result<Vec<_>>>()?,
            _ => ResourceKind::ALL.to_vec(),
        };

        let exclude = list(keys::EXCLUDE, file.exclude)
            .unwrap_or_else(|| to_strings(defaults::EXCLUDE));
        let exclusions = parse_exclusions(&exclude)?;

        let tags = list(keys::ROLLING_TAGS, file.rolling_tags)
            .unwrap_or_else(|| to_strings(defaults::ROLLING_TAGS));
        let rolling_tags = RollingTags::new(&tags)?;

        let output = match lookup(keys::OUTPUT_FORMAT) {
            Some(v) => match v.trim().to_lowercase().as_str() {
                "text" => OutputFormat::Text,
                "json" => OutputFormat::Json,
                other => return Err(anyhow!("unknown output format '{}'", other)),
            },
            None => file.output.unwrap_or_default(),
        };

        Ok(Config {
            first,
            second,
            namespaces,
            exclude_namespaces,
            kinds,
            exclusions,
            rolling_tags,
            output,
        })
    }

    /// Names of the given kind that are never matched or reported
    pub fn exclusions_for(&self, kind: ResourceKind) -> HashSet<String> {
        self.exclusions.get(&kind).cloned().unwrap_or_default()
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

/// Parse `Kind/name` entries into per-kind name sets
fn parse_exclusions(entries: &[String]) -> Result<HashMap<ResourceKind, HashSet<String>>> {
    let mut exclusions: HashMap<ResourceKind, HashSet<String>> = HashMap::new();
    for entry in entries {
        let Some((kind, name)) = entry.split_once('/') else {
            return Err(anyhow!("exclusion '{}' is not in Kind/name form", entry));
        };
        let kind = kind.parse::<ResourceKind>().map_err(|e| anyhow!(e))?;
        exclusions
            .entry(kind)
            .or_default()
            .insert(name.trim().to_string());
    }
    Ok(exclusions)
}
