// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Environment variables read by [`crate::config::Config::from_env`]
pub mod env {
    /// Optional YAML file seeding the configuration
    pub const CONFIG_FILE: &str = "KUBEDRIFT_CONFIG";
    pub const CLUSTER1_KUBECONFIG: &str = "CLUSTER1_KUBECONFIG";
    pub const CLUSTER1_CONTEXT: &str = "CLUSTER1_CONTEXT";
    pub const CLUSTER2_KUBECONFIG: &str = "CLUSTER2_KUBECONFIG";
    pub const CLUSTER2_CONTEXT: &str = "CLUSTER2_CONTEXT";
    /// Comma separated namespace list; empty means discover from both clusters
    pub const NAMESPACES: &str = "NAMESPACES";
    pub const EXCLUDE_NAMESPACES: &str = "EXCLUDE_NAMESPACES";
    /// Comma separated resource kinds to compare
    pub const KINDS: &str = "KINDS";
    /// Comma separated `Kind/name` pairs skipped during matching
    pub const EXCLUDE: &str = "EXCLUDE";
    /// Comma separated tag patterns that trigger the rolling tag advisory
    pub const ROLLING_TAGS: &str = "ROLLING_TAGS";
    pub const OUTPUT_FORMAT: &str = "OUTPUT_FORMAT";
}

/// Defaults applied when neither env nor config file set a value
pub mod defaults {
    pub const EXCLUDE_NAMESPACES: &[&str] = &["kube-system", "kube-public", "kube-node-lease"];
    /// Published into every namespace with cluster specific content
    pub const EXCLUDE: &[&str] = &["ConfigMap/kube-root-ca.crt"];
    pub const ROLLING_TAGS: &[&str] = &["latest"];
    /// Tag assumed when an image reference carries none
    pub const IMAGE_TAG: &str = "latest";
}

/// Process exit codes
pub mod exit {
    pub const IDENTICAL: u8 = 0;
    pub const DIFFERENT: u8 = 1;
    pub const FAILED: u8 = 2;
}
