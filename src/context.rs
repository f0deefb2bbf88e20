// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Run-wide state handed from the driver down to every comparator.

use crate::config::Config;
use crate::diff::DiffStorage;
use crate::kubernetes::ClusterClient;
use crate::resolver::ReferenceResolver;
use crate::types::ClusterSide;
use tokio_util::sync::CancellationToken;

/// Clients, settings, diff storage and the root cancellation token of one run
pub struct CompareContext {
    first: ClusterClient,
    second: ClusterClient,
    config: Config,
    storage: DiffStorage,
    cancel: CancellationToken,
}

impl CompareContext {
    pub fn new(first: ClusterClient, second: ClusterClient, config: Config) -> Self {
        Self {
            first,
            second,
            config,
            storage: DiffStorage::new(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn cluster(&self, side: ClusterSide) -> &ClusterClient {
        match side {
            ClusterSide::First => &self.first,
            ClusterSide::Second => &self.second,
        }
    }

    /// A resolver bound to one cluster
    pub fn resolver(&self, side: ClusterSide) -> ReferenceResolver {
        ReferenceResolver::new(self.cluster(side).clone())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn storage(&self) -> &DiffStorage {
        &self.storage
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }
}

/// What a comparator needs while comparing one entity
pub struct EntityScope<'a> {
    pub ctx: &'a CompareContext,
    pub namespace: &'a str,
    pub cancel: &'a CancellationToken,
}

impl<'a> EntityScope<'a> {
    pub fn new(ctx: &'a CompareContext, namespace: &'a str, cancel: &'a CancellationToken) -> Self {
        Self {
            ctx,
            namespace,
            cancel,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn config(&self) -> &Config {
        self.ctx.config()
    }
}
