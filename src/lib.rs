// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
pub mod compare;
pub mod config;
pub mod constants;
pub mod context;
pub mod diff;
pub mod driver;
pub mod error;
pub mod kubernetes;
pub mod orchestrator;
pub mod reconcile;
pub mod resolver;
pub mod types;

#[cfg(test)]
pub mod test_utils;
