// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, warn};

use kubedrift::config::{Config, OutputFormat};
use kubedrift::constants::exit;
use kubedrift::context::CompareContext;
use kubedrift::driver::Driver;
use kubedrift::kubernetes::{create_cluster_client, ClusterClient};
use kubedrift::types::ClusterSide;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    match run().await {
        Ok(true) => ExitCode::from(exit::DIFFERENT),
        Ok(false) => ExitCode::from(exit::IDENTICAL),
        Err(e) => {
            error!("Comparison could not be completed: {:#}", e);
            ExitCode::from(exit::FAILED)
        }
    }
}

async fn run() -> Result<bool> {
    info!("Starting kubedrift");

    let config = Config::from_env().context("failed to load configuration")?;
    info!(
        "Configuration loaded: namespaces={:?}, kinds={:?}",
        config.namespaces, config.kinds
    );

    let (first, second) = tokio::try_join!(
        create_cluster_client(ClusterSide::First, &config.first),
        create_cluster_client(ClusterSide::Second, &config.second)
    )
    .context("failed to connect to the clusters")?;
    info!("Connected to both clusters");

    let output = config.output;
    let ctx = Arc::new(CompareContext::new(
        ClusterClient::new(ClusterSide::First, first),
        ClusterClient::new(ClusterSide::Second, second),
        config,
    ));

    // Ctrl-C cancels every in-flight comparison; the run then counts as failed
    let cancel = ctx.cancel_token().clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling comparison");
            cancel.cancel();
        }
    });

    let driver = Driver::new(ctx);
    let differs = driver.run().await?;
    let report = driver.report(differs);

    match output {
        OutputFormat::Text => println!("{}", report),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }

    Ok(differs)
}
