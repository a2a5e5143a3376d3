// ABOUTME: FitTrack server binary entry point
// ABOUTME: Initializes logging, loads configuration, wires resources, and serves
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Pro

//! FitTrack server binary

use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fittrack_server::config::ServerConfig;
use fittrack_server::resources::ServerResources;
use fittrack_server::server;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    info!(port = config.http_port, "configuration loaded");

    let resources = Arc::new(ServerResources::from_config(config)?);
    server::serve(resources).await?;
    Ok(())
}
