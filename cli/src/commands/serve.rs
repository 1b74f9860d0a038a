// Copyright (c) 2026 Agent Dashboard Contributors
// SPDX-License-Identifier: AGPL-3.0

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

use agent_dashboard_core::domain::config::DashboardConfig;

use crate::server::run_server;

pub async fn execute(config_path: Option<PathBuf>, port: Option<u16>) -> Result<()> {
    let mut config =
        DashboardConfig::load_or_default(config_path).context("Failed to load configuration")?;

    if let Some(port) = port {
        info!("Command-line override: port={}", port);
        config.spec.server.port = port;
    }

    run_server(config).await
}
