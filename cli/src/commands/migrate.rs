// Copyright (c) 2026 Agent Dashboard Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Apply pending database migrations without starting the server

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

use agent_dashboard_core::domain::config::DashboardConfig;
use agent_dashboard_core::domain::repository::StorageBackend;
use agent_dashboard_core::infrastructure::db::Database;

pub async fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config =
        DashboardConfig::load_or_default(config_path).context("Failed to load configuration")?;

    let postgres = match config.storage_backend()? {
        StorageBackend::PostgreSQL(postgres) => postgres,
        StorageBackend::InMemory => {
            println!(
                "{}",
                "In-memory storage configured; nothing to migrate.".yellow()
            );
            return Ok(());
        }
    };

    let database = Database::new(&postgres.connection_string, postgres.max_connections)
        .await
        .context("Failed to connect to PostgreSQL")?;
    database
        .migrate()
        .await
        .context("Failed to apply database migrations")?;

    println!("{}", "✓ Migrations applied".green());
    Ok(())
}
