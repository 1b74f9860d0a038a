// Copyright (c) 2026 Agent Dashboard Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Repository Factory - Application Layer
//!
//! Creates the concrete `AgentRepository` for the configured storage backend,
//! keeping the domain layer free of infrastructure dependencies.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Select and construct the agent store at startup

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::domain::repository::{AgentRepository, StorageBackend};
use crate::infrastructure::db::Database;
use crate::infrastructure::repositories::postgres_agent::PostgresAgentRepository;
use crate::infrastructure::repositories::InMemoryAgentRepository;

/// Creates an AgentRepository implementation based on the configured backend.
///
/// The PostgreSQL backend connects a pool and applies pending migrations
/// before returning.
pub async fn create_agent_repository(backend: &StorageBackend) -> Result<Arc<dyn AgentRepository>> {
    match backend {
        StorageBackend::InMemory => {
            tracing::warn!("Using in-memory agent storage; data is lost on restart");
            Ok(Arc::new(InMemoryAgentRepository::new()))
        }
        StorageBackend::PostgreSQL(config) => {
            let database = Database::new(&config.connection_string, config.max_connections)
                .await
                .context("Failed to connect to PostgreSQL")?;
            database
                .migrate()
                .await
                .context("Failed to apply database migrations")?;
            Ok(Arc::new(PostgresAgentRepository::new(database.get_pool().clone())))
        }
    }
}
