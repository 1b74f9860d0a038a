// Copyright (c) 2026 Agent Dashboard Contributors
// SPDX-License-Identifier: AGPL-3.0
//! # Domain Repository Interfaces
//!
//! Persistence contract for the `Agent` aggregate and its many-to-many link to
//! datastores. The interface lives in the domain layer and is implemented in
//! `crate::infrastructure::repositories`.
//!
//! | Trait | Aggregate | Implementations |
//! |-------|-----------|----------------|
//! | `AgentRepository` | `Agent` | `InMemoryAgentRepository`, `PostgresAgentRepository` |
//!
//! ## Atomic writes
//!
//! [`AgentRepository::upsert`] applies a row write plus its attach/detach set
//! as one unit. Implementations serialize concurrent writes to the same agent
//! and re-check [`WritePrecondition`] under that serialization, so a diff
//! computed from a stale read is rejected instead of being half-applied.

use async_trait::async_trait;
use std::collections::BTreeSet;

use crate::domain::agent::{Agent, AgentId, AgentVisibility, UserId};
use crate::domain::tool::{ToolId, ToolSelection};

/// Storage backend selected from configuration.
#[derive(Debug, Clone)]
pub enum StorageBackend {
    InMemory,
    PostgreSQL(PostgresConfig),
}

#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub connection_string: String,
    pub max_connections: u32,
}

/// State the agent must be in when the write is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WritePrecondition {
    /// No agent with this id exists yet.
    Absent,
    /// The agent exists, belongs to `owner_id`, and has exactly `tools`
    /// attached.
    Unchanged {
        owner_id: UserId,
        tools: BTreeSet<ToolId>,
    },
}

/// A fully resolved create-or-update, ready to be applied atomically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentWrite {
    pub id: AgentId,
    pub owner_id: UserId,
    pub name: String,
    pub description: Option<String>,
    pub visibility: AgentVisibility,
    pub attach: Vec<ToolSelection>,
    pub detach: Vec<ToolSelection>,
    pub precondition: WritePrecondition,
}

/// Repository interface for Agent aggregates
#[async_trait]
pub trait AgentRepository: Send + Sync {
    /// Find agent by ID, with attached tools resolved
    async fn find_by_id(&self, id: &AgentId) -> Result<Option<Agent>, RepositoryError>;

    /// All agents owned by `owner_id`, newest first
    async fn find_by_owner(&self, owner_id: &UserId) -> Result<Vec<Agent>, RepositoryError>;

    /// Create or update the agent row and apply its attach/detach set in one
    /// atomic step. Returns the agent as stored afterwards.
    async fn upsert(&self, write: AgentWrite) -> Result<Agent, RepositoryError>;

    /// Delete agent by ID together with its tool associations
    async fn delete(&self, id: &AgentId) -> Result<(), RepositoryError>;
}

/// Repository errors
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Tool not found: {0}")]
    ToolNotFound(ToolId),

    #[error("Concurrent modification: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => RepositoryError::NotFound("Row not found".to_string()),
            _ => RepositoryError::Database(err.to_string()),
        }
    }
}
