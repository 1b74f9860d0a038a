// Copyright (c) 2026 Agent Dashboard Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Repository Implementations
//!
//! Infrastructure implementations of the `AgentRepository` contract defined
//! in the domain layer.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** Persist and retrieve agents and their tool links
//! - **Pattern:** Repository (DDD), Adapter (Hexagonal Architecture)
//!
//! # Available Implementations
//!
//! - **PostgresAgentRepository** - production storage, one transaction per
//!   upsert with the agent row locked
//! - **InMemoryAgentRepository** - development and tests; a single write lock
//!   is held for the whole upsert
//!
//! Both resolve tool display metadata from the datastore catalogue at read
//! time and reject attaching a datastore that does not exist.

pub mod postgres_agent;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use crate::domain::agent::{Agent, AgentId, AgentVisibility, UserId};
use crate::domain::datastore::Datastore;
use crate::domain::repository::{AgentRepository, AgentWrite, RepositoryError, WritePrecondition};
use crate::domain::tool::{ToolId, ToolSelection};

#[derive(Debug, Clone)]
struct StoredAgent {
    id: AgentId,
    name: String,
    description: Option<String>,
    owner_id: UserId,
    visibility: AgentVisibility,
    tools: Vec<ToolSelection>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    // Tie-breaker for agents created within the same clock tick.
    sequence: u64,
}

impl StoredAgent {
    fn tool_ids(&self) -> BTreeSet<ToolId> {
        self.tools.iter().map(|t| t.id().clone()).collect()
    }
}

#[derive(Default)]
struct State {
    agents: HashMap<AgentId, StoredAgent>,
    datastores: HashMap<ToolId, Datastore>,
    next_sequence: u64,
}

impl State {
    fn resolve(&self, stored: &StoredAgent) -> Agent {
        let tools = stored
            .tools
            .iter()
            .filter_map(|selection| match selection {
                ToolSelection::Datastore { id } => self.datastores.get(id).map(Datastore::to_tool_ref),
            })
            .collect();

        Agent {
            id: stored.id.clone(),
            name: stored.name.clone(),
            description: stored.description.clone(),
            owner_id: stored.owner_id.clone(),
            visibility: stored.visibility,
            tools,
            created_at: stored.created_at,
            updated_at: stored.updated_at,
        }
    }

    fn check_precondition(&self, write: &AgentWrite) -> Result<(), RepositoryError> {
        let existing = self.agents.get(&write.id);
        match (&write.precondition, existing) {
            (WritePrecondition::Absent, None) => Ok(()),
            (WritePrecondition::Absent, Some(_)) => Err(RepositoryError::Conflict(format!(
                "agent {} was created concurrently",
                write.id
            ))),
            (WritePrecondition::Unchanged { .. }, None) => Err(RepositoryError::Conflict(format!(
                "agent {} was deleted concurrently",
                write.id
            ))),
            (WritePrecondition::Unchanged { owner_id, tools }, Some(stored)) => {
                if &stored.owner_id != owner_id || &stored.tool_ids() != tools {
                    Err(RepositoryError::Conflict(format!(
                        "agent {} was modified concurrently",
                        write.id
                    )))
                } else {
                    Ok(())
                }
            }
        }
    }

    fn check_tools_exist(&self, attach: &[ToolSelection]) -> Result<(), RepositoryError> {
        for selection in attach {
            match selection {
                ToolSelection::Datastore { id } => {
                    if !self.datastores.contains_key(id) {
                        return Err(RepositoryError::ToolNotFound(id.clone()));
                    }
                }
            }
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryAgentRepository {
    state: Arc<RwLock<State>>,
}

impl InMemoryAgentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a datastore in the catalogue tools resolve against
    pub fn register_datastore(&self, datastore: Datastore) {
        let mut state = self.state.write();
        state.datastores.insert(datastore.id.clone(), datastore);
    }

    /// Remove a datastore and every agent link pointing at it
    pub fn remove_datastore(&self, id: &ToolId) -> Option<Datastore> {
        let mut state = self.state.write();
        let removed = state.datastores.remove(id);
        if removed.is_some() {
            for agent in state.agents.values_mut() {
                agent.tools.retain(|t| t.id() != id);
            }
        }
        removed
    }

    pub fn datastore_count(&self) -> usize {
        self.state.read().datastores.len()
    }
}

#[async_trait]
impl AgentRepository for InMemoryAgentRepository {
    async fn find_by_id(&self, id: &AgentId) -> Result<Option<Agent>, RepositoryError> {
        let state = self.state.read();
        Ok(state.agents.get(id).map(|stored| state.resolve(stored)))
    }

    async fn find_by_owner(&self, owner_id: &UserId) -> Result<Vec<Agent>, RepositoryError> {
        let state = self.state.read();
        let mut owned: Vec<&StoredAgent> = state
            .agents
            .values()
            .filter(|a| &a.owner_id == owner_id)
            .collect();
        owned.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.sequence.cmp(&a.sequence))
        });
        Ok(owned.into_iter().map(|stored| state.resolve(stored)).collect())
    }

    async fn upsert(&self, write: AgentWrite) -> Result<Agent, RepositoryError> {
        let mut guard = self.state.write();
        let state = &mut *guard;

        // All checks run before the first mutation so a rejected write leaves
        // nothing behind.
        state.check_precondition(&write)?;
        state.check_tools_exist(&write.attach)?;

        let now = Utc::now();
        let sequence = state.next_sequence;

        let AgentWrite {
            id,
            owner_id,
            name,
            description,
            visibility,
            attach,
            detach,
            ..
        } = write;

        let stored = match state.agents.get_mut(&id) {
            Some(stored) => {
                let detach_ids: HashSet<&ToolId> = detach.iter().map(|t| t.id()).collect();
                stored.tools.retain(|t| !detach_ids.contains(t.id()));
                for selection in attach {
                    if !stored.tools.iter().any(|t| t.id() == selection.id()) {
                        stored.tools.push(selection);
                    }
                }
                stored.name = name;
                stored.description = description;
                stored.visibility = visibility;
                stored.updated_at = now;
                stored.clone()
            }
            None => {
                let stored = StoredAgent {
                    id: id.clone(),
                    name,
                    description,
                    owner_id,
                    visibility,
                    tools: attach,
                    created_at: now,
                    updated_at: now,
                    sequence,
                };
                state.next_sequence += 1;
                state.agents.insert(id, stored.clone());
                stored
            }
        };

        Ok(state.resolve(&stored))
    }

    async fn delete(&self, id: &AgentId) -> Result<(), RepositoryError> {
        let mut state = self.state.write();
        state
            .agents
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::NotFound(format!("agent {}", id)))
    }
}
