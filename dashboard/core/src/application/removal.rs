// Copyright (c) 2026 Agent Dashboard Contributors
// SPDX-License-Identifier: AGPL-3.0

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::application::error::AgentServiceError;
use crate::domain::agent::{AgentId, UserId};
use crate::domain::ownership::ensure_owner;
use crate::domain::repository::AgentRepository;

/// Owner-only deletion. The store drops the agent's tool associations with
/// it; the referenced datastores stay.
#[async_trait]
pub trait AgentRemovalService: Send + Sync {
    async fn delete(&self, requester: &UserId, id: &AgentId) -> Result<(), AgentServiceError>;
}

pub struct StandardAgentRemovalService {
    repository: Arc<dyn AgentRepository>,
}

impl StandardAgentRemovalService {
    pub fn new(repository: Arc<dyn AgentRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl AgentRemovalService for StandardAgentRemovalService {
    async fn delete(&self, requester: &UserId, id: &AgentId) -> Result<(), AgentServiceError> {
        let agent = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(AgentServiceError::NotFound)?;

        ensure_owner(Some(&agent), requester)?;

        self.repository.delete(id).await?;
        metrics::counter!("agent_deletes_total").increment(1);
        info!(agent_id = %id, owner_id = %requester, tools = agent.tools.len(), "Agent deleted");
        Ok(())
    }
}
