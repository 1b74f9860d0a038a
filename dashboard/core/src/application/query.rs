// Copyright (c) 2026 Agent Dashboard Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Read side for agents.
//!
//! `get_by_id` loads first and guards second, so "absent" and "someone
//! else's" come back as different error kinds with no record detail in
//! either. `list_by_owner` filters by owner in the store query and needs no
//! guard.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::application::error::AgentServiceError;
use crate::domain::agent::{Agent, AgentId, UserId};
use crate::domain::ownership::ensure_owner;
use crate::domain::repository::AgentRepository;

#[async_trait]
pub trait AgentQueryService: Send + Sync {
    async fn get_by_id(&self, requester: &UserId, id: &AgentId) -> Result<Agent, AgentServiceError>;

    /// The requester's agents, newest first
    async fn list_by_owner(&self, requester: &UserId) -> Result<Vec<Agent>, AgentServiceError>;
}

pub struct StandardAgentQueryService {
    repository: Arc<dyn AgentRepository>,
}

impl StandardAgentQueryService {
    pub fn new(repository: Arc<dyn AgentRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl AgentQueryService for StandardAgentQueryService {
    async fn get_by_id(&self, requester: &UserId, id: &AgentId) -> Result<Agent, AgentServiceError> {
        let agent = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(AgentServiceError::NotFound)?;

        ensure_owner(Some(&agent), requester)?;
        Ok(agent)
    }

    async fn list_by_owner(&self, requester: &UserId) -> Result<Vec<Agent>, AgentServiceError> {
        let agents = self.repository.find_by_owner(requester).await?;
        debug!(owner_id = %requester, count = agents.len(), "Listed agents");
        Ok(agents)
    }
}
