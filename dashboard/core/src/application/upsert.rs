// Copyright (c) 2026 Agent Dashboard Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Agent Upsert Use Case
//!
//! Application service that creates or updates an agent and reconciles its
//! attached tools against the set the client submitted.
//!
//! # DDD Pattern: Application Service
//!
//! - **Layer:** Application
//! - **Responsibility:** Orchestrate create-or-update of an agent
//! - **Collaborators:**
//!   - Domain: payload validation, ownership guard, tool-set reconciler,
//!     placeholder names
//!   - Infrastructure: AgentRepository (atomic upsert)
//!
//! # Flow
//!
//! 1. Validate the payload; nothing is read or written on failure
//! 2. Load the current agent when an id was supplied
//! 3. Run the ownership guard against the loaded agent
//! 4. Resolve name, description and visibility (an omitted field keeps its
//!    current value; a blank description clears it)
//! 5. Reconcile current tools against the requested tools
//! 6. Hand row + attach/detach to the store as one atomic write
//! 7. Return the agent as stored, tools resolved at read time
//!
//! # Error Handling
//!
//! - `ValidationFailed`: payload constraint violated (step 1)
//! - `NotFound`: id supplied, no such agent, and implicit create disabled
//! - `Unauthorized`: agent exists and belongs to someone else (step 3)
//! - `StoreFailure`: the atomic write failed, including unknown tool ids

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::application::error::AgentServiceError;
use crate::domain::agent::{Agent, AgentId, UpsertAgentRequest, UserId};
use crate::domain::config::AgentPolicyConfig;
use crate::domain::naming::generate_placeholder_name;
use crate::domain::ownership::ensure_owner;
use crate::domain::reconcile::reconcile;
use crate::domain::repository::{AgentRepository, AgentWrite, WritePrecondition};
use crate::domain::tool::ToolRef;
use crate::domain::validation::{validate_upsert, AgentLimits};

/// Knobs for the upsert flow, taken from `spec.agents` in the config.
#[derive(Debug, Clone)]
pub struct UpsertPolicy {
    /// When an id is supplied but matches no agent, create the agent with
    /// that id instead of failing with `NotFound`.
    pub create_on_missing_id: bool,
    pub limits: AgentLimits,
}

impl Default for UpsertPolicy {
    fn default() -> Self {
        Self {
            create_on_missing_id: true,
            limits: AgentLimits::default(),
        }
    }
}

impl From<&AgentPolicyConfig> for UpsertPolicy {
    fn from(config: &AgentPolicyConfig) -> Self {
        Self {
            create_on_missing_id: config.create_on_missing_id,
            limits: config.limits.clone(),
        }
    }
}

#[async_trait]
pub trait AgentUpsertService: Send + Sync {
    /// Create or update an agent owned by `requester`
    ///
    /// # Errors
    ///
    /// - `ValidationFailed`: payload rejected before any store call
    /// - `Unauthorized`: the agent exists and is owned by another principal
    /// - `NotFound`: only when implicit create is disabled
    /// - `StoreFailure`: atomic write failed (unknown tool, conflict, database)
    async fn upsert(
        &self,
        requester: &UserId,
        request: UpsertAgentRequest,
    ) -> Result<Agent, AgentServiceError>;
}

pub struct StandardAgentUpsertService {
    repository: Arc<dyn AgentRepository>,
    policy: UpsertPolicy,
}

impl StandardAgentUpsertService {
    pub fn new(repository: Arc<dyn AgentRepository>, policy: UpsertPolicy) -> Self {
        Self { repository, policy }
    }

    async fn apply(
        &self,
        requester: &UserId,
        request: UpsertAgentRequest,
    ) -> Result<Agent, AgentServiceError> {
        validate_upsert(&request, &self.policy.limits)?;

        let current = match &request.id {
            Some(id) => self.repository.find_by_id(id).await?,
            None => None,
        };

        match (&request.id, &current) {
            (Some(_), Some(agent)) => ensure_owner(Some(agent), requester)?,
            (Some(id), None) if !self.policy.create_on_missing_id => {
                debug!(agent_id = %id, "Upsert target does not exist and implicit create is disabled");
                return Err(AgentServiceError::NotFound);
            }
            (Some(id), None) => {
                debug!(agent_id = %id, "Upsert target does not exist, creating it");
            }
            (None, _) => {}
        }

        let UpsertAgentRequest {
            id,
            name,
            description,
            visibility,
            tools,
        } = request;

        let name = match name {
            Some(name) if !name.trim().is_empty() => name,
            _ => generate_placeholder_name(),
        };

        let current_tools: &[ToolRef] = current.as_ref().map(|a| a.tools.as_slice()).unwrap_or(&[]);
        let diff = reconcile(current_tools, &tools);

        let write = match current {
            Some(agent) => AgentWrite {
                precondition: WritePrecondition::Unchanged {
                    owner_id: agent.owner_id.clone(),
                    tools: agent.tool_ids(),
                },
                id: agent.id,
                owner_id: agent.owner_id,
                name,
                description: match description {
                    // Blank clears, omitted keeps the current value
                    Some(d) if d.trim().is_empty() => None,
                    Some(d) => Some(d),
                    None => agent.description,
                },
                visibility: visibility.unwrap_or(agent.visibility),
                attach: diff.to_attach,
                detach: diff.to_detach,
            },
            None => AgentWrite {
                id: id.unwrap_or_else(AgentId::new),
                owner_id: requester.clone(),
                name,
                description: description.filter(|d| !d.trim().is_empty()),
                visibility: visibility.unwrap_or_default(),
                attach: diff.to_attach,
                detach: diff.to_detach,
                precondition: WritePrecondition::Absent,
            },
        };

        let attached = write.attach.len() as u64;
        let detached = write.detach.len() as u64;
        let agent_id = write.id.clone();

        let agent = self.repository.upsert(write).await?;

        metrics::counter!("agent_tools_attached_total").increment(attached);
        metrics::counter!("agent_tools_detached_total").increment(detached);

        info!(
            agent_id = %agent_id,
            owner_id = %agent.owner_id,
            attached,
            detached,
            tools = agent.tools.len(),
            "Agent upserted"
        );

        Ok(agent)
    }
}

#[async_trait]
impl AgentUpsertService for StandardAgentUpsertService {
    async fn upsert(
        &self,
        requester: &UserId,
        request: UpsertAgentRequest,
    ) -> Result<Agent, AgentServiceError> {
        let result = self.apply(requester, request).await;

        let outcome = match &result {
            Ok(_) => "ok",
            Err(e) => {
                warn!(requester = %requester, error = %e, "Agent upsert failed");
                e.kind()
            }
        };
        metrics::counter!("agent_upserts_total", "outcome" => outcome).increment(1);

        result
    }
}
