// Copyright (c) 2026 Agent Dashboard Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Upsert payload constraints, checked before the store is touched.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::domain::agent::UpsertAgentRequest;
use crate::domain::tool::ToolId;

pub const MAX_AGENT_ID_LENGTH: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("id must not be blank")]
    BlankId,

    #[error("id is longer than {max} characters")]
    IdTooLong { max: usize },

    #[error("name is longer than {max} characters")]
    NameTooLong { max: usize },

    #[error("description is longer than {max} characters")]
    DescriptionTooLong { max: usize },

    #[error("tool at position {index} has a blank id")]
    BlankToolId { index: usize },

    #[error("too many tools: {count} (max {max})")]
    TooManyTools { count: usize, max: usize },

    #[error("malformed payload: {0}")]
    Malformed(String),
}

/// Size limits applied to upsert payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentLimits {
    #[serde(default = "default_max_name_length")]
    pub max_name_length: usize,

    #[serde(default = "default_max_description_length")]
    pub max_description_length: usize,

    #[serde(default = "default_max_tools")]
    pub max_tools: usize,
}

impl Default for AgentLimits {
    fn default() -> Self {
        Self {
            max_name_length: default_max_name_length(),
            max_description_length: default_max_description_length(),
            max_tools: default_max_tools(),
        }
    }
}

pub fn validate_upsert(
    request: &UpsertAgentRequest,
    limits: &AgentLimits,
) -> Result<(), ValidationError> {
    if let Some(id) = &request.id {
        if id.as_str().trim().is_empty() {
            return Err(ValidationError::BlankId);
        }
        if id.as_str().chars().count() > MAX_AGENT_ID_LENGTH {
            return Err(ValidationError::IdTooLong { max: MAX_AGENT_ID_LENGTH });
        }
    }

    if let Some(name) = &request.name {
        if name.chars().count() > limits.max_name_length {
            return Err(ValidationError::NameTooLong { max: limits.max_name_length });
        }
    }

    if let Some(description) = &request.description {
        if description.chars().count() > limits.max_description_length {
            return Err(ValidationError::DescriptionTooLong {
                max: limits.max_description_length,
            });
        }
    }

    // Duplicate ids collapse to one member of the requested set
    let distinct: HashSet<&ToolId> = request.tools.iter().map(|t| t.id()).collect();
    if distinct.len() > limits.max_tools {
        return Err(ValidationError::TooManyTools {
            count: distinct.len(),
            max: limits.max_tools,
        });
    }

    if let Some(index) = request
        .tools
        .iter()
        .position(|t| t.id().as_str().trim().is_empty())
    {
        return Err(ValidationError::BlankToolId { index });
    }

    Ok(())
}

fn default_max_name_length() -> usize {
    100
}

fn default_max_description_length() -> usize {
    2000
}

fn default_max_tools() -> usize {
    64
}
