// Copyright (c) 2026 Agent Dashboard Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Failure taxonomy shared by the agent services.
//!
//! Every variant reaches the caller as-is; the services never recover from
//! one locally or fold one into another.

use thiserror::Error;

use crate::domain::ownership::OwnershipError;
use crate::domain::repository::RepositoryError;
use crate::domain::validation::ValidationError;

#[derive(Debug, Error)]
pub enum AgentServiceError {
    /// The requester does not own the record. Carries no detail about the
    /// record itself.
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Agent not found")]
    NotFound,

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),

    #[error("Store failure: {0}")]
    StoreFailure(#[from] RepositoryError),
}

impl From<OwnershipError> for AgentServiceError {
    fn from(err: OwnershipError) -> Self {
        match err {
            OwnershipError::Unauthorized => AgentServiceError::Unauthorized,
        }
    }
}

impl AgentServiceError {
    /// Stable machine-readable kind, used in API responses and metrics labels
    pub fn kind(&self) -> &'static str {
        match self {
            AgentServiceError::Unauthorized => "unauthorized",
            AgentServiceError::NotFound => "not_found",
            AgentServiceError::ValidationFailed(_) => "validation_failed",
            AgentServiceError::StoreFailure(_) => "store_failure",
        }
    }
}
