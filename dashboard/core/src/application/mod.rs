// Copyright (c) 2026 Agent Dashboard Contributors
// SPDX-License-Identifier: AGPL-3.0

pub mod error;
pub mod upsert;
pub mod query;
pub mod removal;
pub mod repository_factory;

// Re-export services for convenience
pub use error::AgentServiceError;
pub use upsert::{AgentUpsertService, StandardAgentUpsertService, UpsertPolicy};
pub use query::{AgentQueryService, StandardAgentQueryService};
pub use removal::{AgentRemovalService, StandardAgentRemovalService};
