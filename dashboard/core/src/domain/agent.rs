// Copyright (c) 2026 Agent Dashboard Contributors
// SPDX-License-Identifier: AGPL-3.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::ownership::Owned;
use crate::domain::tool::{ToolId, ToolRef, ToolSelection};

/// Opaque agent identifier. Clients may supply their own on creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(pub String);

impl AgentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for AgentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AgentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Identity of a principal, used both for record owners and for requesters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentVisibility {
    Public,
    #[default]
    Private,
}

impl AgentVisibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentVisibility::Public => "public",
            AgentVisibility::Private => "private",
        }
    }
}

impl fmt::Display for AgentVisibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentVisibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(AgentVisibility::Public),
            "private" => Ok(AgentVisibility::Private),
            other => Err(format!("unknown visibility '{}'", other)),
        }
    }
}

/// Agent aggregate as read back from the store, with its tools resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub id: AgentId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub owner_id: UserId,
    pub visibility: AgentVisibility,
    #[serde(default)]
    pub tools: Vec<ToolRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Agent {
    pub fn tool_ids(&self) -> BTreeSet<ToolId> {
        self.tools.iter().map(|t| t.id().clone()).collect()
    }
}

impl Owned for Agent {
    fn owner_id(&self) -> &UserId {
        &self.owner_id
    }
}

/// Create-or-update request body.
///
/// Absent optional fields mean "not supplied". How each one is resolved is
/// decided by the upsert service, not here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertAgentRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AgentId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<AgentVisibility>,
    pub tools: Vec<ToolSelection>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_distinct() {
        assert_ne!(AgentId::new(), AgentId::new());
        assert!(!AgentId::new().as_str().is_empty());
    }

    #[test]
    fn test_visibility_defaults_to_private() {
        assert_eq!(AgentVisibility::default(), AgentVisibility::Private);
        assert_eq!("public".parse::<AgentVisibility>(), Ok(AgentVisibility::Public));
        assert!("shared".parse::<AgentVisibility>().is_err());
    }

    #[test]
    fn test_upsert_request_requires_tools() {
        let missing = serde_json::from_str::<UpsertAgentRequest>(r#"{"name": "a"}"#);
        assert!(missing.is_err());

        let request: UpsertAgentRequest = serde_json::from_str(
            r#"{"id": "a1", "visibility": "public", "tools": [{"id": "t1", "type": "datastore"}]}"#,
        )
        .unwrap();
        assert_eq!(request.id, Some(AgentId::from("a1")));
        assert_eq!(request.name, None);
        assert_eq!(request.visibility, Some(AgentVisibility::Public));
        assert_eq!(request.tools, vec![ToolSelection::datastore("t1")]);
    }
}
