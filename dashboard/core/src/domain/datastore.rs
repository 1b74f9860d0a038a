// Copyright (c) 2026 Agent Dashboard Contributors
// SPDX-License-Identifier: AGPL-3.0

use serde::{Deserialize, Serialize};

use crate::domain::agent::UserId;
use crate::domain::tool::{ToolId, ToolRef, ToolSelection};

/// A datastore as seen from the agent side: just enough to resolve the
/// display metadata of an attached tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Datastore {
    pub id: ToolId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub owner_id: UserId,
}

impl Datastore {
    pub fn to_tool_ref(&self) -> ToolRef {
        ToolRef {
            selection: ToolSelection::Datastore { id: self.id.clone() },
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }
}
