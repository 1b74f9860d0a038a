// Copyright (c) 2026 Agent Dashboard Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Tool references attached to agents.
//!
//! A tool is a tagged variant keyed by `type`. Only datastore-backed tools
//! exist today; new kinds are added as variants of [`ToolSelection`] and the
//! reconciler keeps working because it only ever looks at [`ToolId`].

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolId(pub String);

impl ToolId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ToolId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// What a client asks to attach: the tool kind plus the id of the resource
/// behind it. Serialized as `{"type": "datastore", "id": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolSelection {
    Datastore { id: ToolId },
}

impl ToolSelection {
    pub fn datastore(id: impl Into<String>) -> Self {
        ToolSelection::Datastore { id: ToolId::new(id) }
    }

    pub fn id(&self) -> &ToolId {
        match self {
            ToolSelection::Datastore { id } => id,
        }
    }

}

/// An attached tool as returned to readers.
///
/// `name` and `description` are copied from the referenced resource when the
/// agent is read. They are display data only and are never written back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolRef {
    #[serde(flatten)]
    pub selection: ToolSelection,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ToolRef {
    pub fn id(&self) -> &ToolId {
        self.selection.id()
    }
}

/// Anything that identifies an attached or requested tool.
pub trait ToolHandle {
    fn selection(&self) -> &ToolSelection;

    fn tool_id(&self) -> &ToolId {
        self.selection().id()
    }
}

impl ToolHandle for ToolSelection {
    fn selection(&self) -> &ToolSelection {
        self
    }
}

impl ToolHandle for ToolRef {
    fn selection(&self) -> &ToolSelection {
        &self.selection
    }
}
