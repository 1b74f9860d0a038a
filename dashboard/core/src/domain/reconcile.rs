// Copyright (c) 2026 Agent Dashboard Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Tool-set reconciliation.
//!
//! Turns a desired tool set into the minimal attach/detach mutations against
//! the set currently attached to an agent. Tools are compared by id only;
//! kind and display metadata never cause a mutation on their own.
//!
//! Both inputs are treated as sets. Duplicate ids in either input collapse to
//! one entry and element order does not change which ids end up on each
//! side. Output order follows first appearance in the respective input so
//! that store calls are deterministic.

use std::collections::HashSet;

use crate::domain::tool::{ToolHandle, ToolId, ToolSelection};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolSetDiff {
    /// Present in `desired`, absent from `current`.
    pub to_attach: Vec<ToolSelection>,
    /// Present in `current`, absent from `desired`.
    pub to_detach: Vec<ToolSelection>,
}

impl ToolSetDiff {
    pub fn is_empty(&self) -> bool {
        self.to_attach.is_empty() && self.to_detach.is_empty()
    }

    pub fn detach_ids(&self) -> HashSet<&ToolId> {
        self.to_detach.iter().map(|s| s.id()).collect()
    }
}

pub fn reconcile<C, D>(current: &[C], desired: &[D]) -> ToolSetDiff
where
    C: ToolHandle,
    D: ToolHandle,
{
    let current_ids: HashSet<&ToolId> = current.iter().map(|t| t.tool_id()).collect();
    let desired_ids: HashSet<&ToolId> = desired.iter().map(|t| t.tool_id()).collect();

    ToolSetDiff {
        to_attach: missing_from(desired, &current_ids),
        to_detach: missing_from(current, &desired_ids),
    }
}

fn missing_from<T: ToolHandle>(source: &[T], other: &HashSet<&ToolId>) -> Vec<ToolSelection> {
    let mut seen = HashSet::with_capacity(source.len());
    let mut missing = Vec::new();
    for tool in source {
        let id = tool.tool_id();
        if !other.contains(id) && seen.insert(id) {
            missing.push(tool.selection().clone());
        }
    }
    missing
}
