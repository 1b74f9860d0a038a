// Copyright (c) 2026 Agent Dashboard Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for the agent-dashboard CLI

pub mod agent;
pub mod config;
pub mod migrate;
pub mod serve;

pub use self::agent::AgentCommand;
pub use self::config::ConfigCommand;
