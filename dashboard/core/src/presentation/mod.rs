// Copyright (c) 2026 Agent Dashboard Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Presentation
//!
//! # Architecture
//!
//! - **Layer:** Presentation Layer
//! - **Purpose:** JSON-over-HTTP surface for the agent services

pub mod api;
pub mod auth;
pub mod error;

pub use api::{app, AppState};
