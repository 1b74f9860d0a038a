// Copyright (c) 2026 Agent Dashboard Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Agent Dashboard Core
//!
//! Agent records, their tool attachments, and the services that mutate and
//! query them on behalf of an authenticated requester.
//!
//! # Architecture
//!
//! - **Layer:** Core System
//! - **Purpose:** Domain model, application services, persistence adapters
//!   and the HTTP surface for agent management

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
