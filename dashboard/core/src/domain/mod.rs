// Copyright (c) 2026 Agent Dashboard Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Domain
//!
//! Pure types and rules for agents and the tools attached to them. Nothing in
//! this layer performs I/O except the configuration loader.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Aggregates, value objects, repository contracts

pub mod agent;
pub mod tool;
pub mod datastore;
pub mod ownership;
pub mod reconcile;
pub mod naming;
pub mod validation;
pub mod repository;
pub mod config;
