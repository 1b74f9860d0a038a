// Copyright (c) 2026 Agent Dashboard Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Ownership guard.
//!
//! Every mutation and every record-specific read goes through here. A record
//! that was not found is never authorized.

use thiserror::Error;

use crate::domain::agent::UserId;

/// A record with a single owning principal.
pub trait Owned {
    fn owner_id(&self) -> &UserId;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OwnershipError {
    #[error("Unauthorized")]
    Unauthorized,
}

pub fn authorize<R: Owned + ?Sized>(record: Option<&R>, requester: &UserId) -> bool {
    match record {
        Some(record) => record.owner_id() == requester,
        None => false,
    }
}

pub fn ensure_owner<R: Owned + ?Sized>(
    record: Option<&R>,
    requester: &UserId,
) -> Result<(), OwnershipError> {
    if authorize(record, requester) {
        Ok(())
    } else {
        Err(OwnershipError::Unauthorized)
    }
}
