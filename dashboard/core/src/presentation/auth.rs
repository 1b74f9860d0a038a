// Copyright (c) 2026 Agent Dashboard Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Requester identity.
//!
//! Authentication itself happens upstream. By the time a request reaches the
//! router the authenticated principal is in a trusted header, whose name comes
//! from `spec.server.requester_header`.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::sync::Arc;

use crate::domain::agent::UserId;
use crate::presentation::api::AppState;
use crate::presentation::error::ApiError;

/// The authenticated principal making the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requester(pub UserId);

impl FromRequestParts<Arc<AppState>> for Requester {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(state.requester_header.as_str())
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or(ApiError::Unauthenticated)?;

        Ok(Requester(UserId::new(value)))
    }
}
