// Copyright (c) 2026 Agent Dashboard Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Maps service failures onto HTTP responses.
//!
//! Bodies are `{"error": "<kind>", "message": "<text>"}`. An unauthorized
//! response never says whether the record exists.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::application::error::AgentServiceError;
use crate::domain::repository::RepositoryError;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

#[derive(Debug)]
pub enum ApiError {
    /// No authenticated principal on the request
    Unauthenticated,
    Service(AgentServiceError),
}

impl From<AgentServiceError> for ApiError {
    fn from(err: AgentServiceError) -> Self {
        ApiError::Service(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Service(err) => match err {
                AgentServiceError::Unauthorized => StatusCode::UNAUTHORIZED,
                AgentServiceError::NotFound => StatusCode::NOT_FOUND,
                AgentServiceError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
                AgentServiceError::StoreFailure(RepositoryError::ToolNotFound(_)) => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                AgentServiceError::StoreFailure(RepositoryError::Conflict(_)) => StatusCode::CONFLICT,
                AgentServiceError::StoreFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            ApiError::Unauthenticated => ErrorBody {
                error: "unauthenticated",
                message: "Authentication required".to_string(),
            },
            ApiError::Service(err) => {
                let internal = matches!(
                    err,
                    AgentServiceError::StoreFailure(
                        RepositoryError::Database(_) | RepositoryError::Serialization(_)
                    )
                );
                if internal {
                    tracing::error!(error = %err, "Store failure while serving request");
                    ErrorBody {
                        error: err.kind(),
                        message: "The agent store could not complete the operation".to_string(),
                    }
                } else {
                    ErrorBody {
                        error: err.kind(),
                        message: err.to_string(),
                    }
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}
