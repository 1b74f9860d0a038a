// Copyright (c) 2026 Agent Dashboard Contributors
// SPDX-License-Identifier: AGPL-3.0

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;

use crate::application::error::AgentServiceError;
use crate::application::query::{AgentQueryService, StandardAgentQueryService};
use crate::application::removal::{AgentRemovalService, StandardAgentRemovalService};
use crate::application::upsert::{AgentUpsertService, StandardAgentUpsertService, UpsertPolicy};
use crate::domain::agent::{Agent, AgentId, UpsertAgentRequest};
use crate::domain::repository::AgentRepository;
use crate::domain::validation::ValidationError;
use crate::presentation::auth::Requester;
use crate::presentation::error::ApiError;

pub struct AppState {
    pub upsert_service: Arc<dyn AgentUpsertService>,
    pub query_service: Arc<dyn AgentQueryService>,
    pub removal_service: Arc<dyn AgentRemovalService>,
    /// Header the upstream authentication layer puts the principal id in
    pub requester_header: String,
    pub start_time: Instant,
}

impl AppState {
    /// Wire the standard services around one repository
    pub fn new(
        repository: Arc<dyn AgentRepository>,
        policy: UpsertPolicy,
        requester_header: impl Into<String>,
    ) -> Self {
        Self {
            upsert_service: Arc::new(StandardAgentUpsertService::new(repository.clone(), policy)),
            query_service: Arc::new(StandardAgentQueryService::new(repository.clone())),
            removal_service: Arc::new(StandardAgentRemovalService::new(repository)),
            requester_header: requester_header.into(),
            start_time: Instant::now(),
        }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/agents", get(list_agents).post(upsert_agent))
        .route("/agents/{id}", get(get_agent).delete(delete_agent))
        .with_state(Arc::new(state))
        .layer(TraceLayer::new_for_http())
}

async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "uptime_seconds": state.start_time.elapsed().as_secs(),
    }))
}

async fn upsert_agent(
    State(state): State<Arc<AppState>>,
    Requester(requester): Requester,
    payload: Result<Json<UpsertAgentRequest>, JsonRejection>,
) -> Result<Json<Agent>, ApiError> {
    // Malformed bodies are validation failures like any other payload problem
    let Json(request) = payload.map_err(|rejection| {
        AgentServiceError::ValidationFailed(ValidationError::Malformed(rejection.body_text()))
    })?;

    let agent = state.upsert_service.upsert(&requester, request).await?;
    Ok(Json(agent))
}

async fn list_agents(
    State(state): State<Arc<AppState>>,
    Requester(requester): Requester,
) -> Result<Json<Vec<Agent>>, ApiError> {
    let agents = state.query_service.list_by_owner(&requester).await?;
    Ok(Json(agents))
}

async fn get_agent(
    State(state): State<Arc<AppState>>,
    Requester(requester): Requester,
    Path(id): Path<String>,
) -> Result<Json<Agent>, ApiError> {
    let agent = state
        .query_service
        .get_by_id(&requester, &AgentId(id))
        .await?;
    Ok(Json(agent))
}

async fn delete_agent(
    State(state): State<Arc<AppState>>,
    Requester(requester): Requester,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .removal_service
        .delete(&requester, &AgentId(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
