// Copyright (c) 2026 Agent Dashboard Contributors
// SPDX-License-Identifier: AGPL-3.0

use agent_dashboard_core::application::UpsertPolicy;
use agent_dashboard_core::domain::agent::{Agent, UserId};
use agent_dashboard_core::domain::datastore::Datastore;
use agent_dashboard_core::domain::tool::ToolId;
use agent_dashboard_core::infrastructure::repositories::InMemoryAgentRepository;
use agent_dashboard_core::presentation::{app, AppState};
use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const HEADER: &str = "x-user-id";

fn router() -> Router {
    let repo = Arc::new(InMemoryAgentRepository::new());
    for (id, name) in [("T1", "Docs"), ("T2", "Wiki"), ("T3", "Tickets")] {
        repo.register_datastore(Datastore {
            id: ToolId::from(id),
            name: name.to_string(),
            description: None,
            owner_id: UserId::from("U1"),
        });
    }
    app(AppState::new(repo, UpsertPolicy::default(), HEADER))
}

fn request(method: Method, uri: &str, user: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header(HEADER, user);
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(router: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_health() {
    let router = router();
    let (status, body) = send(&router, request(Method::GET, "/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_upsert_then_reconcile_over_http() {
    let router = router();

    let (status, body) = send(
        &router,
        request(
            Method::POST,
            "/agents",
            Some("U1"),
            Some(json!({
                "id": "A1",
                "name": "Support bot",
                "visibility": "public",
                "tools": [{"type": "datastore", "id": "T1"}, {"type": "datastore", "id": "T2"}]
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ownerId"], "U1");

    let (status, body) = send(
        &router,
        request(
            Method::POST,
            "/agents",
            Some("U1"),
            Some(json!({
                "id": "A1",
                "tools": [{"type": "datastore", "id": "T2"}, {"type": "datastore", "id": "T3"}]
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let agent: Agent = serde_json::from_value(body).unwrap();
    assert_eq!(
        agent.tool_ids(),
        [ToolId::from("T2"), ToolId::from("T3")].into_iter().collect()
    );
    assert!(agent.tools.iter().any(|t| t.name == "Tickets"));
}

#[tokio::test]
async fn test_missing_requester_is_401() {
    let router = router();
    let (status, body) = send(&router, request(Method::GET, "/agents", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthenticated");

    let (status, _) = send(&router, request(Method::GET, "/agents", Some("   "), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_foreign_agent_is_401_and_missing_is_404() {
    let router = router();
    send(
        &router,
        request(Method::POST, "/agents", Some("U1"), Some(json!({"id": "A1", "tools": []}))),
    )
    .await;

    let (status, body) = send(&router, request(Method::GET, "/agents/A1", Some("U2"), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");

    let (status, _) = send(
        &router,
        request(Method::POST, "/agents", Some("U2"), Some(json!({"id": "A1", "tools": []}))),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&router, request(Method::GET, "/agents/nope", Some("U1"), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_malformed_payload_is_400() {
    let router = router();

    // tools is required
    let (status, body) = send(
        &router,
        request(Method::POST, "/agents", Some("U1"), Some(json!({"name": "x"}))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_failed");

    let (status, _) = send(
        &router,
        request(
            Method::POST,
            "/agents",
            Some("U1"),
            Some(json!({"tools": [{"type": "webhook", "id": "T1"}]})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_tool_is_422() {
    let router = router();
    let (status, body) = send(
        &router,
        request(
            Method::POST,
            "/agents",
            Some("U1"),
            Some(json!({"tools": [{"type": "datastore", "id": "ghost"}]})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "store_failure");

    let (_, list) = send(&router, request(Method::GET, "/agents", Some("U1"), None)).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_list_and_delete() {
    let router = router();
    for id in ["A1", "A2"] {
        send(
            &router,
            request(Method::POST, "/agents", Some("U1"), Some(json!({"id": id, "tools": []}))),
        )
        .await;
    }
    send(
        &router,
        request(Method::POST, "/agents", Some("U2"), Some(json!({"id": "B1", "tools": []}))),
    )
    .await;

    let (status, list) = send(&router, request(Method::GET, "/agents", Some("U1"), None)).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["A2", "A1"]);

    let (status, _) = send(&router, request(Method::DELETE, "/agents/B1", Some("U1"), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&router, request(Method::DELETE, "/agents/A1", Some("U1"), None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send(&router, request(Method::DELETE, "/agents/A1", Some("U1"), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
