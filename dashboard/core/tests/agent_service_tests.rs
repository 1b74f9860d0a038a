// Copyright (c) 2026 Agent Dashboard Contributors
// SPDX-License-Identifier: AGPL-3.0

use agent_dashboard_core::application::{
    AgentQueryService, AgentRemovalService, AgentServiceError, AgentUpsertService,
    StandardAgentQueryService, StandardAgentRemovalService, StandardAgentUpsertService,
    UpsertPolicy,
};
use agent_dashboard_core::domain::agent::{Agent, AgentId, AgentVisibility, UpsertAgentRequest, UserId};
use agent_dashboard_core::domain::datastore::Datastore;
use agent_dashboard_core::domain::repository::{AgentRepository, AgentWrite, RepositoryError};
use agent_dashboard_core::domain::tool::{ToolId, ToolSelection};
use agent_dashboard_core::domain::validation::{AgentLimits, ValidationError};
use agent_dashboard_core::infrastructure::repositories::InMemoryAgentRepository;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::sync::Arc;

struct Harness {
    repo: Arc<InMemoryAgentRepository>,
    upsert: StandardAgentUpsertService,
    query: StandardAgentQueryService,
    removal: StandardAgentRemovalService,
}

impl Harness {
    fn new() -> Self {
        Self::with_policy(UpsertPolicy::default())
    }

    fn with_policy(policy: UpsertPolicy) -> Self {
        let repo = Arc::new(InMemoryAgentRepository::new());
        for (id, name) in [("T1", "Docs"), ("T2", "Wiki"), ("T3", "Tickets")] {
            repo.register_datastore(Datastore {
                id: ToolId::from(id),
                name: name.to_string(),
                description: Some(format!("{} datastore", name)),
                owner_id: UserId::from("U1"),
            });
        }
        let dyn_repo: Arc<dyn AgentRepository> = repo.clone();
        Self {
            upsert: StandardAgentUpsertService::new(dyn_repo.clone(), policy),
            query: StandardAgentQueryService::new(dyn_repo.clone()),
            removal: StandardAgentRemovalService::new(dyn_repo),
            repo,
        }
    }
}

fn tools(ids: &[&str]) -> Vec<ToolSelection> {
    ids.iter().map(|id| ToolSelection::datastore(*id)).collect()
}

fn tool_ids(ids: &[&str]) -> BTreeSet<ToolId> {
    ids.iter().map(|id| ToolId::from(*id)).collect()
}

fn u1() -> UserId {
    UserId::from("U1")
}

fn u2() -> UserId {
    UserId::from("U2")
}

async fn seed_a1(harness: &Harness) -> Agent {
    harness
        .upsert
        .upsert(
            &u1(),
            UpsertAgentRequest {
                id: Some(AgentId::from("A1")),
                name: Some("Support bot".to_string()),
                description: Some("Answers tickets".to_string()),
                visibility: Some(AgentVisibility::Public),
                tools: tools(&["T1", "T2"]),
            },
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn test_upsert_replaces_tool_set() {
    let harness = Harness::new();
    seed_a1(&harness).await;

    let agent = harness
        .upsert
        .upsert(
            &u1(),
            UpsertAgentRequest {
                id: Some(AgentId::from("A1")),
                name: Some("Support bot".to_string()),
                tools: tools(&["T2", "T3"]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(agent.tool_ids(), tool_ids(&["T2", "T3"]));
    let tickets = agent.tools.iter().find(|t| t.id().as_str() == "T3").unwrap();
    assert_eq!(tickets.name, "Tickets");
    assert_eq!(tickets.description.as_deref(), Some("Tickets datastore"));
}

#[tokio::test]
async fn test_create_without_id_or_name() {
    let harness = Harness::new();

    let agent = harness
        .upsert
        .upsert(&u1(), UpsertAgentRequest::default())
        .await
        .unwrap();

    assert!(!agent.id.as_str().is_empty());
    assert!(!agent.name.is_empty());
    assert_eq!(agent.visibility, AgentVisibility::Private);
    assert_eq!(agent.owner_id, u1());
    assert!(agent.tools.is_empty());
}

#[tokio::test]
async fn test_blank_name_gets_placeholder() {
    let harness = Harness::new();

    let agent = harness
        .upsert
        .upsert(
            &u1(),
            UpsertAgentRequest {
                name: Some("   ".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(!agent.name.trim().is_empty());
}

#[tokio::test]
async fn test_omitted_visibility_is_preserved_on_update() {
    let harness = Harness::new();
    let created = seed_a1(&harness).await;
    assert_eq!(created.visibility, AgentVisibility::Public);

    let updated = harness
        .upsert
        .upsert(
            &u1(),
            UpsertAgentRequest {
                id: Some(AgentId::from("A1")),
                name: Some("Renamed".to_string()),
                tools: tools(&["T1", "T2"]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.visibility, AgentVisibility::Public);
    assert_eq!(updated.description.as_deref(), Some("Answers tickets"));
    assert_eq!(updated.name, "Renamed");
    assert_eq!(updated.created_at, created.created_at);
    assert_eq!(updated.owner_id, u1());
}

#[tokio::test]
async fn test_blank_description_clears_it() {
    let harness = Harness::new();
    seed_a1(&harness).await;

    let updated = harness
        .upsert
        .upsert(
            &u1(),
            UpsertAgentRequest {
                id: Some(AgentId::from("A1")),
                name: Some("Support bot".to_string()),
                description: Some("  ".to_string()),
                tools: tools(&["T1", "T2"]),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.description, None);

    let created = harness
        .upsert
        .upsert(
            &u1(),
            UpsertAgentRequest {
                description: Some(String::new()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(created.description, None);
}

#[tokio::test]
async fn test_non_owner_upsert_is_unauthorized_and_changes_nothing() {
    let harness = Harness::new();
    let before = seed_a1(&harness).await;

    let err = harness
        .upsert
        .upsert(
            &u2(),
            UpsertAgentRequest {
                id: Some(AgentId::from("A1")),
                name: Some("Hijacked".to_string()),
                visibility: Some(AgentVisibility::Private),
                tools: vec![],
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AgentServiceError::Unauthorized));

    let after = harness.repo.find_by_id(&AgentId::from("A1")).await.unwrap().unwrap();
    assert_eq!(after, before);
}

#[tokio::test]
async fn test_unknown_tool_is_a_store_failure() {
    let harness = Harness::new();
    let before = seed_a1(&harness).await;

    let err = harness
        .upsert
        .upsert(
            &u1(),
            UpsertAgentRequest {
                id: Some(AgentId::from("A1")),
                tools: tools(&["T1", "missing"]),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    match err {
        AgentServiceError::StoreFailure(RepositoryError::ToolNotFound(id)) => {
            assert_eq!(id.as_str(), "missing")
        }
        other => panic!("unexpected error: {:?}", other),
    }

    let after = harness.repo.find_by_id(&AgentId::from("A1")).await.unwrap().unwrap();
    assert_eq!(after.tool_ids(), before.tool_ids());
}

#[tokio::test]
async fn test_validation_failure_skips_store() {
    let harness = Harness::with_policy(UpsertPolicy {
        limits: AgentLimits {
            max_name_length: 4,
            ..Default::default()
        },
        ..Default::default()
    });

    let err = harness
        .upsert
        .upsert(
            &u1(),
            UpsertAgentRequest {
                id: Some(AgentId::from("A9")),
                name: Some("too long".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AgentServiceError::ValidationFailed(ValidationError::NameTooLong { max: 4 })
    ));
    assert!(harness.repo.find_by_id(&AgentId::from("A9")).await.unwrap().is_none());
}

#[tokio::test]
async fn test_supplied_unknown_id_creates_by_default() {
    let harness = Harness::new();

    let agent = harness
        .upsert
        .upsert(
            &u1(),
            UpsertAgentRequest {
                id: Some(AgentId::from("custom-id")),
                tools: tools(&["T1"]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(agent.id, AgentId::from("custom-id"));
    assert_eq!(agent.tool_ids(), tool_ids(&["T1"]));
}

#[tokio::test]
async fn test_supplied_unknown_id_can_be_rejected() {
    let harness = Harness::with_policy(UpsertPolicy {
        create_on_missing_id: false,
        ..Default::default()
    });

    let err = harness
        .upsert
        .upsert(
            &u1(),
            UpsertAgentRequest {
                id: Some(AgentId::from("typo")),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AgentServiceError::NotFound));
}

#[tokio::test]
async fn test_repeated_upsert_is_idempotent() {
    let harness = Harness::new();
    let first = seed_a1(&harness).await;
    let second = seed_a1(&harness).await;

    assert_eq!(first.tool_ids(), second.tool_ids());
    assert_eq!(second.tools.len(), 2);
}

#[tokio::test]
async fn test_get_distinguishes_missing_from_foreign() {
    let harness = Harness::new();
    seed_a1(&harness).await;

    let agent = harness.query.get_by_id(&u1(), &AgentId::from("A1")).await.unwrap();
    assert_eq!(agent.tool_ids(), tool_ids(&["T1", "T2"]));

    let foreign = harness.query.get_by_id(&u2(), &AgentId::from("A1")).await.unwrap_err();
    assert!(matches!(foreign, AgentServiceError::Unauthorized));
    assert!(!foreign.to_string().contains("A1"));

    let missing = harness.query.get_by_id(&u1(), &AgentId::from("nope")).await.unwrap_err();
    assert!(matches!(missing, AgentServiceError::NotFound));
}

#[tokio::test]
async fn test_list_returns_only_own_agents_newest_first() {
    let harness = Harness::new();
    for name in ["first", "second", "third"] {
        harness
            .upsert
            .upsert(
                &u1(),
                UpsertAgentRequest {
                    name: Some(name.to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
    }
    harness
        .upsert
        .upsert(
            &u2(),
            UpsertAgentRequest {
                name: Some("someone else".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let agents = harness.query.list_by_owner(&u1()).await.unwrap();
    let names: Vec<&str> = agents.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["third", "second", "first"]);
    assert!(agents.iter().all(|a| a.owner_id == u1()));

    assert!(harness.query.list_by_owner(&UserId::from("U3")).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_cascades_links_but_keeps_datastores() {
    let harness = Harness::new();
    seed_a1(&harness).await;

    let foreign = harness.removal.delete(&u2(), &AgentId::from("A1")).await.unwrap_err();
    assert!(matches!(foreign, AgentServiceError::Unauthorized));

    harness.removal.delete(&u1(), &AgentId::from("A1")).await.unwrap();
    assert!(harness.repo.find_by_id(&AgentId::from("A1")).await.unwrap().is_none());
    assert_eq!(harness.repo.datastore_count(), 3);

    let again = harness.removal.delete(&u1(), &AgentId::from("A1")).await.unwrap_err();
    assert!(matches!(again, AgentServiceError::NotFound));
}

/// Records every write so tests can see exactly what reached the store.
struct RecordingRepository {
    inner: InMemoryAgentRepository,
    writes: Mutex<Vec<AgentWrite>>,
}

#[async_trait]
impl AgentRepository for RecordingRepository {
    async fn find_by_id(&self, id: &AgentId) -> Result<Option<Agent>, RepositoryError> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_owner(&self, owner_id: &UserId) -> Result<Vec<Agent>, RepositoryError> {
        self.inner.find_by_owner(owner_id).await
    }

    async fn upsert(&self, write: AgentWrite) -> Result<Agent, RepositoryError> {
        self.writes.lock().push(write.clone());
        self.inner.upsert(write).await
    }

    async fn delete(&self, id: &AgentId) -> Result<(), RepositoryError> {
        self.inner.delete(id).await
    }
}

#[tokio::test]
async fn test_store_receives_minimal_diff() {
    let inner = InMemoryAgentRepository::new();
    for id in ["T1", "T2", "T3"] {
        inner.register_datastore(Datastore {
            id: ToolId::from(id),
            name: id.to_string(),
            description: None,
            owner_id: u1(),
        });
    }
    let repo = Arc::new(RecordingRepository {
        inner,
        writes: Mutex::new(Vec::new()),
    });
    let service = StandardAgentUpsertService::new(repo.clone(), UpsertPolicy::default());

    let request = |ids: &[&str]| UpsertAgentRequest {
        id: Some(AgentId::from("A1")),
        name: Some("agent".to_string()),
        tools: tools(ids),
        ..Default::default()
    };

    service.upsert(&u1(), request(&["T1", "T2"])).await.unwrap();
    service.upsert(&u1(), request(&["T2", "T3"])).await.unwrap();
    service.upsert(&u1(), request(&["T3", "T2"])).await.unwrap();

    let writes = repo.writes.lock();
    assert_eq!(writes.len(), 3);

    assert_eq!(writes[1].attach, tools(&["T3"]));
    assert_eq!(writes[1].detach, tools(&["T1"]));

    assert!(writes[2].attach.is_empty());
    assert!(writes[2].detach.is_empty());
}
