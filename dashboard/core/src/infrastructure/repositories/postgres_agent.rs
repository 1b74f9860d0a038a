// Copyright (c) 2026 Agent Dashboard Contributors
// SPDX-License-Identifier: AGPL-3.0
//! # PostgreSQL Agent Repository
//!
//! Production `AgentRepository` backed by the `agents` and
//! `agent_datastores` tables via `sqlx`. Tool display metadata is joined from
//! `datastores` on every read and is never copied into the link table.
//!
//! Upserts run in one transaction. The agent row is locked with
//! `SELECT ... FOR UPDATE` and the datastores being attached with
//! `FOR SHARE`, so concurrent upserts of the same agent queue behind each
//! other and a datastore cannot vanish between the existence check and the
//! link insert. Two concurrent creates of the same id race on the primary
//! key; the loser gets `RepositoryError::Conflict`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgConnection, PgPool, PgRow};
use sqlx::Row;
use std::collections::{BTreeSet, HashMap, HashSet};

use crate::domain::agent::{Agent, AgentId, AgentVisibility, UserId};
use crate::domain::repository::{AgentRepository, AgentWrite, RepositoryError, WritePrecondition};
use crate::domain::tool::{ToolId, ToolRef, ToolSelection};

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

pub struct PostgresAgentRepository {
    pool: PgPool,
}

impl PostgresAgentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AgentRepository for PostgresAgentRepository {
    async fn find_by_id(&self, id: &AgentId) -> Result<Option<Agent>, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        load_agent(&mut conn, id).await
    }

    async fn find_by_owner(&self, owner_id: &UserId) -> Result<Vec<Agent>, RepositoryError> {
        let mut conn = self.pool.acquire().await?;

        let rows = sqlx::query(
            r#"
            SELECT id, name, description, owner_id, visibility, created_at, updated_at
            FROM agents
            WHERE owner_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(owner_id.as_str())
        .fetch_all(&mut *conn)
        .await?;

        let ids: Vec<String> = rows
            .iter()
            .map(|row| row.try_get::<String, _>("id"))
            .collect::<Result<_, _>>()?;
        let mut tools = load_tools(&mut conn, &ids).await?;

        rows.iter()
            .map(|row| -> Result<Agent, RepositoryError> {
                let mut agent = row_to_agent(row)?;
                agent.tools = tools.remove(agent.id.as_str()).unwrap_or_default();
                Ok(agent)
            })
            .collect()
    }

    async fn upsert(&self, write: AgentWrite) -> Result<Agent, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let locked = sqlx::query("SELECT owner_id FROM agents WHERE id = $1 FOR UPDATE")
            .bind(write.id.as_str())
            .fetch_optional(&mut *tx)
            .await?;

        match (&write.precondition, locked) {
            (WritePrecondition::Absent, None) => {}
            (WritePrecondition::Absent, Some(_)) => {
                return Err(RepositoryError::Conflict(format!(
                    "agent {} was created concurrently",
                    write.id
                )));
            }
            (WritePrecondition::Unchanged { .. }, None) => {
                return Err(RepositoryError::Conflict(format!(
                    "agent {} was deleted concurrently",
                    write.id
                )));
            }
            (WritePrecondition::Unchanged { owner_id, tools }, Some(row)) => {
                let stored_owner: String = row.try_get("owner_id")?;
                let stored_tools = linked_datastore_ids(&mut tx, &write.id).await?;
                if stored_owner != owner_id.as_str() || &stored_tools != tools {
                    return Err(RepositoryError::Conflict(format!(
                        "agent {} was modified concurrently",
                        write.id
                    )));
                }
            }
        }

        let attach_ids = datastore_ids(&write.attach);
        let detach_ids = datastore_ids(&write.detach);
        ensure_datastores_exist(&mut tx, &attach_ids).await?;

        let now = Utc::now();
        match write.precondition {
            WritePrecondition::Absent => {
                sqlx::query(
                    r#"
                    INSERT INTO agents (id, name, description, owner_id, visibility, created_at, updated_at)
                    VALUES ($1, $2, $3, $4, $5, $6, $6)
                    "#,
                )
                .bind(write.id.as_str())
                .bind(&write.name)
                .bind(write.description.as_deref())
                .bind(write.owner_id.as_str())
                .bind(write.visibility.as_str())
                .bind(now)
                .execute(&mut *tx)
                .await
                .map_err(|e| map_write_error(e, &write.id))?;
            }
            WritePrecondition::Unchanged { .. } => {
                sqlx::query(
                    r#"
                    UPDATE agents
                    SET name = $2, description = $3, visibility = $4, updated_at = $5
                    WHERE id = $1
                    "#,
                )
                .bind(write.id.as_str())
                .bind(&write.name)
                .bind(write.description.as_deref())
                .bind(write.visibility.as_str())
                .bind(now)
                .execute(&mut *tx)
                .await?;
            }
        }

        if !detach_ids.is_empty() {
            sqlx::query("DELETE FROM agent_datastores WHERE agent_id = $1 AND datastore_id = ANY($2)")
                .bind(write.id.as_str())
                .bind(&detach_ids)
                .execute(&mut *tx)
                .await?;
        }

        if !attach_ids.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO agent_datastores (agent_id, datastore_id)
                SELECT $1, UNNEST($2::text[])
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(write.id.as_str())
            .bind(&attach_ids)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_write_error(e, &write.id))?;
        }

        let agent = load_agent(&mut tx, &write.id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("agent {}", write.id)))?;

        tx.commit().await?;
        Ok(agent)
    }

    async fn delete(&self, id: &AgentId) -> Result<(), RepositoryError> {
        // agent_datastores rows go with it through ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM agents WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("agent {}", id)));
        }
        Ok(())
    }
}

fn datastore_ids(selections: &[ToolSelection]) -> Vec<String> {
    let mut seen = HashSet::new();
    selections
        .iter()
        .filter_map(|selection| match selection {
            ToolSelection::Datastore { id } => Some(id.as_str().to_string()),
        })
        .filter(|id| seen.insert(id.clone()))
        .collect()
}

async fn ensure_datastores_exist(
    conn: &mut PgConnection,
    ids: &[String],
) -> Result<(), RepositoryError> {
    if ids.is_empty() {
        return Ok(());
    }

    let rows = sqlx::query("SELECT id FROM datastores WHERE id = ANY($1) FOR SHARE")
        .bind(ids)
        .fetch_all(&mut *conn)
        .await?;

    let found: HashSet<String> = rows
        .iter()
        .map(|row| row.try_get::<String, _>("id"))
        .collect::<Result<_, _>>()?;

    match ids.iter().find(|id| !found.contains(*id)) {
        Some(missing) => Err(RepositoryError::ToolNotFound(ToolId::new(missing.clone()))),
        None => Ok(()),
    }
}

async fn linked_datastore_ids(
    conn: &mut PgConnection,
    agent_id: &AgentId,
) -> Result<BTreeSet<ToolId>, RepositoryError> {
    let rows = sqlx::query("SELECT datastore_id FROM agent_datastores WHERE agent_id = $1")
        .bind(agent_id.as_str())
        .fetch_all(&mut *conn)
        .await?;

    rows.iter()
        .map(|row| -> Result<ToolId, RepositoryError> {
            Ok(ToolId::new(row.try_get::<String, _>("datastore_id")?))
        })
        .collect()
}

async fn load_agent(conn: &mut PgConnection, id: &AgentId) -> Result<Option<Agent>, RepositoryError> {
    let row = sqlx::query(
        r#"
        SELECT id, name, description, owner_id, visibility, created_at, updated_at
        FROM agents
        WHERE id = $1
        "#,
    )
    .bind(id.as_str())
    .fetch_optional(&mut *conn)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let mut agent = row_to_agent(&row)?;
    let mut tools = load_tools(conn, &[agent.id.as_str().to_string()]).await?;
    agent.tools = tools.remove(agent.id.as_str()).unwrap_or_default();
    Ok(Some(agent))
}

/// Attached tools for each agent id, display metadata joined from datastores
async fn load_tools(
    conn: &mut PgConnection,
    agent_ids: &[String],
) -> Result<HashMap<String, Vec<ToolRef>>, RepositoryError> {
    let mut tools: HashMap<String, Vec<ToolRef>> = HashMap::new();
    if agent_ids.is_empty() {
        return Ok(tools);
    }

    let rows = sqlx::query(
        r#"
        SELECT ad.agent_id, d.id, d.name, d.description
        FROM agent_datastores ad
        JOIN datastores d ON d.id = ad.datastore_id
        WHERE ad.agent_id = ANY($1)
        ORDER BY d.name ASC, d.id ASC
        "#,
    )
    .bind(agent_ids)
    .fetch_all(&mut *conn)
    .await?;

    for row in rows {
        let agent_id: String = row.try_get("agent_id")?;
        let id: String = row.try_get("id")?;
        tools.entry(agent_id).or_default().push(ToolRef {
            selection: ToolSelection::Datastore { id: ToolId::new(id) },
            name: row.try_get("name")?,
            description: row.try_get("description")?,
        });
    }

    Ok(tools)
}

fn row_to_agent(row: &PgRow) -> Result<Agent, RepositoryError> {
    let id: String = row.try_get("id")?;
    let owner_id: String = row.try_get("owner_id")?;
    let visibility_str: String = row.try_get("visibility")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at")?;

    let visibility: AgentVisibility = visibility_str
        .parse()
        .map_err(|e: String| RepositoryError::Serialization(format!("Failed to read visibility: {}", e)))?;

    Ok(Agent {
        id: AgentId(id),
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        owner_id: UserId(owner_id),
        visibility,
        tools: Vec::new(),
        created_at,
        updated_at,
    })
}

fn map_write_error(err: sqlx::Error, agent_id: &AgentId) -> RepositoryError {
    let code = err
        .as_database_error()
        .and_then(|db| db.code())
        .map(|code| code.into_owned());

    match code.as_deref() {
        Some(UNIQUE_VIOLATION) => {
            RepositoryError::Conflict(format!("agent {} was created concurrently", agent_id))
        }
        Some(FOREIGN_KEY_VIOLATION) => {
            RepositoryError::Conflict(format!("a datastore attached to agent {} was removed", agent_id))
        }
        _ => RepositoryError::from(err),
    }
}
