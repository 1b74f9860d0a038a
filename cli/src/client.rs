// Copyright (c) 2026 Agent Dashboard Contributors
// SPDX-License-Identifier: AGPL-3.0

//! HTTP client for a running dashboard server

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;

use agent_dashboard_core::domain::agent::{Agent, UpsertAgentRequest};

#[derive(Debug, Clone)]
pub struct DashboardClient {
    client: Client,
    base_url: String,
    requester_header: String,
    user: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl DashboardClient {
    /// `user` is sent in `requester_header` on every request, standing in for
    /// the upstream authentication layer.
    pub fn new(
        base_url: impl Into<String>,
        requester_header: impl Into<String>,
        user: impl Into<String>,
    ) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            requester_header: requester_header.into(),
            user: user.into(),
        })
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header(self.requester_header.as_str(), self.user.as_str())
    }

    pub async fn list_agents(&self) -> Result<Vec<Agent>> {
        let response = self
            .authed(self.client.get(format!("{}/agents", self.base_url)))
            .send()
            .await
            .context("Failed to list agents")?;

        let response = check_status(response, "list agents").await?;
        response
            .json()
            .await
            .context("Failed to parse agent list")
    }

    pub async fn get_agent(&self, agent_id: &str) -> Result<Agent> {
        let response = self
            .authed(self.client.get(format!("{}/agents/{}", self.base_url, agent_id)))
            .send()
            .await
            .context("Failed to get agent")?;

        let response = check_status(response, "get agent").await?;
        response.json().await.context("Failed to parse agent")
    }

    pub async fn upsert_agent(&self, request: &UpsertAgentRequest) -> Result<Agent> {
        let response = self
            .authed(self.client.post(format!("{}/agents", self.base_url)))
            .json(request)
            .send()
            .await
            .context("Failed to upsert agent")?;

        let response = check_status(response, "upsert agent").await?;
        response.json().await.context("Failed to parse agent")
    }

    pub async fn delete_agent(&self, agent_id: &str) -> Result<()> {
        let response = self
            .authed(self.client.delete(format!("{}/agents/{}", self.base_url, agent_id)))
            .send()
            .await
            .context("Failed to delete agent")?;

        check_status(response, "delete agent").await?;
        Ok(())
    }
}

async fn check_status(response: Response, action: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorResponse>(&text) {
        Ok(body) => anyhow::bail!(
            "Failed to {} ({} {}): {}",
            action,
            status.as_u16(),
            body.error,
            body.message
        ),
        Err(_) => anyhow::bail!("Failed to {} ({}): {}", action, status.as_u16(), text),
    }
}
