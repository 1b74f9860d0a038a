// Copyright (c) 2026 Agent Dashboard Contributors
// SPDX-License-Identifier: AGPL-3.0

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};

use agent_dashboard_core::domain::agent::{Agent, AgentId, AgentVisibility, UpsertAgentRequest};
use agent_dashboard_core::domain::config::DashboardConfig;
use agent_dashboard_core::domain::tool::ToolSelection;

use crate::client::DashboardClient;

/// Connection settings shared by every agent command
#[derive(Args, Debug, Clone)]
pub struct ServerArgs {
    /// Dashboard base URL
    #[arg(
        long,
        global = true,
        env = "AGENT_DASHBOARD_URL",
        default_value = "http://127.0.0.1:8000"
    )]
    pub server: String,

    /// Principal to act as, sent in the requester header
    #[arg(long, global = true, env = "AGENT_DASHBOARD_USER")]
    pub user: Option<String>,

    /// Header the server reads the principal from
    /// (default: spec.server.requester_header from the configuration)
    #[arg(long, global = true)]
    pub requester_header: Option<String>,
}

#[derive(Subcommand)]
pub enum AgentCommand {
    /// List agents owned by the current user, newest first
    List,

    /// Show one agent (YAML)
    Show {
        #[arg(value_name = "AGENT_ID")]
        agent_id: String,
    },

    /// Create or update an agent. Its tools are replaced by the given list.
    Upsert {
        /// Read the request body from a YAML or JSON file instead of flags
        #[arg(short, long, value_name = "FILE", conflicts_with_all = ["id", "name", "description", "visibility", "tools"])]
        file: Option<PathBuf>,

        /// Agent id; omitted to create a new agent
        #[arg(long)]
        id: Option<String>,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// public or private
        #[arg(long)]
        visibility: Option<AgentVisibility>,

        /// Datastore id to attach; repeat for several
        #[arg(long = "tool", value_name = "DATASTORE_ID")]
        tools: Vec<String>,
    },

    /// Delete an agent and its tool links
    Delete {
        #[arg(value_name = "AGENT_ID")]
        agent_id: String,
    },
}

pub async fn handle_command(
    command: AgentCommand,
    server: ServerArgs,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let user = server
        .user
        .context("No user given. Pass --user or set AGENT_DASHBOARD_USER")?;
    let requester_header = resolve_requester_header(server.requester_header, config_path)?;
    let client = DashboardClient::new(&server.server, &requester_header, user)?;

    match command {
        AgentCommand::List => list_agents(client).await,
        AgentCommand::Show { agent_id } => show_agent(&agent_id, client).await,
        AgentCommand::Upsert {
            file,
            id,
            name,
            description,
            visibility,
            tools,
        } => {
            let request = match file {
                Some(path) => read_request(&path)?,
                None => UpsertAgentRequest {
                    id: id.map(AgentId),
                    name,
                    description,
                    visibility,
                    tools: tools.into_iter().map(ToolSelection::datastore).collect(),
                },
            };
            upsert_agent(request, client).await
        }
        AgentCommand::Delete { agent_id } => delete_agent(&agent_id, client).await,
    }
}

/// The `--requester-header` flag wins; otherwise the header the configured
/// server reads.
pub fn resolve_requester_header(
    flag: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<String> {
    if let Some(header) = flag {
        return Ok(header);
    }
    let config =
        DashboardConfig::load_or_default(config_path).context("Failed to load configuration")?;
    Ok(config.spec.server.requester_header)
}

/// YAML is a superset of JSON, so one parser covers both formats
pub fn read_request(path: &Path) -> Result<UpsertAgentRequest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read request file: {:?}", path))?;
    serde_yaml::from_str(&content).context("Failed to parse agent request")
}

async fn list_agents(client: DashboardClient) -> Result<()> {
    let agents = client.list_agents().await?;

    if agents.is_empty() {
        println!("{}", "No agents found".yellow());
        return Ok(());
    }

    println!("{} agents found:", agents.len());
    println!("{:<34} {:<24} {:<10} {}", "ID", "NAME", "VISIBILITY", "TOOLS");

    for agent in agents {
        println!(
            "{:<34} {:<24} {:<10} {}",
            agent.id,
            agent.name.bold(),
            agent.visibility,
            agent.tools.len()
        );
    }

    Ok(())
}

async fn show_agent(agent_id: &str, client: DashboardClient) -> Result<()> {
    let agent = client.get_agent(agent_id).await?;
    print_agent(&agent)
}

async fn upsert_agent(request: UpsertAgentRequest, client: DashboardClient) -> Result<()> {
    let agent = client.upsert_agent(&request).await?;
    println!(
        "{}",
        format!("✓ Agent saved: {} ({})", agent.name, agent.id).green()
    );
    print_agent(&agent)
}

async fn delete_agent(agent_id: &str, client: DashboardClient) -> Result<()> {
    client.delete_agent(agent_id).await?;
    println!("{}", format!("✓ Agent {} deleted", agent_id).green());
    Ok(())
}

fn print_agent(agent: &Agent) -> Result<()> {
    let yaml = serde_yaml::to_string(agent).context("Failed to render agent")?;
    println!("{}", yaml);
    Ok(())
}
