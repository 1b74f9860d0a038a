// Copyright (c) 2026 Agent Dashboard Contributors
// SPDX-License-Identifier: AGPL-3.0

// Dashboard Configuration Types
//
// Defines the configuration schema for the agent dashboard server:
// - Kubernetes-style manifest format (apiVersion/kind/metadata/spec)
// - HTTP listener and the trusted requester header
// - Storage backend selection (in-memory or PostgreSQL)
// - Agent upsert policy and payload limits
// - Observability settings

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::domain::repository::{PostgresConfig, StorageBackend};
use crate::domain::validation::AgentLimits;

pub const API_VERSION: &str = "agent-dashboard/v1";
pub const KIND: &str = "DashboardConfig";

/// Top-level Kubernetes-style dashboard configuration manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// API version (must be "agent-dashboard/v1")
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Resource kind (must be "DashboardConfig")
    pub kind: String,

    pub metadata: ConfigMetadata,

    #[serde(default)]
    pub spec: DashboardSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Human-readable deployment name
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardSpec {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub agents: AgentPolicyConfig,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub observability: Option<ObservabilityConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Header carrying the authenticated principal, set by the upstream
    /// authentication layer
    #[serde(default = "default_requester_header")]
    pub requester_header: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            requester_header: default_requester_header(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StorageConfig {
    #[default]
    InMemory,
    Postgres {
        /// Connection URL (supports "env:VAR_NAME")
        url: String,

        #[serde(default = "default_max_connections")]
        max_connections: u32,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentPolicyConfig {
    /// Treat an upsert whose id matches no agent as a create with that id
    #[serde(default = "default_true")]
    pub create_on_missing_id: bool,

    #[serde(flatten)]
    pub limits: AgentLimits,
}

impl Default for AgentPolicyConfig {
    fn default() -> Self {
        Self {
            create_on_missing_id: true,
            limits: AgentLimits::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Prometheus exporter listen address, e.g. "0.0.0.0:9100"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics_address: Option<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            metadata: ConfigMetadata {
                name: "agent-dashboard".to_string(),
                labels: None,
            },
            spec: DashboardSpec::default(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse configuration from YAML string
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> anyhow::Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Candidate configuration paths, in discovery order
    pub fn discovery_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(path) = std::env::var("AGENT_DASHBOARD_CONFIG_PATH") {
            paths.push(PathBuf::from(path));
        }

        paths.push(PathBuf::from("./agent-dashboard.yaml"));

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".agent-dashboard").join("config.yaml"));
        }

        #[cfg(unix)]
        paths.push(PathBuf::from("/etc/agent-dashboard/config.yaml"));
        #[cfg(windows)]
        paths.push(PathBuf::from("C:\\ProgramData\\AgentDashboard\\config.yaml"));

        paths
    }

    /// Discover configuration file using precedence order
    /// 1. AGENT_DASHBOARD_CONFIG_PATH environment variable
    /// 2. ./agent-dashboard.yaml (working directory)
    /// 3. ~/.agent-dashboard/config.yaml (user home)
    /// 4. /etc/agent-dashboard/config.yaml (system)
    pub fn discover_config() -> Option<PathBuf> {
        Self::discovery_paths().into_iter().find(|p| p.exists())
    }

    /// Load configuration with discovery, fallback to default
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        // Explicit CLI path must exist and parse
        if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            let mut config = Self::from_yaml_file(&path).map_err(|e| {
                anyhow::anyhow!("Failed to load config at {:?}: {}", path, e)
            })?;
            config.apply_env_overrides();
            return Ok(config);
        }

        let mut config = match Self::discover_config() {
            Some(path) => {
                tracing::info!("Loading configuration from discovered path: {:?}", path);
                Self::from_yaml_file(path)?
            }
            None => {
                tracing::warn!("No configuration file found in standard locations. Using defaults.");
                Self::default()
            }
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("AGENT_DASHBOARD_DATABASE_URL") {
            tracing::info!("Environment override: AGENT_DASHBOARD_DATABASE_URL");
            let max_connections = match &self.spec.storage {
                StorageConfig::Postgres { max_connections, .. } => *max_connections,
                StorageConfig::InMemory => default_max_connections(),
            };
            self.spec.storage = StorageConfig::Postgres { url, max_connections };
        }

        if let Some(val) = lookup("AGENT_DASHBOARD_PORT") {
            match val.parse::<u16>() {
                Ok(port) => {
                    tracing::info!("Environment override: AGENT_DASHBOARD_PORT={}", port);
                    self.spec.server.port = port;
                }
                Err(_) => {
                    tracing::warn!(
                        "Invalid value for AGENT_DASHBOARD_PORT: '{}'. Expected a port number. Ignoring.",
                        val
                    );
                }
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_version != API_VERSION {
            anyhow::bail!(
                "Invalid apiVersion: '{}'. Must be '{}'",
                self.api_version,
                API_VERSION
            );
        }

        if self.kind != KIND {
            anyhow::bail!("Invalid kind: '{}'. Must be '{}'", self.kind, KIND);
        }

        if self.metadata.name.is_empty() {
            anyhow::bail!("metadata.name cannot be empty");
        }

        if self.spec.server.port == 0 {
            anyhow::bail!("spec.server.port cannot be 0");
        }

        if self.spec.server.requester_header.trim().is_empty() {
            anyhow::bail!("spec.server.requester_header cannot be empty");
        }

        if let StorageConfig::Postgres { url, max_connections } = &self.spec.storage {
            if url.is_empty() {
                anyhow::bail!("spec.storage.url cannot be empty for the postgres backend");
            }
            if *max_connections == 0 {
                anyhow::bail!("spec.storage.max_connections must be at least 1");
            }
        }

        let limits = &self.spec.agents.limits;
        if limits.max_name_length == 0
            || limits.max_description_length == 0
            || limits.max_tools == 0
        {
            anyhow::bail!("spec.agents limits must be greater than 0");
        }

        Ok(())
    }

    /// Resolve the storage backend, expanding "env:VAR_NAME" URLs
    pub fn storage_backend(&self) -> anyhow::Result<StorageBackend> {
        match &self.spec.storage {
            StorageConfig::InMemory => Ok(StorageBackend::InMemory),
            StorageConfig::Postgres { url, max_connections } => {
                let connection_string = match url.strip_prefix("env:") {
                    Some(var) => std::env::var(var).map_err(|_| {
                        anyhow::anyhow!("Environment variable '{}' referenced by spec.storage.url is not set", var)
                    })?,
                    None => url.clone(),
                };
                Ok(StorageBackend::PostgreSQL(PostgresConfig {
                    connection_string,
                    max_connections: *max_connections,
                }))
            }
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.spec.server.host, self.spec.server.port)
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_requester_header() -> String {
    "x-user-id".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_true() -> bool {
    true
}
