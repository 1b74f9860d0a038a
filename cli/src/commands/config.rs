// Copyright (c) 2026 Agent Dashboard Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Configuration management commands
//!
//! Commands: show, validate, generate

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;

use agent_dashboard_core::domain::config::{DashboardConfig, StorageConfig};

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show config file paths checked
        #[arg(long)]
        paths: bool,

        /// Print the effective configuration as YAML
        #[arg(long)]
        yaml: bool,
    },

    /// Validate configuration file
    Validate {
        /// Path to config file (default: discover)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Generate sample configuration
    Generate {
        /// Output path (default: ./agent-dashboard.yaml)
        #[arg(short, long, default_value = "./agent-dashboard.yaml")]
        output: PathBuf,

        /// Include examples and comments
        #[arg(long)]
        examples: bool,
    },
}

pub async fn handle_command(
    command: ConfigCommand,
    config_override: Option<PathBuf>,
) -> Result<()> {
    match command {
        ConfigCommand::Show { paths, yaml } => show(config_override, paths, yaml).await,
        ConfigCommand::Validate { file } => validate(file.or(config_override)).await,
        ConfigCommand::Generate { output, examples } => generate(output, examples).await,
    }
}

async fn show(config_override: Option<PathBuf>, show_paths: bool, as_yaml: bool) -> Result<()> {
    let config = DashboardConfig::load_or_default(config_override.clone())
        .context("Failed to load configuration")?;

    if show_paths {
        println!("{}", "Configuration discovery paths:".bold());
        match &config_override {
            Some(path) => println!("  --config flag: {}", path.display()),
            None => println!("  --config flag: {}", "(not set)".dimmed()),
        }
        for (i, path) in DashboardConfig::discovery_paths().iter().enumerate() {
            let marker = if path.exists() { "found".green() } else { "missing".dimmed() };
            println!("  {}. {} ({})", i + 1, path.display(), marker);
        }
        println!();
    }

    if as_yaml {
        print!("{}", config.to_yaml_string()?);
        return Ok(());
    }

    println!("{}", "Current configuration:".bold());
    println!();

    println!("{}", "Deployment:".bold());
    println!("  Name: {}", config.metadata.name);
    println!();

    println!("{}", "Server:".bold());
    println!("  Listen: {}", config.bind_address());
    println!("  Requester header: {}", config.spec.server.requester_header);
    println!();

    println!("{}", "Storage:".bold());
    match &config.spec.storage {
        StorageConfig::InMemory => println!("  Backend: in_memory"),
        StorageConfig::Postgres { url, max_connections } => {
            println!("  Backend: postgres");
            // Only env references are safe to echo; literal URLs may hold a password
            if url.starts_with("env:") {
                println!("  URL: {}", url);
            } else {
                println!("  URL: {}", "(set)".dimmed());
            }
            println!("  Max connections: {}", max_connections);
        }
    }
    println!();

    let agents = &config.spec.agents;
    println!("{}", "Agents:".bold());
    println!("  Create on missing id: {}", agents.create_on_missing_id);
    println!("  Max name length: {}", agents.limits.max_name_length);
    println!("  Max description length: {}", agents.limits.max_description_length);
    println!("  Max tools: {}", agents.limits.max_tools);

    if let Some(address) = config
        .spec
        .observability
        .as_ref()
        .and_then(|o| o.metrics_address.as_deref())
    {
        println!();
        println!("{}", "Observability:".bold());
        println!("  Metrics: {}", address);
    }

    Ok(())
}

async fn validate(config_path: Option<PathBuf>) -> Result<()> {
    println!("Validating configuration...");

    let config = DashboardConfig::load_or_default(config_path)
        .context("Failed to load configuration")?;

    config
        .validate()
        .context("Configuration validation failed")?;

    println!("{}", "✓ Configuration is valid".green());

    Ok(())
}

async fn generate(output: PathBuf, with_examples: bool) -> Result<()> {
    let sample = if with_examples {
        include_str!("../../templates/config-with-examples.yaml").to_string()
    } else {
        DashboardConfig::default().to_yaml_string()?
    };

    std::fs::write(&output, sample)
        .with_context(|| format!("Failed to write config to {:?}", output))?;

    println!(
        "{}",
        format!("✓ Configuration generated: {}", output.display()).green()
    );

    Ok(())
}
