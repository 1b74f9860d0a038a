// Copyright (c) 2026 Agent Dashboard Contributors
// SPDX-License-Identifier: AGPL-3.0

//! # Agent Dashboard CLI
//!
//! The `agent-dashboard` binary runs the dashboard server and talks to a
//! running one.
//!
//! ## Commands
//!
//! - `agent-dashboard serve` - Run the HTTP server
//! - `agent-dashboard migrate` - Apply database migrations
//! - `agent-dashboard config show|validate|generate` - Configuration management
//! - `agent-dashboard agent list|show|upsert|delete` - Agent operations against a server

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;

use agent_dashboard::commands::{self, agent::ServerArgs, AgentCommand, ConfigCommand};

/// Agent Dashboard - manage agents and the tools attached to them
#[derive(Parser)]
#[command(name = "agent-dashboard")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "AGENT_DASHBOARD_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Log output format
    #[arg(long, global = true, env = "AGENT_DASHBOARD_LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Compact,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the dashboard HTTP server
    #[command(name = "serve")]
    Serve {
        /// Override spec.server.port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Apply pending database migrations
    #[command(name = "migrate")]
    Migrate,

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Agent management
    #[command(name = "agent")]
    Agent {
        #[command(flatten)]
        server: ServerArgs,

        #[command(subcommand)]
        command: AgentCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is normal
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    init_logging(&cli.log_level, cli.log_format)?;

    match cli.command {
        Some(Commands::Serve { port }) => commands::serve::execute(cli.config, port).await,
        Some(Commands::Migrate) => commands::migrate::execute(cli.config).await,
        Some(Commands::Config { command }) => {
            commands::config::handle_command(command, cli.config).await
        }
        Some(Commands::Agent { server, command }) => {
            commands::agent::handle_command(command, server, cli.config).await
        }
        None => {
            eprintln!("{}", "No command specified. Use --help for usage.".yellow());
            std::process::exit(1);
        }
    }
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str, format: LogFormat) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    match format {
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Json => builder.json().init(),
    }

    Ok(())
}
