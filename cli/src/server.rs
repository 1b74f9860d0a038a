// Copyright (c) 2026 Agent Dashboard Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Dashboard HTTP server

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use agent_dashboard_core::application::repository_factory::create_agent_repository;
use agent_dashboard_core::application::UpsertPolicy;
use agent_dashboard_core::domain::config::DashboardConfig;
use agent_dashboard_core::presentation::{app, AppState};

pub async fn run_server(config: DashboardConfig) -> Result<()> {
    config
        .validate()
        .context("Configuration validation failed")?;

    info!(
        "Configuration loaded: deployment={}",
        config.metadata.name
    );

    if let Some(address) = config
        .spec
        .observability
        .as_ref()
        .and_then(|o| o.metrics_address.as_deref())
    {
        install_metrics_exporter(address)?;
    }

    let backend = config.storage_backend()?;
    let repository = create_agent_repository(&backend)
        .await
        .context("Failed to initialize agent storage")?;

    let state = AppState::new(
        repository,
        UpsertPolicy::from(&config.spec.agents),
        config.spec.server.requester_header.clone(),
    );
    let router = app(state);

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Dashboard listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Dashboard shutting down");

    Ok(())
}

fn install_metrics_exporter(address: &str) -> Result<()> {
    let socket: SocketAddr = address
        .parse()
        .with_context(|| format!("Invalid metrics address: {}", address))?;

    PrometheusBuilder::new()
        .with_http_listener(socket)
        .install()
        .context("Failed to install Prometheus exporter")?;

    info!("Prometheus metrics exposed on {}", socket);
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
