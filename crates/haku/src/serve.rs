// SPDX-FileCopyrightText: 2026 Haku Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `haku serve` command implementation.
//!
//! Builds the pipeline once from the loaded config and serves it over the
//! HTTP gateway until SIGINT or SIGTERM.

use std::sync::Arc;

use haku_config::HakuConfig;
use haku_core::HakuError;
use haku_gateway::{GatewayState, start_server};
use tracing::info;

use crate::commands::build_pipeline;

pub async fn run_serve(
    config: Arc<HakuConfig>,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), HakuError> {
    let mut gateway = config.gateway.clone();
    if let Some(host) = host {
        gateway.host = host;
    }
    if let Some(port) = port {
        gateway.port = port;
    }

    info!(
        name = config.agent.name.as_str(),
        host = gateway.host.as_str(),
        port = gateway.port,
        "starting haku serve"
    );

    let pipeline = build_pipeline(config)?;
    start_server(&gateway, GatewayState::new(pipeline), shutdown_signal()).await
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "cannot listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    info!("shutdown signal received");
}
