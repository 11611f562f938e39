// SPDX-FileCopyrightText: 2026 Haku Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::future::Future;
use std::time::Instant;

use axum::{
    Router,
    routing::{get, post},
};
use haku_agent::Pipeline;
use haku_config::model::GatewayConfig;
use haku_core::HakuError;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// The query pipeline every request runs through.
    pub pipeline: Pipeline,
    /// Process start time for uptime reporting.
    pub start_time: Instant,
}

impl GatewayState {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline,
            start_time: Instant::now(),
        }
    }
}

/// Build the gateway router.
///
/// - GET /health
/// - POST /v1/chat
/// - POST /v1/route
/// - POST /v1/validate
/// - POST /v1/merge
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/health", get(handlers::get_health))
        .route("/v1/chat", post(handlers::post_chat))
        .route("/v1/route", post(handlers::post_route))
        .route("/v1/validate", post(handlers::post_validate))
        .route("/v1/merge", post(handlers::post_merge))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Bind to the configured host:port and serve until `shutdown` resolves.
pub async fn start_server<F>(
    config: &GatewayConfig,
    state: GatewayState,
    shutdown: F,
) -> Result<(), HakuError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        HakuError::Io(std::io::Error::new(
            e.kind(),
            format!("failed to bind gateway to {addr}: {e}"),
        ))
    })?;

    tracing::info!(
        addr = addr.as_str(),
        engines = state.pipeline.engine_ids().len(),
        "gateway listening"
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("gateway stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use haku_config::HakuConfig;
    use haku_test_utils::MockEngine;

    use super::*;

    fn state() -> GatewayState {
        let pipeline = Pipeline::new(
            Arc::new(HakuConfig::default()),
            Arc::new(MockEngine::with_default_engines()),
        )
        .unwrap();
        GatewayState::new(pipeline)
    }

    #[test]
    fn gateway_state_is_clone() {
        let cloned = state().clone();
        assert_eq!(cloned.pipeline.engine_ids().len(), 5);
    }

    #[tokio::test]
    async fn server_stops_on_shutdown_signal() {
        let config = GatewayConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        };
        start_server(&config, state(), async {}).await.unwrap();
    }
}
