// SPDX-FileCopyrightText: 2026 Haku Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway REST API.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use haku_core::{
    AgentScope, HakuError, Mode, Organ, PrivacyTier, Query, ResponsePayload, TaskClass,
    ValidationResult,
};

use crate::server::GatewayState;

/// Request body for POST /v1/chat, /v1/route and /v1/merge.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueryRequest {
    /// The operator's query text.
    pub message: String,
    /// Caller-supplied privacy tier floor (0-3).
    #[serde(default)]
    pub sensitivity: Option<PrivacyTier>,
    /// Extra context appended to the prompt.
    #[serde(default)]
    pub context: Option<String>,
    /// Workstream whose agent definitions apply. Wins over `group`.
    #[serde(default)]
    pub workstream: Option<String>,
    /// Group whose agent definitions apply.
    #[serde(default)]
    pub group: Option<String>,
}

impl QueryRequest {
    /// Convert into a pipeline query. Blank messages are rejected.
    pub fn into_query(self) -> Result<Query, ApiError> {
        if self.message.trim().is_empty() {
            return Err(ApiError::bad_request("message must not be empty"));
        }
        let mut query = Query::new(self.message);
        query.sensitivity_hint = self.sensitivity;
        query.context = self.context.filter(|c| !c.trim().is_empty());
        query.scope = match (self.workstream, self.group) {
            (Some(ws), _) => Some(AgentScope::Workstream(ws)),
            (None, Some(group)) => Some(AgentScope::Group(group)),
            (None, None) => None,
        };
        Ok(query)
    }
}

/// Request body for POST /v1/validate.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidateRequest {
    pub text: String,
}

/// Response body for POST /v1/route.
#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub task_class: TaskClass,
    pub mode: Mode,
    pub privacy_tier: PrivacyTier,
    pub organ: Organ,
    pub ai_engine: String,
    pub rationale: String,
    pub local_only: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Engine ids the gateway can reach.
    pub engines: Vec<String>,
    pub uptime_secs: u64,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// A handler failure with its HTTP status.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<HakuError> for ApiError {
    fn from(err: HakuError) -> Self {
        // Engine failures are upstream problems; everything else is ours.
        let status = match &err {
            HakuError::Provider { .. } | HakuError::EngineNotFound(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        warn!(status = status.as_u16(), error = %err, "request failed");
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

/// GET /health
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    let mut engines = state.pipeline.engine_ids();
    engines.sort();
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        engines,
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// POST /v1/chat
///
/// Runs the full pipeline and returns the transport payload.
pub async fn post_chat(
    State(state): State<GatewayState>,
    Json(body): Json<QueryRequest>,
) -> Result<Json<ResponsePayload>, ApiError> {
    let query = body.into_query()?;
    let payload = state.pipeline.process(&query).await?;
    Ok(Json(payload))
}

/// POST /v1/route
///
/// Classifies and routes without invoking an engine.
pub async fn post_route(
    State(state): State<GatewayState>,
    Json(body): Json<QueryRequest>,
) -> Result<Json<RouteResponse>, ApiError> {
    let query = body.into_query()?;
    let routed = state.pipeline.classify_and_route(&query).await?;
    Ok(Json(RouteResponse {
        task_class: routed.classification.task_class,
        mode: routed.classification.mode,
        privacy_tier: routed.classification.tier,
        organ: routed.decision.organ,
        ai_engine: routed.decision.engine_id,
        rationale: routed.decision.rationale,
        local_only: routed.decision.local_only,
        agent: routed.decision.agent,
    }))
}

/// POST /v1/validate
pub async fn post_validate(
    State(state): State<GatewayState>,
    Json(body): Json<ValidateRequest>,
) -> Json<ValidationResult> {
    Json(state.pipeline.validate(&body.text))
}

/// POST /v1/merge
pub async fn post_merge(
    State(state): State<GatewayState>,
    Json(body): Json<QueryRequest>,
) -> Result<Json<ResponsePayload>, ApiError> {
    let query = body.into_query()?;
    let payload = state.pipeline.merge_all(&query).await?;
    Ok(Json(payload))
}
