//! Chatbot handler.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::warn;

use hoopsight_engine::{format_events_summary, ANALYSIS_RUNNING_REPLY, NO_EVENTS_REPLY};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Chat request.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

/// Chat response.
#[derive(Serialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Answer a user question about the detected events.
///
/// Blocked while an analysis run is in flight; short-circuits with a fixed
/// reply when there is nothing to talk about yet. Both short circuits skip
/// the model call entirely.
pub async fn chatbot(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> ApiResult<Json<ChatResponse>> {
    let message = request
        .message
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| ApiError::validation("message is required"))?;

    if state.jobs.is_running() {
        return Ok(Json(ChatResponse {
            response: ANALYSIS_RUNNING_REPLY.to_string(),
        }));
    }

    let events = state.store.snapshot();
    if events.is_empty() {
        return Ok(Json(ChatResponse {
            response: NO_EVENTS_REPLY.to_string(),
        }));
    }

    let summary = format_events_summary(&events);
    let response = state
        .client
        .analyst_reply(&summary, &message)
        .await
        .map_err(|e| {
            warn!(error = %e, "Chat completion failed");
            ApiError::from(e)
        })?;

    Ok(Json(ChatResponse { response }))
}
