//! Playback handlers.

use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};

/// Seek request.
#[derive(Debug, Deserialize)]
pub struct SeekRequest {
    #[serde(default)]
    pub timestamp: Option<f64>,
}

/// Seek acknowledgment.
#[derive(Serialize)]
pub struct SeekResponse {
    pub status: String,
    pub timestamp: f64,
}

/// Acknowledge a seek request from the front-end.
///
/// Playback itself happens client-side against the served upload; this
/// endpoint only echoes the target position back.
pub async fn seek(Json(request): Json<SeekRequest>) -> ApiResult<Json<SeekResponse>> {
    let timestamp = request
        .timestamp
        .ok_or_else(|| ApiError::validation("timestamp is required"))?;

    Ok(Json(SeekResponse {
        status: "success".to_string(),
        timestamp,
    }))
}
