//! Analysis workflow handlers.
//!
//! `POST /analyze/` validates the request, takes the single-flight guard
//! and runs the detection pipeline as a background task; the permit travels
//! into the task so the guard resets on every completion path. `GET
//! /status/` and `GET /events/` poll the run state and the latest log.

use std::path::PathBuf;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use hoopsight_models::DetectedEvent;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Request to analyze an uploaded video.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub video_path: Option<String>,
}

/// Response for a started analysis.
#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub status: String,
    pub message: String,
}

/// Start analyzing a video in the background.
///
/// Validation happens before the guard is taken: a missing path never
/// consumes the single-flight slot.
pub async fn analyze_video(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> ApiResult<Json<AnalyzeResponse>> {
    let video_path = request
        .video_path
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| ApiError::validation("video_path is required"))?;
    let video_path = PathBuf::from(video_path);

    if tokio::fs::metadata(&video_path).await.is_err() {
        return Err(ApiError::not_found(format!(
            "Video not found: {}",
            video_path.display()
        )));
    }

    let permit = state
        .jobs
        .try_begin()
        .ok_or(ApiError::AnalysisInProgress)?;

    let run_id = Uuid::new_v4().to_string();
    info!(run_id = %run_id, video = %video_path.display(), "Starting analysis run");

    let pipeline = state.pipeline.clone();
    let store = state.store.clone();
    tokio::spawn(async move {
        // Permit lives for the duration of the task; dropping it returns
        // the guard to idle on success, error and panic alike.
        let _permit = permit;

        match pipeline.run(&video_path).await {
            Ok(events) => {
                info!(
                    run_id = %run_id,
                    events = events.len(),
                    "Analysis run complete"
                );
                hoopsight_engine::metrics::record_run_completed(true);
                store.replace(events).await;
            }
            Err(e) => {
                error!(run_id = %run_id, error = %e, "Analysis run failed");
                hoopsight_engine::metrics::record_run_completed(false);
            }
        }
    });

    Ok(Json(AnalyzeResponse {
        status: "started".to_string(),
        message: "Analysis started in the background".to_string(),
    }))
}

/// Current event log (empty before the first completed run).
pub async fn get_events(State(state): State<AppState>) -> Json<Vec<DetectedEvent>> {
    Json(state.store.snapshot().as_ref().clone())
}

/// Job-state poll response.
#[derive(Serialize)]
pub struct StatusResponse {
    pub analyzing: bool,
}

/// Whether an analysis run is currently in flight.
pub async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        analyzing: state.jobs.is_running(),
    })
}
