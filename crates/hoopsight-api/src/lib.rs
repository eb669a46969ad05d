//! Axum HTTP API server.
//!
//! This crate provides:
//! - Upload, analyze, status, events, seek and chatbot endpoints
//! - Single-flight guard around the analysis pipeline
//! - CORS, body limits, request logging and Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod jobs;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use jobs::JobGuard;
pub use routes::create_router;
pub use state::AppState;
