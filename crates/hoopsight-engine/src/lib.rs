//! Frame-triplet action detection pipeline.
//!
//! This crate provides:
//! - An OpenAI vision client for per-triplet action classification
//! - Temporal deduplication of detections with a per-kind cooldown
//! - The sequential pipeline driver composing sampler and detector
//! - The event store holding the latest completed run
//! - Chat-responder helpers backed by the same client

pub mod chat;
pub mod config;
pub mod dedup;
pub mod error;
pub mod metrics;
pub mod openai;
pub mod pipeline;
pub mod store;

pub use chat::{format_events_summary, ANALYSIS_RUNNING_REPLY, NO_EVENTS_REPLY};
pub use config::EngineConfig;
pub use dedup::CooldownFilter;
pub use error::{EngineError, EngineResult};
pub use openai::OpenAiClient;
pub use pipeline::{ActionDetector, AnalysisPipeline, FfmpegFrameSource, FrameSource};
pub use store::EventStore;
