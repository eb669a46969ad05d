//! Application state.

use std::sync::Arc;

use hoopsight_engine::{
    ActionDetector, AnalysisPipeline, EngineConfig, EventStore, FfmpegFrameSource, OpenAiClient,
};

use crate::config::ApiConfig;
use crate::jobs::JobGuard;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub client: Arc<OpenAiClient>,
    pub pipeline: Arc<AnalysisPipeline>,
    pub store: Arc<EventStore>,
    pub jobs: Arc<JobGuard>,
}

impl AppState {
    /// Create new application state.
    ///
    /// Fails when the OpenAI credential is missing (fatal at startup) or
    /// the upload directory cannot be created.
    pub async fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let engine_config = EngineConfig::from_env();
        let client = Arc::new(OpenAiClient::new(&engine_config)?);

        let source = Arc::new(FfmpegFrameSource::new(engine_config.frame_stride));
        let pipeline = Arc::new(AnalysisPipeline::new(
            source,
            Arc::clone(&client) as Arc<dyn ActionDetector>,
            &engine_config,
        ));

        let store = Arc::new(EventStore::new(Some(config.events_file.clone())));

        tokio::fs::create_dir_all(&config.upload_dir).await?;

        Ok(Self {
            config,
            client,
            pipeline,
            store,
            jobs: JobGuard::new(),
        })
    }
}
