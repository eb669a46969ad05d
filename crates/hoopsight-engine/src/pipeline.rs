//! Analysis pipeline driver.
//!
//! Composes a frame source and an action detector into the full run:
//! sample frames, classify each sliding triplet, fold the detections
//! through the cooldown filter. The fold is strictly sequential: window
//! `i+1` sees the cooldown state mutated by window `i`, and reordering
//! would change which detections survive.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use hoopsight_media::SampledFrame;
use hoopsight_models::{DetectedEvent, EventLog};

use crate::config::EngineConfig;
use crate::dedup::CooldownFilter;
use crate::error::EngineResult;
use crate::metrics;
use crate::openai::OpenAiClient;

/// Source of sampled frames for a video file.
#[async_trait]
pub trait FrameSource: Send + Sync {
    async fn sample(&self, path: &Path) -> EngineResult<Vec<SampledFrame>>;
}

/// Per-triplet action classifier.
#[async_trait]
pub trait ActionDetector: Send + Sync {
    async fn detect(
        &self,
        triplet: [&SampledFrame; 3],
        timestamp: f64,
    ) -> EngineResult<Vec<DetectedEvent>>;
}

/// FFmpeg-backed frame source with a fixed stride.
pub struct FfmpegFrameSource {
    stride: u64,
}

impl FfmpegFrameSource {
    pub fn new(stride: u64) -> Self {
        Self { stride }
    }
}

#[async_trait]
impl FrameSource for FfmpegFrameSource {
    async fn sample(&self, path: &Path) -> EngineResult<Vec<SampledFrame>> {
        Ok(hoopsight_media::sample_frames(path, self.stride).await?)
    }
}

#[async_trait]
impl ActionDetector for OpenAiClient {
    async fn detect(
        &self,
        triplet: [&SampledFrame; 3],
        timestamp: f64,
    ) -> EngineResult<Vec<DetectedEvent>> {
        self.detect_actions(triplet, timestamp).await
    }
}

/// End-to-end detection pipeline for one video.
pub struct AnalysisPipeline {
    source: Arc<dyn FrameSource>,
    detector: Arc<dyn ActionDetector>,
    cooldown_seconds: f64,
}

impl AnalysisPipeline {
    pub fn new(
        source: Arc<dyn FrameSource>,
        detector: Arc<dyn ActionDetector>,
        config: &EngineConfig,
    ) -> Self {
        Self {
            source,
            detector,
            cooldown_seconds: config.cooldown_seconds,
        }
    }

    /// Run the pipeline end-to-end and return the deduplicated event log.
    ///
    /// Fewer than three sampled frames produce an empty log. Detector
    /// transport failures abort the run and propagate.
    pub async fn run(&self, path: &Path) -> EngineResult<EventLog> {
        let frames = self.source.sample(path).await?;

        if frames.len() < 3 {
            info!(
                video = %path.display(),
                frames = frames.len(),
                "Not enough frames for a triplet; producing empty event log"
            );
            return Ok(EventLog::new());
        }

        let mut log = EventLog::new();
        let mut filter = CooldownFilter::new(self.cooldown_seconds);

        for window in frames.windows(3) {
            let timestamp = window[0].timestamp;
            let detections = self
                .detector
                .detect([&window[0], &window[1], &window[2]], timestamp)
                .await?;

            for event in detections {
                if filter.accept(&event) {
                    metrics::record_event_accepted(event.event.as_str());
                    log.push(event);
                } else {
                    metrics::record_event_suppressed(event.event.as_str());
                    debug!(
                        time = event.time,
                        kind = %event.event,
                        "Detection suppressed by cooldown window"
                    );
                }
            }
        }

        info!(
            video = %path.display(),
            events = log.len(),
            "Analysis pipeline complete"
        );

        Ok(log)
    }
}
