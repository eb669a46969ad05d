//! Engine configuration.

use hoopsight_media::DEFAULT_FRAME_STRIDE;

/// Minimum gap between two accepted events of the same kind, in seconds.
pub const DEFAULT_COOLDOWN_SECONDS: f64 = 1.5;

/// Detection pipeline configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Keep one decoded frame out of every `frame_stride`
    pub frame_stride: u64,
    /// Per-kind deduplication window in seconds
    pub cooldown_seconds: f64,
    /// Chat-completions model used for both detection and chat
    pub model: String,
    /// Completion token cap per request
    pub max_tokens: u32,
    /// API base URL (overridable for tests)
    pub api_base: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            frame_stride: DEFAULT_FRAME_STRIDE,
            cooldown_seconds: DEFAULT_COOLDOWN_SECONDS,
            model: "gpt-4o-mini".to_string(),
            max_tokens: 300,
            api_base: "https://api.openai.com/v1".to_string(),
        }
    }
}

impl EngineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            frame_stride: std::env::var("FRAME_STRIDE")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|&n| n > 0)
                .unwrap_or(defaults.frame_stride),
            cooldown_seconds: std::env::var("EVENT_COOLDOWN_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.cooldown_seconds),
            model: std::env::var("OPENAI_MODEL").unwrap_or(defaults.model),
            max_tokens: std::env::var("OPENAI_MAX_TOKENS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_tokens),
            api_base: std::env::var("OPENAI_API_BASE").unwrap_or(defaults.api_base),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.frame_stride, 15);
        assert_eq!(config.cooldown_seconds, 1.5);
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.max_tokens, 300);
    }
}
