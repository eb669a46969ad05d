//! OpenAI chat-completions client.
//!
//! One client serves both pipeline stages that talk to the model: the
//! per-triplet action detector (frames in, structured JSON out) and the
//! analyst chat responder (event summary + user question in, prose out).

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use hoopsight_media::SampledFrame;
use hoopsight_models::{DetectedEvent, EventKind};

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::metrics;

/// System instruction for the action detector. Constrains the output to the
/// structured JSON shape and forbids invented timestamps.
const DETECTION_SYSTEM_PROMPT: &str = "You are an AI that detects basketball actions (shoot, pass) from images. \
     You MUST use the given timestamp as the 'time' value in the output. \
     Respond only in the following JSON format: \
     {\"actions\": [{\"time\": <provided_timestamp>, \"event\": \"<shoot_or_pass>\"}]}. \
     DO NOT make up timestamps; use ONLY the provided one.";

/// System persona for the chat responder.
const CHAT_SYSTEM_PROMPT: &str =
    "You are a basketball analyst assistant. Use provided game events to enhance responses.";

/// OpenAI API client.
pub struct OpenAiClient {
    api_key: String,
    api_base: String,
    model: String,
    max_tokens: u32,
    client: Client,
}

/// Chat-completions request.
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: MessageContent,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

/// Chat-completions response.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Structured detector output.
#[derive(Debug, Deserialize)]
struct ActionsPayload {
    #[serde(default)]
    actions: Vec<RawAction>,
}

// The model is instructed to echo the supplied timestamp; the supplied one
// stays authoritative, so only the event field is read back.
#[derive(Debug, Deserialize)]
struct RawAction {
    event: String,
}

impl OpenAiClient {
    /// Create a new client. Fails when `OPENAI_API_KEY` is absent.
    pub fn new(config: &EngineConfig) -> EngineResult<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| EngineError::config_error("OPENAI_API_KEY not set"))?;

        Ok(Self {
            api_key,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            client: Client::new(),
        })
    }

    /// Classify one frame triplet.
    ///
    /// Returns zero or more detections, all attributed to `timestamp` (the
    /// timestamp of the first frame in the triplet). A malformed response
    /// body yields zero events; that outcome is logged and counted, and the
    /// run continues. Transport and API failures propagate.
    pub async fn detect_actions(
        &self,
        triplet: [&SampledFrame; 3],
        timestamp: f64,
    ) -> EngineResult<Vec<DetectedEvent>> {
        let mut parts = vec![ContentPart::Text {
            text: format!(
                "Analyze these frames and determine if any basketball player performs a \
                 'shoot' or 'pass' action. Use {} as the 'time' value. \
                 Return the result strictly in JSON format.",
                timestamp
            ),
        }];
        for frame in triplet {
            parts.push(ContentPart::ImageUrl {
                image_url: ImageUrl {
                    url: format!("data:image/jpeg;base64,{}", BASE64.encode(&frame.jpeg)),
                },
            });
        }

        let messages = vec![
            ChatMessage {
                role: "system",
                content: MessageContent::Text(DETECTION_SYSTEM_PROMPT.to_string()),
            },
            ChatMessage {
                role: "user",
                content: MessageContent::Parts(parts),
            },
        ];

        metrics::record_detector_call();
        let text = self.chat_completion(messages).await?;

        Ok(parse_actions(&text, timestamp))
    }

    /// Answer a user question about the detected events.
    pub async fn analyst_reply(
        &self,
        events_summary: &str,
        user_message: &str,
    ) -> EngineResult<String> {
        let messages = vec![
            ChatMessage {
                role: "system",
                content: MessageContent::Text(CHAT_SYSTEM_PROMPT.to_string()),
            },
            ChatMessage {
                role: "user",
                content: MessageContent::Text(format!(
                    "Here are the detected basketball events:\n{}\n\nUser question: {}",
                    events_summary, user_message
                )),
            },
        ];

        self.chat_completion(messages).await
    }

    /// Call the chat-completions API and return the first choice's text.
    async fn chat_completion(&self, messages: Vec<ChatMessage>) -> EngineResult<String> {
        let url = format!("{}/chat/completions", self.api_base);

        let request = ChatRequest {
            model: self.model.clone(),
            messages,
            temperature: 1.0,
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| EngineError::ai_failed(format!("OpenAI API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(EngineError::ai_failed(format!(
                "OpenAI API returned {}: {}",
                status, error_text
            )));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| EngineError::ai_failed(format!("Failed to parse OpenAI response: {}", e)))?;

        let text = chat_response
            .choices
            .first()
            .map(|c| c.message.content.trim())
            .ok_or_else(|| EngineError::ai_failed("No content in OpenAI response"))?;

        Ok(text.to_string())
    }
}

/// Parse the detector's response text into detections.
///
/// Strips markdown code fences, parses the `{"actions": [...]}` payload and
/// attributes every entry to `timestamp`. Entries whose `event` is not a
/// recognized kind are skipped. A body that fails to parse yields an empty
/// list; the failure is logged and counted rather than silently discarded.
fn parse_actions(text: &str, timestamp: f64) -> Vec<DetectedEvent> {
    let payload: ActionsPayload = match serde_json::from_str(strip_code_fences(text)) {
        Ok(p) => p,
        Err(e) => {
            metrics::record_parse_failure();
            warn!(error = %e, "Detector returned unparseable payload; treating as zero events");
            return Vec::new();
        }
    };

    payload
        .actions
        .iter()
        .filter_map(|action| match action.event.parse::<EventKind>() {
            Ok(kind) => Some(DetectedEvent::new(timestamp, kind)),
            Err(_) => {
                debug!(event = %action.event, "Skipping unrecognized action kind");
                None
            }
        })
        .collect()
}

/// Strip a markdown code fence (```json ... ```) wrapping, if present.
fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let text = text.strip_prefix("```json").unwrap_or(text);
    let text = text.strip_prefix("```").unwrap_or(text);
    let text = text.strip_suffix("```").unwrap_or(text);
    text.trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn frame(timestamp: f64) -> SampledFrame {
        SampledFrame {
            index: 0,
            timestamp,
            jpeg: vec![0xff, 0xd8, 0xff, 0xd9],
        }
    }

    fn test_client(api_base: &str) -> OpenAiClient {
        std::env::set_var("OPENAI_API_KEY", "test-key");
        let config = EngineConfig {
            api_base: api_base.to_string(),
            ..EngineConfig::default()
        };
        OpenAiClient::new(&config).unwrap()
    }

    fn completion_body(content: &str) -> serde_json::Value {
        serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        })
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("  {\"a\":1}  "), "{\"a\":1}");
    }

    #[test]
    fn test_parse_actions_uses_supplied_timestamp() {
        // The echoed time is ignored even when the model invents one.
        let events = parse_actions(
            r#"{"actions": [{"time": 99.0, "event": "shoot"}]}"#,
            2.5,
        );
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].time, 2.5);
        assert_eq!(events[0].event, EventKind::Shoot);
    }

    #[test]
    fn test_parse_actions_skips_unknown_kinds() {
        let events = parse_actions(
            r#"{"actions": [{"time": 1.0, "event": "dunk"}, {"time": 1.0, "event": "pass"}]}"#,
            1.0,
        );
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, EventKind::Pass);
    }

    #[test]
    fn test_parse_actions_malformed_is_empty() {
        assert!(parse_actions("the players are dribbling", 0.0).is_empty());
        assert!(parse_actions("{\"actions\": \"none\"}", 0.0).is_empty());
        assert!(parse_actions("{}", 0.0).is_empty());
    }

    #[test]
    fn test_parse_actions_fenced_payload() {
        let events = parse_actions(
            "```json\n{\"actions\": [{\"time\": 0.0, \"event\": \"pass\"}]}\n```",
            0.0,
        );
        assert_eq!(events.len(), 1);
    }

    #[tokio::test]
    async fn test_detect_actions_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
                r#"{"actions": [{"time": 3.0, "event": "shoot"}]}"#,
            )))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let frames = [frame(3.0), frame(3.5), frame(4.0)];
        let events = client
            .detect_actions([&frames[0], &frames[1], &frames[2]], 3.0)
            .await
            .unwrap();

        assert_eq!(events, vec![DetectedEvent::new(3.0, EventKind::Shoot)]);
    }

    #[tokio::test]
    async fn test_detect_actions_unparseable_body_is_zero_events() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion_body("I cannot classify these frames.")),
            )
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let frames = [frame(0.0), frame(0.5), frame(1.0)];
        let events = client
            .detect_actions([&frames[0], &frames[1], &frames[2]], 0.0)
            .await
            .unwrap();

        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn test_api_error_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let frames = [frame(0.0), frame(0.5), frame(1.0)];
        let err = client
            .detect_actions([&frames[0], &frames[1], &frames[2]], 0.0)
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::AiFailed(_)));
    }
}
