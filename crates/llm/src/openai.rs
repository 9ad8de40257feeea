//! Blocking client for an OpenAI-compatible chat-completions endpoint.
//!
//! Each [`generate`](crate::TextGenerator::generate) call is one HTTP
//! round-trip; transient failures are retried with exponential backoff up
//! to the configured limit.

use crate::{GenerationRequest, GenerationResponse, LlmError, TextGenerator, TokenUsage};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::thread;
use std::time::Duration;

/// Default chat-completions base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gpt-oss-120b";

/// Fallback retry delay when a rate-limit response carries no hint.
const DEFAULT_RETRY_AFTER_SECS: u32 = 30;

/// Configuration for [`OpenAiClient`].
#[derive(Clone)]
pub struct OpenAiConfig {
    api_key: String,
    /// Base URL of the chat-completions API.
    pub base_url: String,
    /// Model used when a request carries no override.
    pub model: String,
    /// Per-call deadline.
    pub timeout: Duration,
    /// Maximum retries on transient failures.
    pub max_retries: u32,
}

impl OpenAiConfig {
    /// Create a configuration with the given API key and defaults.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(60),
            max_retries: 3,
        }
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the default model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the per-call deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry limit.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    fn api_key(&self) -> &str {
        &self.api_key
    }
}

// The key never appears in debug output.
impl fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

/// Blocking chat-completions client.
pub struct OpenAiClient {
    config: OpenAiConfig,
    client: reqwest::blocking::Client,
}

impl OpenAiClient {
    /// Build a client from configuration.
    pub fn new(config: OpenAiConfig) -> Result<Self, LlmError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn send_request(
        &self,
        request: &GenerationRequest,
    ) -> Result<reqwest::blocking::Response, LlmError> {
        let model = request.model.as_deref().unwrap_or(&self.config.model);
        let body = ChatRequest {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            max_tokens: request.max_tokens,
            stream: false,
        };

        self.client
            .post(self.completions_url())
            .bearer_auth(self.config.api_key())
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    LlmError::Network(format!("connection failed: {e}"))
                } else {
                    LlmError::Network(e.to_string())
                }
            })
    }

    fn handle_status(
        &self,
        response: reqwest::blocking::Response,
    ) -> Result<reqwest::blocking::Response, LlmError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok());
        let body = response.text().unwrap_or_default();

        Err(map_status(status.as_u16(), retry_after, body))
    }
}

/// Map an error status to the failure taxonomy.
fn map_status(status: u16, retry_after: Option<u32>, body: String) -> LlmError {
    match status {
        401 | 403 => LlmError::AuthenticationFailed,
        429 => LlmError::RateLimited {
            retry_after_secs: retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS),
        },
        400 | 404 | 422 => LlmError::InvalidRequest(body),
        500..=599 => LlmError::Unavailable(format!("server error {status}: {body}")),
        _ => LlmError::Network(format!("unexpected status {status}: {body}")),
    }
}

/// Parse a chat-completions response body.
fn parse_body(body: &str) -> Result<GenerationResponse, LlmError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| LlmError::Parse(format!("failed to decode response: {e}")))?;

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::Parse("response has no choices".to_string()))?;
    let text = choice
        .message
        .content
        .ok_or_else(|| LlmError::Parse("response message has no content".to_string()))?;

    let usage = TokenUsage {
        prompt_tokens: response.usage.prompt_tokens,
        completion_tokens: response.usage.completion_tokens,
        total_tokens: response.usage.total_tokens,
    };

    Ok(GenerationResponse { text, usage })
}

impl TextGenerator for OpenAiClient {
    fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, LlmError> {
        let mut attempt = 0;

        loop {
            let result = self
                .send_request(request)
                .and_then(|response| self.handle_status(response))
                .and_then(|response| {
                    let body = response
                        .text()
                        .map_err(|e| LlmError::Network(format!("failed to read body: {e}")))?;
                    parse_body(&body)
                });

            match result {
                Ok(response) => {
                    log::debug!(
                        "generation used {} prompt + {} completion = {} tokens",
                        response.usage.prompt_tokens,
                        response.usage.completion_tokens,
                        response.usage.total_tokens
                    );
                    return Ok(response);
                }
                Err(err) => {
                    if !err.is_retryable() || attempt >= self.config.max_retries {
                        return Err(err);
                    }
                    // Exponential backoff: 1s, 2s, 4s, ...
                    let delay = Duration::from_secs(1 << attempt);
                    log::warn!("generation call failed ({err}), retrying in {delay:?}");
                    thread::sleep(delay);
                    attempt += 1;
                }
            }
        }
    }
}

// ----- Wire types -----

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: ChatUsage,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder_works() {
        let config = OpenAiConfig::new("key")
            .with_base_url("https://example.test/v1")
            .with_model("other-model")
            .with_timeout(Duration::from_secs(30))
            .with_max_retries(5);

        assert_eq!(config.base_url, "https://example.test/v1");
        assert_eq!(config.model, "other-model");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.api_key(), "key");
    }

    #[test]
    fn config_debug_redacts_key() {
        let config = OpenAiConfig::new("super-secret");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn completions_url_joins_cleanly() {
        let client =
            OpenAiClient::new(OpenAiConfig::new("k").with_base_url("https://api.test/v1/")).unwrap();
        assert_eq!(client.completions_url(), "https://api.test/v1/chat/completions");
    }

    #[test]
    fn parse_body_extracts_text_and_usage() {
        let body = r##"{
            "choices": [{"message": {"role": "assistant", "content": "# Outline"}}],
            "usage": {"prompt_tokens": 120, "completion_tokens": 80, "total_tokens": 200}
        }"##;

        let response = parse_body(body).unwrap();
        assert_eq!(response.text, "# Outline");
        assert_eq!(response.usage, TokenUsage::new(120, 80));
    }

    #[test]
    fn parse_body_rejects_missing_choices() {
        let body = r#"{"choices": [], "usage": {"prompt_tokens": 1, "completion_tokens": 0, "total_tokens": 1}}"#;
        let err = parse_body(body).unwrap_err();
        assert!(matches!(err, LlmError::Parse(_)));
    }

    #[test]
    fn parse_body_rejects_missing_content() {
        let body = r#"{
            "choices": [{"message": {"role": "assistant"}}],
            "usage": {"prompt_tokens": 1, "completion_tokens": 0, "total_tokens": 1}
        }"#;
        let err = parse_body(body).unwrap_err();
        assert!(matches!(err, LlmError::Parse(_)));
    }

    #[test]
    fn parse_body_rejects_missing_usage() {
        let body = r#"{"choices": [{"message": {"content": "hi"}}]}"#;
        assert!(matches!(parse_body(body), Err(LlmError::Parse(_))));
    }

    #[test]
    fn map_status_covers_taxonomy() {
        assert!(matches!(
            map_status(401, None, String::new()),
            LlmError::AuthenticationFailed
        ));
        assert!(matches!(
            map_status(429, Some(10), String::new()),
            LlmError::RateLimited {
                retry_after_secs: 10
            }
        ));
        assert!(matches!(
            map_status(429, None, String::new()),
            LlmError::RateLimited {
                retry_after_secs: DEFAULT_RETRY_AFTER_SECS
            }
        ));
        assert!(matches!(
            map_status(400, None, "bad".into()),
            LlmError::InvalidRequest(_)
        ));
        assert!(matches!(
            map_status(503, None, String::new()),
            LlmError::Unavailable(_)
        ));
    }
}
