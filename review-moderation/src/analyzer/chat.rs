//! OpenAI-compatible chat-completions analyzer.
//!
//! Works against any `/v1/chat/completions` endpoint (Groq by default).
//! The model's reply is expected to be a JSON object, optionally wrapped in a
//! fenced code block.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{Duration, Instant};

use review_common::util::{sanitize_for_log, truncate_with_ellipsis};
use review_common::AnalyzerConfig;

use super::prompt::render_prompt;
use super::{AnalyzerError, SemanticAnalyzer};

/// Semantic analyzer backed by a chat-completions model.
pub struct ChatCompletionsAnalyzer {
    base_url: String,
    api_key: Option<String>,
    model: String,
    temperature: f64,
    max_tokens: u32,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionsAnalyzer {
    /// Create an analyzer for `model` at `base_url`.
    pub fn new(base_url: &str, api_key: Option<&str>, model: &str, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.map(ToString::to_string),
            model: model.to_string(),
            temperature: 0.2,
            max_tokens: 500,
            client: Client::builder()
                .timeout(timeout)
                .connect_timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    pub fn from_config(config: &AnalyzerConfig) -> Self {
        Self::new(
            &config.base_url,
            config.api_key.as_deref(),
            &config.model,
            config.timeout(),
        )
        .with_temperature(config.temperature)
        .with_max_tokens(config.max_tokens)
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }
}

/// Pull the JSON object out of a model reply.
///
/// Handles ```` ```json ```` fences, bare ```` ``` ```` fences and chatter around
/// a single top-level object.
pub(crate) fn extract_json_block(reply: &str) -> &str {
    let reply = reply.trim();

    let fenced = if let Some((_, rest)) = reply.split_once("```json") {
        rest.split("```").next()
    } else if let Some((_, rest)) = reply.split_once("```") {
        rest.split("```").next()
    } else {
        None
    };

    if let Some(block) = fenced {
        return block.trim();
    }

    match (reply.find('{'), reply.rfind('}')) {
        (Some(start), Some(end)) if start < end => &reply[start..=end],
        _ => reply,
    }
}

#[async_trait]
impl SemanticAnalyzer for ChatCompletionsAnalyzer {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn analyze(&self, review_text: &str, rating: u8) -> Result<Value, AnalyzerError> {
        let start = Instant::now();

        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: render_prompt(review_text, rating),
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let mut req = self.client.post(self.endpoint()).json(&request);
        if let Some(ref key) = self.api_key {
            req = req.bearer_auth(key);
        }

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                AnalyzerError::Timeout
            } else {
                AnalyzerError::Transport(sanitize_for_log(&e.to_string()))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalyzerError::Status {
                status: status.as_u16(),
                body: truncate_with_ellipsis(&sanitize_for_log(&body), 200),
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| AnalyzerError::Parse(format!("invalid completion payload: {e}")))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AnalyzerError::Parse("completion had no content".into()))?;

        let value: Value = serde_json::from_str(extract_json_block(&content)).map_err(|e| {
            AnalyzerError::Parse(format!(
                "reply is not JSON ({e}): {}",
                truncate_with_ellipsis(&content, 120)
            ))
        })?;

        tracing::debug!(
            model = %self.model,
            latency_ms = start.elapsed().as_millis() as u64,
            "Semantic analysis received"
        );

        Ok(value)
    }
}
