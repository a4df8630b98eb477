//! Semantic analyzer capability.
//!
//! The engine never talks to a model directly: it is handed an
//! implementation of [`SemanticAnalyzer`] and treats whatever comes back as
//! untrusted JSON to be validated.

mod chat;
mod prompt;

pub use chat::ChatCompletionsAnalyzer;
pub use prompt::{render_prompt, PROMPT_VERSION};

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

use review_common::AnalyzerConfig;

/// Failure to obtain an opinion from the analyzer.
#[derive(Debug, Clone, Error)]
pub enum AnalyzerError {
    #[error("analyzer is not configured: {0}")]
    NotConfigured(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("analyzer returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not parse analyzer reply: {0}")]
    Parse(String),

    #[error("analyzer timed out")]
    Timeout,
}

/// External semantic analysis of a single review.
#[async_trait]
pub trait SemanticAnalyzer: Send + Sync {
    /// Name of the backing model, recorded on every result.
    fn model_name(&self) -> &str;

    /// Version of the prompt or contract the analyzer speaks.
    fn prompt_version(&self) -> &str {
        PROMPT_VERSION
    }

    /// Produce a raw opinion for `review_text` with its star `rating`.
    async fn analyze(&self, review_text: &str, rating: u8) -> Result<Value, AnalyzerError>;
}

/// Analyzer that is switched off; every review takes the fallback path.
#[derive(Debug, Clone, Default)]
pub struct DisabledAnalyzer;

#[async_trait]
impl SemanticAnalyzer for DisabledAnalyzer {
    fn model_name(&self) -> &str {
        "none"
    }

    async fn analyze(&self, _review_text: &str, _rating: u8) -> Result<Value, AnalyzerError> {
        Err(AnalyzerError::NotConfigured("semantic analysis disabled".into()))
    }
}

/// Build the analyzer described by the configuration.
///
/// A disabled analyzer or a missing API key yields [`DisabledAnalyzer`].
pub fn build_analyzer(config: &AnalyzerConfig) -> Arc<dyn SemanticAnalyzer> {
    if !config.enabled {
        tracing::info!("Semantic analyzer disabled by configuration");
        return Arc::new(DisabledAnalyzer);
    }

    match config.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
        Some(_) => Arc::new(ChatCompletionsAnalyzer::from_config(config)),
        None => {
            tracing::warn!("No analyzer API key configured, all reviews will use fallback analysis");
            Arc::new(DisabledAnalyzer)
        }
    }
}
