//! Configuration management for the moderation services.
//!
//! The configuration file lives at `~/.reviewmod/config.json`.
//!
//! # Configuration Priority
//!
//! 1. Environment variables (REVIEWMOD_* prefix)
//! 2. Explicit config file values
//! 3. Default values
//!
//! # Environment Variable Mapping
//!
//! - `REVIEWMOD_LOG_LEVEL` → observability.log_level
//! - `REVIEWMOD_LOG_FORMAT` → observability.log_format
//! - `REVIEWMOD_ANALYZER_URL` → analyzer.base_url
//! - `REVIEWMOD_ANALYZER_MODEL` → analyzer.model
//! - `REVIEWMOD_ANALYZER_TIMEOUT` → analyzer.timeout_secs (duration string, e.g. `30s`)
//! - `REVIEWMOD_API_KEY` / `GROQ_API_KEY` → analyzer.api_key

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Get the configuration directory path.
pub fn config_dir() -> PathBuf {
    directories::UserDirs::new().map_or_else(
        || PathBuf::from(".reviewmod"),
        |dirs| dirs.home_dir().join(".reviewmod"),
    )
}

/// Get the configuration file path.
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Semantic analyzer endpoint
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Moderation engine tuning
    #[serde(default)]
    pub moderation: ModerationConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from the default path.
    pub fn load() -> Result<Self> {
        let path = config_path();
        if !path.exists() {
            tracing::info!("Config file not found, using defaults");
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Load configuration (default or explicit path) with environment overrides applied.
    pub fn load_with_env(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::load_from(p)?,
            None => Self::load()?,
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(level) = lookup("REVIEWMOD_LOG_LEVEL") {
            self.observability.log_level = level;
        }
        if let Some(format) = lookup("REVIEWMOD_LOG_FORMAT") {
            self.observability.log_format = format;
        }

        if let Some(url) = lookup("REVIEWMOD_ANALYZER_URL") {
            self.analyzer.base_url = url;
        }
        if let Some(model) = lookup("REVIEWMOD_ANALYZER_MODEL") {
            self.analyzer.model = model;
        }
        if let Some(timeout) = lookup("REVIEWMOD_ANALYZER_TIMEOUT") {
            match crate::util::parse_duration(&timeout) {
                Ok(d) => self.analyzer.timeout_secs = d.as_secs().max(1),
                Err(e) => tracing::warn!(value = %timeout, error = %e, "Ignoring invalid analyzer timeout"),
            }
        }

        // Explicit key wins over the provider-specific one
        if let Some(key) = lookup("REVIEWMOD_API_KEY").or_else(|| lookup("GROQ_API_KEY")) {
            if !key.trim().is_empty() {
                self.analyzer.api_key = Some(key);
            }
        }
    }
}

// ============================================================================
// Analyzer Configuration
// ============================================================================

/// Semantic analyzer (OpenAI-compatible chat completions) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Whether to call the analyzer at all. When false every review takes the fallback path.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Base URL of the chat-completions API (without `/v1/chat/completions`)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// API key (Bearer)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Maximum completion tokens
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Per-review analyzer timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl AnalyzerConfig {
    /// Analyzer timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_base_url(),
            model: default_model(),
            api_key: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

// ============================================================================
// Moderation Configuration
// ============================================================================

/// Engine tuning knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationConfig {
    /// Length of the fallback summary before the ellipsis
    #[serde(default = "default_summary_max_chars")]
    pub summary_max_chars: usize,

    /// Reviews with fewer words are marked too short (0 leaves only empty text too short)
    #[serde(default = "default_min_word_count")]
    pub min_word_count: usize,

    /// Maximum reviews evaluated at once in a batch
    #[serde(default = "default_batch_concurrency")]
    pub batch_concurrency: usize,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            summary_max_chars: default_summary_max_chars(),
            min_word_count: default_min_word_count(),
            batch_concurrency: default_batch_concurrency(),
        }
    }
}

// ============================================================================
// Observability Configuration
// ============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level", alias = "level")]
    pub log_level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format", alias = "format")]
    pub log_format: String,

    /// Additional module targets clamped to `warn`.
    #[serde(default)]
    pub excluded_targets: Vec<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
            excluded_targets: Vec::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_base_url() -> String {
    "https://api.groq.com/openai".to_string()
}

fn default_model() -> String {
    "llama-3.1-8b-instant".to_string()
}

fn default_temperature() -> f64 {
    0.2
}

fn default_max_tokens() -> u32 {
    500
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_summary_max_chars() -> usize {
    150
}

fn default_min_word_count() -> usize {
    15
}

fn default_batch_concurrency() -> usize {
    8
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.analyzer.enabled);
        assert_eq!(config.analyzer.timeout(), Duration::from_secs(30));
        assert_eq!(config.moderation.summary_max_chars, 150);
        assert_eq!(config.moderation.min_word_count, 15);
        assert_eq!(config.observability.log_format, "pretty");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"analyzer": {{"model": "mixtral-8x7b-32768", "timeout_secs": 5}}, "observability": {{"level": "debug"}}}}"#
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.analyzer.model, "mixtral-8x7b-32768");
        assert_eq!(config.analyzer.timeout_secs, 5);
        assert_eq!(config.analyzer.base_url, default_base_url());
        assert_eq!(config.observability.log_level, "debug");
        assert_eq!(config.moderation.batch_concurrency, 8);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = Config::load_from(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("REVIEWMOD_LOG_LEVEL", "trace"),
            ("REVIEWMOD_ANALYZER_MODEL", "other-model"),
            ("REVIEWMOD_ANALYZER_TIMEOUT", "2m"),
            ("GROQ_API_KEY", "gsk_test"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.observability.log_level, "trace");
        assert_eq!(config.analyzer.model, "other-model");
        assert_eq!(config.analyzer.timeout_secs, 120);
        assert_eq!(config.analyzer.api_key.as_deref(), Some("gsk_test"));
    }

    #[test]
    fn test_invalid_timeout_override_is_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|k| (k == "REVIEWMOD_ANALYZER_TIMEOUT").then(|| "soon".to_string()));
        assert_eq!(config.analyzer.timeout_secs, 30);
    }

    #[test]
    fn test_explicit_key_beats_provider_key() {
        let mut config = Config::default();
        config.apply_overrides(|k| match k {
            "REVIEWMOD_API_KEY" => Some("explicit".to_string()),
            "GROQ_API_KEY" => Some("groq".to_string()),
            _ => None,
        });
        assert_eq!(config.analyzer.api_key.as_deref(), Some("explicit"));
    }
}
