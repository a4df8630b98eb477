//! Configuration validation.
//!
//! Ensures required values are present and within valid ranges before
//! the engine is built from a configuration.

use thiserror::Error;

use crate::config::{AnalyzerConfig, Config, ModerationConfig, ObservabilityConfig};

/// Configuration validation error.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Multiple validation errors: {0:?}")]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Trait for validatable configuration sections.
pub trait Validate {
    /// Validate this configuration section.
    fn validate(&self) -> ValidationResult<()>;
}

fn invalid(field: &str, reason: impl Into<String>) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        reason: reason.into(),
    }
}

fn collect(mut errors: Vec<ValidationError>) -> ValidationResult<()> {
    if errors.is_empty() {
        Ok(())
    } else if errors.len() == 1 {
        Err(errors.remove(0))
    } else {
        Err(ValidationError::Multiple(errors))
    }
}

impl Validate for Config {
    fn validate(&self) -> ValidationResult<()> {
        let errors = [
            self.analyzer.validate(),
            self.moderation.validate(),
            self.observability.validate(),
        ]
        .into_iter()
        .filter_map(Result::err)
        .flat_map(|e| match e {
            ValidationError::Multiple(inner) => inner,
            other => vec![other],
        })
        .collect();

        collect(errors)
    }
}

impl Validate for AnalyzerConfig {
    fn validate(&self) -> ValidationResult<()> {
        let mut errors = Vec::new();

        if self.timeout_secs == 0 {
            errors.push(invalid("analyzer.timeout_secs", "must be greater than 0"));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            errors.push(invalid(
                "analyzer.temperature",
                format!("{} is outside 0.0..=2.0", self.temperature),
            ));
        }

        if self.enabled {
            if self.model.trim().is_empty() {
                errors.push(ValidationError::MissingField {
                    field: "analyzer.model".to_string(),
                });
            }
            if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
                errors.push(invalid("analyzer.base_url", "must be an http(s) URL"));
            }
        }

        collect(errors)
    }
}

impl Validate for ModerationConfig {
    fn validate(&self) -> ValidationResult<()> {
        let mut errors = Vec::new();

        if self.summary_max_chars == 0 {
            errors.push(invalid("moderation.summary_max_chars", "must be greater than 0"));
        }
        if self.batch_concurrency == 0 {
            errors.push(invalid("moderation.batch_concurrency", "must be greater than 0"));
        }

        collect(errors)
    }
}

impl Validate for ObservabilityConfig {
    fn validate(&self) -> ValidationResult<()> {
        match self.log_format.as_str() {
            "json" | "pretty" => Ok(()),
            other => Err(invalid(
                "observability.log_format",
                format!("unknown format '{other}' (expected json or pretty)"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = Config::default();
        config.analyzer.timeout_secs = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("analyzer.timeout_secs"));
    }

    #[test]
    fn test_disabled_analyzer_skips_endpoint_checks() {
        let mut config = Config::default();
        config.analyzer.enabled = false;
        config.analyzer.model = String::new();
        config.analyzer.base_url = "not a url".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_multiple_errors_are_flattened() {
        let mut config = Config::default();
        config.analyzer.temperature = 3.5;
        config.moderation.batch_concurrency = 0;
        config.moderation.summary_max_chars = 0;
        config.observability.log_format = "xml".to_string();

        match config.validate() {
            Err(ValidationError::Multiple(errors)) => assert_eq!(errors.len(), 4),
            other => panic!("expected multiple errors, got {other:?}"),
        }
    }
}
