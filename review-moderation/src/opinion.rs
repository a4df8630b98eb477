//! Semantic opinion returned by the analyzer, and its structural validation.
//!
//! The analyzer's output is untrusted JSON. It is accepted when it has this
//! shape (extra keys are ignored):
//!
//! ```json
//! {
//!   "sentiment": "SENTIMENT_POSITIVE",
//!   "signals": { "price_mentioned": false, "too_short": true },
//!   "topic_tags": ["SERVICE_STAFF"],
//!   "summary": "Friendly staff.",
//!   "flags": ["generic"]
//! }
//! ```
//!
//! `sentiment` and `signals` are required. A signal missing from `signals`
//! is false. An unrecognized sentiment label is kept but resolves as absent.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::signals::SignalVector;
use crate::vocabulary::{Sentiment, Signal};

/// Structural defect in an analyzer response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OpinionError {
    #[error("analyzer output is not valid JSON: {0}")]
    Malformed(String),

    #[error("analyzer output is not a JSON object")]
    NotAnObject,

    #[error("analyzer output is missing required field '{0}'")]
    MissingField(&'static str),

    #[error("analyzer field '{field}' has the wrong type (expected {expected})")]
    WrongType { field: String, expected: &'static str },
}

/// Validated analyzer opinion for one review.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SemanticOpinion {
    /// Recognized sentiment label, `None` when the analyzer's label is unknown.
    pub sentiment: Option<Sentiment>,
    pub signals: SignalVector,
    /// Topic candidates as proposed; filtered against the vocabulary at tag time.
    pub topics: Vec<String>,
    pub summary: Option<String>,
    pub flags: Vec<String>,
}

impl SemanticOpinion {
    pub fn new(sentiment: Sentiment) -> Self {
        Self {
            sentiment: Some(sentiment),
            ..Self::default()
        }
    }

    pub fn with_signal(mut self, signal: Signal) -> Self {
        self.signals.raise(signal);
        self
    }

    pub fn with_topics<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.topics = topics.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn with_flags<I, S>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.flags = flags.into_iter().map(Into::into).collect();
        self
    }

    /// Parse and validate raw analyzer text.
    pub fn from_json_str(raw: &str) -> Result<Self, OpinionError> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| OpinionError::Malformed(e.to_string()))?;
        Self::from_value(&value)
    }

    /// Validate an analyzer JSON value.
    pub fn from_value(value: &Value) -> Result<Self, OpinionError> {
        let obj = value.as_object().ok_or(OpinionError::NotAnObject)?;

        let sentiment = match obj.get("sentiment") {
            None | Some(Value::Null) => return Err(OpinionError::MissingField("sentiment")),
            Some(Value::String(label)) => Sentiment::parse(label),
            Some(_) => return Err(wrong_type("sentiment", "string")),
        };

        let signals = match obj.get("signals") {
            None | Some(Value::Null) => return Err(OpinionError::MissingField("signals")),
            Some(Value::Object(map)) => parse_signals(map)?,
            Some(_) => return Err(wrong_type("signals", "object")),
        };

        let topics = string_list(obj, "topic_tags")?;
        let flags = string_list(obj, "flags")?;

        let summary = match obj.get("summary") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
            Some(_) => return Err(wrong_type("summary", "string")),
        };

        Ok(Self {
            sentiment,
            signals,
            topics,
            summary,
            flags,
        })
    }
}

fn wrong_type(field: &str, expected: &'static str) -> OpinionError {
    OpinionError::WrongType {
        field: field.to_string(),
        expected,
    }
}

fn parse_signals(map: &Map<String, Value>) -> Result<SignalVector, OpinionError> {
    let mut signals = SignalVector::new();
    for signal in Signal::ALL {
        match map.get(signal.name()) {
            None | Some(Value::Null) => {}
            Some(Value::Bool(value)) => signals.raise_if(signal, *value),
            Some(_) => return Err(wrong_type(&format!("signals.{}", signal.name()), "boolean")),
        }
    }
    Ok(signals)
}

fn string_list(obj: &Map<String, Value>, field: &'static str) -> Result<Vec<String>, OpinionError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| wrong_type(field, "array of strings"))
            })
            .collect(),
        Some(_) => Err(wrong_type(field, "array of strings")),
    }
}
