//! Review input and analysis output records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use review_common::Error;

use crate::rules::PublishDecision;
use crate::signals::SignalVector;
use crate::vocabulary::{RejectionReason, Sentiment, Tag};

/// Shortest review text the ingestion layer accepts (trimmed characters).
pub const MIN_REVIEW_TEXT_CHARS: usize = 5;

/// A submitted review. Read-only input to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub review_id: String,
    pub hotel_id: String,
    pub rating: u8,
    pub review_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Review {
    pub fn new(
        review_id: impl Into<String>,
        hotel_id: impl Into<String>,
        rating: u8,
        review_text: impl Into<String>,
    ) -> Self {
        Self {
            review_id: review_id.into(),
            hotel_id: hotel_id.into(),
            rating,
            review_text: review_text.into(),
            reviewer_name: None,
            source: None,
        }
    }

    pub fn with_reviewer(mut self, name: impl Into<String>) -> Self {
        self.reviewer_name = Some(name.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Generate an identifier of the form `<hotel_id>_<12 hex chars>`.
    pub fn generate_id(hotel_id: &str) -> String {
        let hex = uuid::Uuid::new_v4().simple().to_string();
        format!("{}_{}", hotel_id, &hex[..12])
    }

    /// Ingestion-side validation. The engine itself never calls this.
    pub fn validate(&self) -> Result<(), Error> {
        if self.review_id.trim().is_empty() {
            return Err(Error::InvalidInput("review_id is required".into()));
        }
        if self.hotel_id.trim().is_empty() {
            return Err(Error::InvalidInput("hotel_id is required".into()));
        }
        if !(1..=5).contains(&self.rating) {
            return Err(Error::InvalidInput(format!(
                "rating {} is outside 1..=5",
                self.rating
            )));
        }
        if self.review_text.trim().chars().count() < MIN_REVIEW_TEXT_CHARS {
            return Err(Error::InvalidInput(format!(
                "review_text must have at least {MIN_REVIEW_TEXT_CHARS} characters"
            )));
        }
        Ok(())
    }
}

/// Which path produced an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Provenance {
    /// Analyzer opinion was available and valid.
    Normal,
    /// Analyzer failed, timed out or returned invalid output; safe defaults used.
    Fallback,
}

impl Provenance {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Provenance::Fallback)
    }
}

/// Final moderation record for one review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub review_id: String,
    pub hotel_id: String,
    pub rating: u8,
    pub sentiment: Sentiment,
    pub tags: Vec<Tag>,
    pub publish_decision: PublishDecision,
    pub rejection_reasons: Vec<RejectionReason>,
    pub detected_signals: SignalVector,
    /// Detector excerpts keyed by signal name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub evidence: BTreeMap<String, String>,
    pub summary: String,
    pub flags: Vec<String>,
    pub provenance: Provenance,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
    pub model_name: String,
    pub prompt_version: String,
    pub analyzed_at: DateTime<Utc>,
}

impl AnalysisResult {
    pub fn is_published(&self) -> bool {
        self.publish_decision == PublishDecision::Publish
    }

    pub fn is_fallback(&self) -> bool {
        self.provenance.is_fallback()
    }
}
