//! Resilient moderation engine.
//!
//! Two paths per review, no state kept between calls:
//!
//! - **Normal**: the analyzer answers in time with a structurally valid
//!   opinion, which is reconciled with the detectors.
//! - **Fallback**: the analyzer errors, panics, times out or returns an
//!   invalid shape. Semantic signals, sentiment and topics are treated as
//!   absent, the summary is a truncated prefix of the text and the
//!   `ANALYSIS_FALLBACK` flag is added.
//!
//! Detectors run on both paths, so the hard rules are always enforced.

use futures_util::FutureExt;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use review_common::util::{truncate_with_ellipsis, word_count};
use review_common::Config;

use crate::analyzer::{AnalyzerError, SemanticAnalyzer};
use crate::detectors::DetectorReport;
use crate::model::{AnalysisResult, Provenance, Review};
use crate::opinion::SemanticOpinion;
use crate::reconcile::reconcile;
use crate::rules::evaluate;
use crate::sentiment::resolve_sentiment;
use crate::tags::assemble_tags;
use crate::vocabulary::Signal;

/// Quality flag added on the fallback path.
pub const FLAG_ANALYSIS_FALLBACK: &str = "ANALYSIS_FALLBACK";

/// Quality flag added when the canonical `too_short` signal is set.
pub const FLAG_TOO_SHORT: &str = "TOO_SHORT";

/// Engine tuning.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Upper bound on one analyzer call.
    pub timeout: Duration,
    /// Fallback summary length before the ellipsis.
    pub summary_max_chars: usize,
    /// Word count below which `too_short` is raised. With 0 only empty text is too short.
    pub min_word_count: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            summary_max_chars: 150,
            min_word_count: 15,
        }
    }
}

impl EngineOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            timeout: config.analyzer.timeout(),
            summary_max_chars: config.moderation.summary_max_chars,
            min_word_count: config.moderation.min_word_count,
        }
    }
}

/// Why a review took the fallback path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackCause {
    Timeout,
    Analyzer(String),
    InvalidOutput(String),
}

impl fmt::Display for FallbackCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackCause::Timeout => f.write_str("analyzer timed out"),
            FallbackCause::Analyzer(e) => write!(f, "analyzer failed: {e}"),
            FallbackCause::InvalidOutput(e) => write!(f, "invalid analyzer output: {e}"),
        }
    }
}

/// Moderation engine wrapping a semantic analyzer.
#[derive(Clone)]
pub struct ModerationEngine {
    analyzer: Arc<dyn SemanticAnalyzer>,
    options: EngineOptions,
}

impl ModerationEngine {
    pub fn new(analyzer: Arc<dyn SemanticAnalyzer>) -> Self {
        Self {
            analyzer,
            options: EngineOptions::default(),
        }
    }

    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    /// Moderate one review. Always returns a complete result.
    pub async fn moderate(&self, review: &Review) -> AnalysisResult {
        let detectors = DetectorReport::scan(&review.review_text);

        let result = match self.fetch_opinion(review).await {
            Ok(opinion) => self.assemble(review, Some(&opinion), &detectors, None),
            Err(cause) => {
                tracing::warn!(
                    review_id = %review.review_id,
                    cause = %cause,
                    "Semantic analysis unavailable, using fallback"
                );
                self.assemble(review, None, &detectors, Some(cause))
            }
        };

        tracing::debug!(
            review_id = %review.review_id,
            decision = %result.publish_decision,
            provenance = ?result.provenance,
            reasons = result.rejection_reasons.len(),
            "Review moderated"
        );

        result
    }

    /// Call the analyzer under the timeout and validate what comes back.
    async fn fetch_opinion(&self, review: &Review) -> Result<SemanticOpinion, FallbackCause> {
        let call = AssertUnwindSafe(self.analyzer.analyze(&review.review_text, review.rating))
            .catch_unwind();

        match tokio::time::timeout(self.options.timeout, call).await {
            Err(_) => Err(FallbackCause::Timeout),
            Ok(Err(_panic)) => Err(FallbackCause::Analyzer("analyzer panicked".into())),
            Ok(Ok(Err(AnalyzerError::Timeout))) => Err(FallbackCause::Timeout),
            Ok(Ok(Err(e))) => Err(FallbackCause::Analyzer(e.to_string())),
            Ok(Ok(Ok(value))) => SemanticOpinion::from_value(&value)
                .map_err(|e| FallbackCause::InvalidOutput(e.to_string())),
        }
    }

    /// Build the result from an optional opinion and the detector report.
    ///
    /// `opinion` must be `None` whenever `fallback` is set.
    pub fn assemble(
        &self,
        review: &Review,
        opinion: Option<&SemanticOpinion>,
        detectors: &DetectorReport,
        fallback: Option<FallbackCause>,
    ) -> AnalysisResult {
        debug_assert!(fallback.is_none() || opinion.is_none());

        let mut signals = reconcile(opinion.map(|o| &o.signals), detectors);
        let words = word_count(&review.review_text);
        signals.raise_if(
            Signal::TooShort,
            words == 0 || words < self.options.min_word_count,
        );

        let sentiment = resolve_sentiment(opinion.and_then(|o| o.sentiment), review.rating);
        let verdict = evaluate(&signals);
        let topics = opinion.map_or(&[][..], |o| o.topics.as_slice());
        let tags = assemble_tags(sentiment, topics, &signals);

        let summary = opinion
            .and_then(|o| o.summary.clone())
            .unwrap_or_else(|| {
                truncate_with_ellipsis(&review.review_text, self.options.summary_max_chars)
            });

        let mut flags: Vec<String> = Vec::new();
        let mut push_flag = |flag: String| {
            if !flag.is_empty() && !flags.contains(&flag) {
                flags.push(flag);
            }
        };
        for flag in opinion.map_or(&[][..], |o| o.flags.as_slice()) {
            push_flag(flag.trim().to_uppercase());
        }
        if signals.get(Signal::TooShort) {
            push_flag(FLAG_TOO_SHORT.to_string());
        }
        let provenance = if fallback.is_some() {
            push_flag(FLAG_ANALYSIS_FALLBACK.to_string());
            Provenance::Fallback
        } else {
            Provenance::Normal
        };

        AnalysisResult {
            review_id: review.review_id.clone(),
            hotel_id: review.hotel_id.clone(),
            rating: review.rating,
            sentiment,
            tags,
            publish_decision: verdict.decision,
            rejection_reasons: verdict.reasons,
            detected_signals: signals,
            evidence: detectors.excerpts(),
            summary,
            flags,
            provenance,
            fallback_reason: fallback.map(|c| c.to_string()),
            model_name: self.analyzer.model_name().to_string(),
            prompt_version: self.analyzer.prompt_version().to_string(),
            analyzed_at: chrono::Utc::now(),
        }
    }
}
