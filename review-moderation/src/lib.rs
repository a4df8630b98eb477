//! Review Moderation - Moderation and tagging decisions for hotel reviews.
//!
//! This crate provides:
//! - Closed tag, signal and rejection-reason vocabularies
//! - Deterministic pattern detectors for rule-bound content
//! - Signal reconciliation, sentiment resolution and publishing rules
//! - A resilient engine that falls back to safe defaults when the semantic
//!   analyzer is unavailable
//! - Batch moderation, ingestion, reporting and export
//!
//! ## Architecture
//!
//! ```text
//! Review ─┬─> Detectors ──────────────┐
//!         └─> SemanticAnalyzer ─> Opinion ─┴─> Reconcile ─> Rules ─> Tags ─> AnalysisResult
//!                  (timeout / error ─> fallback)
//! ```

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod analyzer;
pub mod batch;
pub mod detectors;
pub mod engine;
pub mod export;
pub mod import;
pub mod model;
pub mod opinion;
pub mod reconcile;
pub mod report;
pub mod rules;
pub mod sentiment;
pub mod signals;
pub mod tags;
pub mod vocabulary;

pub use analyzer::{
    build_analyzer, AnalyzerError, ChatCompletionsAnalyzer, DisabledAnalyzer, SemanticAnalyzer,
    PROMPT_VERSION,
};
pub use batch::{moderate_batch, BatchCounts, BatchFailure, BatchReport};
pub use detectors::{Detection, DetectorReport};
pub use engine::{
    EngineOptions, FallbackCause, ModerationEngine, FLAG_ANALYSIS_FALLBACK, FLAG_TOO_SHORT,
};
pub use export::ExportFormat;
pub use import::{open_reviews, ImportError, ImportFormat};
pub use model::{AnalysisResult, Provenance, Review};
pub use opinion::{OpinionError, SemanticOpinion};
pub use report::SummaryReport;
pub use rules::{evaluate, PublishDecision, Verdict};
pub use signals::SignalVector;
pub use vocabulary::{RejectionReason, Sentiment, Signal, SpecialTag, Tag, TopicTag};
