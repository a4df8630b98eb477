//! Aggregate statistics over moderated reviews.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::AnalysisResult;

/// Summary of a set of analysis results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryReport {
    /// Set when every result belongs to the same hotel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotel_id: Option<String>,
    pub total_reviews: usize,
    pub published: usize,
    pub rejected: usize,
    /// Share of published reviews, rounded to two decimals.
    pub publish_percentage: f64,
    pub fallback_count: usize,
    /// Rejection reason message to occurrence count.
    pub rejection_reasons: BTreeMap<String, usize>,
    pub tag_distribution: BTreeMap<String, usize>,
    pub sentiment_distribution: BTreeMap<String, usize>,
}

impl SummaryReport {
    pub fn from_results(results: &[AnalysisResult]) -> Self {
        let mut report = SummaryReport {
            hotel_id: single_hotel(results),
            total_reviews: results.len(),
            ..Self::default()
        };

        for result in results {
            if result.is_published() {
                report.published += 1;
            } else {
                report.rejected += 1;
            }
            if result.is_fallback() {
                report.fallback_count += 1;
            }
            for reason in &result.rejection_reasons {
                *report
                    .rejection_reasons
                    .entry(reason.message().to_string())
                    .or_default() += 1;
            }
            for tag in &result.tags {
                *report
                    .tag_distribution
                    .entry(tag.as_str().to_string())
                    .or_default() += 1;
            }
            *report
                .sentiment_distribution
                .entry(result.sentiment.as_str().to_string())
                .or_default() += 1;
        }

        report.publish_percentage = percentage(report.published, report.total_reviews);
        report
    }
}

fn single_hotel(results: &[AnalysisResult]) -> Option<String> {
    let first = results.first()?;
    results
        .iter()
        .all(|r| r.hotel_id == first.hotel_id)
        .then(|| first.hotel_id.clone())
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 * 100.0 / whole as f64 * 100.0).round() / 100.0
}
