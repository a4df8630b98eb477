//! Bounded-concurrency batch moderation.
//!
//! Reviews are pulled from the input lazily: a review is only taken once a
//! concurrency permit is free. A panic while moderating one review is
//! recorded as a [`BatchFailure`] and does not affect the others.

use futures_util::FutureExt;
use serde::Serialize;
use std::any::Any;
use std::collections::BTreeSet;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use review_common::logging::generate_run_id;

use crate::engine::ModerationEngine;
use crate::model::{AnalysisResult, Review};

/// A review that produced no result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchFailure {
    /// Position in the input sequence.
    pub index: usize,
    pub review_id: String,
    pub error: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchCounts {
    pub total: usize,
    pub normal: usize,
    pub fallback: usize,
    pub published: usize,
    pub rejected: usize,
    pub failed: usize,
}

/// Outcome of a batch run. `results` keep input order.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub run_id: String,
    pub results: Vec<AnalysisResult>,
    pub failures: Vec<BatchFailure>,
    pub counts: BatchCounts,
}

type TaskOutput = (usize, Result<AnalysisResult, String>);

/// Moderate `reviews` with at most `concurrency` analyses in flight.
pub async fn moderate_batch<I>(
    engine: Arc<ModerationEngine>,
    reviews: I,
    concurrency: usize,
) -> BatchReport
where
    I: IntoIterator<Item = Review>,
{
    let run_id = generate_run_id();
    let start = Instant::now();
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut join_set: JoinSet<TaskOutput> = JoinSet::new();
    let mut review_ids: Vec<String> = Vec::new();

    tracing::info!(run_id = %run_id, concurrency = concurrency.max(1), "Batch moderation started");

    for (index, review) in reviews.into_iter().enumerate() {
        let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
            tracing::error!(run_id = %run_id, "Concurrency limiter closed, stopping intake");
            break;
        };

        review_ids.push(review.review_id.clone());
        let engine = Arc::clone(&engine);

        join_set.spawn(async move {
            let outcome = AssertUnwindSafe(engine.moderate(&review))
                .catch_unwind()
                .await
                .map_err(|payload| format!("moderation panicked: {}", panic_message(&*payload)));
            drop(permit);
            (index, outcome)
        });
    }

    let mut results: Vec<(usize, AnalysisResult)> = Vec::with_capacity(review_ids.len());
    let mut failures: Vec<BatchFailure> = Vec::new();

    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((index, Ok(result))) => results.push((index, result)),
            Ok((index, Err(error))) => {
                let review_id = review_ids.get(index).cloned().unwrap_or_default();
                tracing::error!(run_id = %run_id, index, review_id = %review_id, error = %error, "Review failed");
                failures.push(BatchFailure {
                    index,
                    review_id,
                    error,
                });
            }
            Err(join_error) => {
                tracing::error!(run_id = %run_id, error = %join_error, "Moderation task did not complete");
            }
        }
    }

    // Tasks that ended without reporting (cancelled) are failures too.
    let reported: BTreeSet<usize> = results
        .iter()
        .map(|(i, _)| *i)
        .chain(failures.iter().map(|f| f.index))
        .collect();
    for (index, review_id) in review_ids.iter().enumerate() {
        if !reported.contains(&index) {
            failures.push(BatchFailure {
                index,
                review_id: review_id.clone(),
                error: "moderation task was cancelled".into(),
            });
        }
    }

    results.sort_by_key(|(i, _)| *i);
    failures.sort_by_key(|f| f.index);
    let results: Vec<AnalysisResult> = results.into_iter().map(|(_, r)| r).collect();

    let counts = BatchCounts {
        total: review_ids.len(),
        normal: results.iter().filter(|r| !r.is_fallback()).count(),
        fallback: results.iter().filter(|r| r.is_fallback()).count(),
        published: results.iter().filter(|r| r.is_published()).count(),
        rejected: results.iter().filter(|r| !r.is_published()).count(),
        failed: failures.len(),
    };

    tracing::info!(
        run_id = %run_id,
        total = counts.total,
        published = counts.published,
        rejected = counts.rejected,
        fallback = counts.fallback,
        failed = counts.failed,
        duration_ms = start.elapsed().as_millis() as u64,
        "Batch moderation finished"
    );

    BatchReport {
        run_id,
        results,
        failures,
        counts,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::DisabledAnalyzer;

    fn engine() -> Arc<ModerationEngine> {
        Arc::new(ModerationEngine::new(Arc::new(DisabledAnalyzer)))
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let report = moderate_batch(engine(), Vec::new(), 4).await;
        assert!(report.results.is_empty());
        assert!(report.failures.is_empty());
        assert_eq!(report.counts, BatchCounts::default());
        assert_eq!(report.run_id.len(), 8);
    }

    #[tokio::test]
    async fn test_results_keep_input_order() {
        let reviews: Vec<Review> = (0..20)
            .map(|i| Review::new(format!("r{i}"), "H", 4, "Comfortable beds and a quiet room"))
            .collect();

        let report = moderate_batch(engine(), reviews, 3).await;

        let ids: Vec<&str> = report.results.iter().map(|r| r.review_id.as_str()).collect();
        let expected: Vec<String> = (0..20).map(|i| format!("r{i}")).collect();
        assert_eq!(ids, expected.iter().map(String::as_str).collect::<Vec<_>>());
        assert_eq!(report.counts.total, 20);
        assert_eq!(report.counts.fallback, 20);
        assert_eq!(report.counts.published, 20);
    }

    #[tokio::test]
    async fn test_zero_concurrency_still_runs() {
        let reviews = vec![Review::new("r1", "H", 1, "Paid $90 for a dirty room")];
        let report = moderate_batch(engine(), reviews, 0).await;
        assert_eq!(report.counts.total, 1);
        assert_eq!(report.counts.rejected, 1);
    }

    #[test]
    fn test_panic_message_extraction() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(&*payload), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(&*payload), "bang");
        let payload: Box<dyn Any + Send> = Box::new(42_u8);
        assert_eq!(panic_message(&*payload), "unknown panic");
    }
}
