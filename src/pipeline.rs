//! Batch pipeline: filter, select, classify, aggregate.
//!
//! One [`SentimentPipeline::process`] call handles one batch of comments:
//!
//! 1. comments with empty or whitespace-only text are dropped
//! 2. the backend is selected once, possibly clearing
//!    `analysis.prefer_remote`
//! 3. every remaining comment is classified in order, one at a time
//! 4. the results are aggregated into [`SentimentStats`]
//!
//! Classification never fails, so neither does the pipeline.

use tracing::{debug, info, instrument, warn};

use crate::aggregate::{MAX_BATCH_COMMENTS, aggregate};
use crate::config::AnalysisConfig;
use crate::selector::BackendSelector;
use crate::storage::SnapshotStore;
use crate::telemetry;
use crate::types::{AnalyzedComment, Comment, SentimentStats};

/// Enriched comments and their statistics.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct BatchOutcome {
    pub comments: Vec<AnalyzedComment>,
    pub stats: SentimentStats,
}

/// Runs classification batches with a fixed backend configuration.
#[derive(Debug, Clone, Default)]
pub struct SentimentPipeline {
    selector: BackendSelector,
}

impl SentimentPipeline {
    pub fn new(selector: BackendSelector) -> Self {
        Self { selector }
    }

    pub fn selector(&self) -> &BackendSelector {
        &self.selector
    }

    /// Classify a batch of comments.
    ///
    /// Comments without text are skipped and do not appear in the outcome.
    #[instrument(skip_all, fields(batch = comments.len(), prefer_remote = analysis.prefer_remote))]
    pub async fn process(
        &self,
        comments: Vec<Comment>,
        analysis: &mut AnalysisConfig,
    ) -> BatchOutcome {
        if comments.len() > MAX_BATCH_COMMENTS {
            warn!(
                batch = comments.len(),
                limit = MAX_BATCH_COMMENTS,
                "batch larger than the per-video comment limit"
            );
        }

        let (comments, skipped): (Vec<_>, Vec<_>) =
            comments.into_iter().partition(Comment::has_text);
        if !skipped.is_empty() {
            debug!(skipped = skipped.len(), "skipping comments without text");
            metrics::counter!(telemetry::COMMENTS_SKIPPED_TOTAL).increment(skipped.len() as u64);
        }

        let classifier = self.selector.select(analysis);

        let mut analyzed = Vec::with_capacity(comments.len());
        for comment in comments {
            let sentiment = classifier.analyze(&comment.text).await;
            analyzed.push(AnalyzedComment { comment, sentiment });
        }

        let stats = aggregate(analyzed.iter().map(|c| &c.sentiment));
        info!(
            backend = classifier.backend_name(),
            total = stats.total,
            positive = stats.positive_count,
            neutral = stats.neutral_count,
            negative = stats.negative_count,
            "batch classified"
        );

        BatchOutcome {
            comments: analyzed,
            stats,
        }
    }

    /// Classify a batch and save a snapshot of the result.
    ///
    /// Saving is best-effort: a store failure is logged and counted but the
    /// outcome is returned unchanged.
    #[instrument(skip(self, comments, analysis, store), fields(bucket = store.bucket()))]
    pub async fn process_and_store(
        &self,
        comments: Vec<Comment>,
        video_id: &str,
        analysis: &mut AnalysisConfig,
        store: &dyn SnapshotStore,
    ) -> BatchOutcome {
        let outcome = self.process(comments, analysis).await;

        if outcome.comments.is_empty() {
            debug!("nothing to save");
            return outcome;
        }

        match store.save_comments(video_id, &outcome.comments).await {
            Ok(blob) => debug!(blob = %blob, "snapshot saved"),
            Err(e) => {
                warn!(error = %e, "failed to save comment snapshot");
                metrics::counter!(telemetry::SNAPSHOT_FAILURES_TOTAL).increment(1);
            }
        }

        outcome
    }
}
