//! Sentiment classifier.
//!
//! [`SentimentClassifier`] wraps one scoring backend and converts its
//! continuous score into a [`SentimentCategory`](crate::SentimentCategory)
//! using that backend's thresholds. It exposes two entry points:
//!
//! - [`try_analyze`](SentimentClassifier::try_analyze) returns backend
//!   failures as `Err`, for callers that want to tell a failure apart from
//!   genuine neutral sentiment
//! - [`analyze`](SentimentClassifier::analyze) never fails: a backend error
//!   becomes a neutral zero-score result whose `error` field holds the
//!   message

use std::sync::Arc;
use std::time::Instant;

use tracing::{instrument, warn};

use crate::Result;
use crate::backends::SentimentBackend;
use crate::cache::{CacheConfig, ScoreCache};
use crate::telemetry;
use crate::types::{SentimentResult, Thresholds};

/// Classifier over a single backend.
#[derive(Clone)]
pub struct SentimentClassifier {
    backend: Arc<dyn SentimentBackend>,
    cache: Option<ScoreCache>,
}

impl SentimentClassifier {
    pub fn new(backend: Arc<dyn SentimentBackend>) -> Self {
        Self {
            backend,
            cache: None,
        }
    }

    /// Put a score cache in front of the backend.
    pub fn with_cache(mut self, config: &CacheConfig) -> Self {
        self.cache = Some(ScoreCache::new(config));
        self
    }

    /// Name of the active backend.
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Category cutoffs of the active backend.
    pub fn thresholds(&self) -> Thresholds {
        self.backend.thresholds()
    }

    /// Classify a text, surfacing backend failures.
    #[instrument(skip(self, text), fields(backend = %self.backend.name(), len = text.len()))]
    pub async fn try_analyze(&self, text: &str) -> Result<SentimentResult> {
        let name = self.backend.name();
        let thresholds = self.backend.thresholds();

        if let Some(cache) = &self.cache {
            if let Some(raw) = cache.get(name, text).await {
                return Ok(SentimentResult::from_raw(raw, &thresholds));
            }
        }

        let start = Instant::now();
        let outcome = self.backend.score(text).await;
        Self::record_analysis(name, start, outcome.is_ok());

        let raw = outcome?;
        if let Some(cache) = &self.cache {
            cache.insert(name, text, raw).await;
        }
        Ok(SentimentResult::from_raw(raw, &thresholds))
    }

    /// Classify a text. Never fails.
    ///
    /// On backend failure the result is neutral with `score` and
    /// `magnitude` zero and `error` set to the failure message.
    pub async fn analyze(&self, text: &str) -> SentimentResult {
        match self.try_analyze(text).await {
            Ok(result) => result,
            Err(e) => {
                warn!(backend = self.backend.name(), error = %e, "sentiment analysis failed");
                SentimentResult::failed(e.to_string())
            }
        }
    }

    fn record_analysis(backend: &str, start: Instant, ok: bool) {
        let status = if ok { "ok" } else { "error" };
        metrics::counter!(
            telemetry::ANALYSES_TOTAL,
            "backend" => backend.to_string(),
            "status" => status,
        )
        .increment(1);
        metrics::histogram!(
            telemetry::ANALYSIS_DURATION_SECONDS,
            "backend" => backend.to_string(),
        )
        .record(start.elapsed().as_secs_f64());
    }
}

impl std::fmt::Debug for SentimentClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentimentClassifier")
            .field("backend", &self.backend.name())
            .field("cached", &self.cache.is_some())
            .finish()
    }
}
