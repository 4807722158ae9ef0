//! Scoring backend trait.
//!
//! A backend turns text into a continuous [`RawScore`]. It does not decide
//! the category; that is the classifier's job, using the cutoffs the
//! backend reports through [`SentimentBackend::thresholds`].
//!
//! Backends return `Err` on any failure. The fail-soft conversion into a
//! neutral placeholder happens one layer up, in
//! [`SentimentClassifier::analyze`](crate::SentimentClassifier::analyze),
//! so callers that want to observe failures can use `try_analyze`.

use async_trait::async_trait;

use crate::Result;
use crate::types::{RawScore, Thresholds};

/// Provider of continuous sentiment scores.
#[async_trait]
pub trait SentimentBackend: Send + Sync {
    /// Backend name for logging/metrics.
    fn name(&self) -> &str;

    /// Category cutoffs that apply to this backend's scores.
    fn thresholds(&self) -> Thresholds;

    /// Score a single, non-empty text.
    async fn score(&self, text: &str) -> Result<RawScore>;
}

/// Stand-in for a backend that failed to construct.
///
/// Every call reports the construction error, which the classifier turns
/// into a neutral result with `error` set.
pub struct UnavailableBackend {
    name: String,
    thresholds: Thresholds,
    reason: String,
}

impl UnavailableBackend {
    pub fn new(name: impl Into<String>, thresholds: Thresholds, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            thresholds,
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl SentimentBackend for UnavailableBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    async fn score(&self, _text: &str) -> Result<RawScore> {
        Err(crate::SentimeterError::BackendUnavailable(self.reason.clone()))
    }
}
