//! Sentiment classification types.
//!
//! A [`SentimentResult`] is produced once per comment by a
//! [`SentimentClassifier`](crate::SentimentClassifier). Its category is
//! derived from the backend's continuous score via [`Thresholds`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Three-way sentiment category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentCategory {
    Positive,
    Neutral,
    Negative,
}

impl SentimentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentCategory::Positive => "positive",
            SentimentCategory::Neutral => "neutral",
            SentimentCategory::Negative => "negative",
        }
    }
}

impl fmt::Display for SentimentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score cutoffs that turn a continuous score into a category.
///
/// Both comparisons are strict: a score exactly on a cutoff is neutral.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Scores strictly above this are positive.
    pub positive_above: f64,
    /// Scores strictly below this are negative.
    pub negative_below: f64,
}

impl Thresholds {
    /// Cutoffs for the remote NLP backend (±0.25).
    pub const REMOTE: Thresholds = Thresholds::symmetric(0.25);

    /// Cutoffs for the local lexical backend (±0.2).
    pub const LEXICAL: Thresholds = Thresholds::symmetric(0.2);

    pub const fn symmetric(cutoff: f64) -> Self {
        Self {
            positive_above: cutoff,
            negative_below: -cutoff,
        }
    }

    /// Classify a score.
    pub fn categorize(&self, score: f64) -> SentimentCategory {
        if score > self.positive_above {
            SentimentCategory::Positive
        } else if score < self.negative_below {
            SentimentCategory::Negative
        } else {
            SentimentCategory::Neutral
        }
    }
}

/// Continuous output of a scoring backend, before categorization.
///
/// `magnitude` is backend-specific: emotional intensity for the remote
/// backend, subjectivity for the lexical backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawScore {
    pub score: f64,
    pub magnitude: f64,
}

/// Sentiment of a single piece of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub score: f64,
    pub magnitude: f64,
    pub category: SentimentCategory,
    /// Set when the backend failed and this result is a neutral placeholder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SentimentResult {
    /// Build a result from a backend score using the given cutoffs.
    pub fn from_raw(raw: RawScore, thresholds: &Thresholds) -> Self {
        Self {
            score: raw.score,
            magnitude: raw.magnitude,
            category: thresholds.categorize(raw.score),
            error: None,
        }
    }

    /// Neutral zero-score placeholder carrying a failure message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            score: 0.0,
            magnitude: 0.0,
            category: SentimentCategory::Neutral,
            error: Some(message.into()),
        }
    }

    /// Whether this result stands in for a backend failure.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
