//! Batch statistics types.

use serde::{Deserialize, Serialize};

/// Category distribution over a batch of classified comments.
///
/// Always recomputed in full by [`aggregate`](crate::aggregate::aggregate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SentimentStats {
    pub total: usize,
    pub positive_count: usize,
    pub neutral_count: usize,
    pub negative_count: usize,
    /// Floor of the positive share, 0..=100.
    pub positive_percent: u32,
    pub neutral_percent: u32,
    pub negative_percent: u32,
}

/// Occurrence count for a normalized video tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}
