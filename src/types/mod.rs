//! Public types for the Sentimeter API.

mod comment;
mod sentiment;
mod stats;

pub use comment::{AnalyzedComment, Comment, Video};
pub use sentiment::{RawScore, SentimentCategory, SentimentResult, Thresholds};
pub use stats::{SentimentStats, TagCount};
