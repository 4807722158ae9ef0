//! Sentimeter - sentiment classification for video comments
//!
//! Classifies a batch of free-text comments as positive, neutral or
//! negative and summarises the batch as category counts and percentages.
//! Two interchangeable scoring backends sit behind one
//! [`SentimentBackend`] trait:
//!
//! - the Google Cloud Natural Language API (feature `google`), with
//!   thresholds at ±0.25
//! - an in-process lexical analyzer, with thresholds at ±0.2
//!
//! [`BackendSelector`] prefers the remote backend and falls back to the
//! lexical one, once, when the remote backend cannot be constructed.
//! Classification is fail-soft: a backend error becomes a neutral result
//! carrying the error message, so a batch always produces statistics.
//!
//! # Example
//!
//! ```rust,no_run
//! use sentimeter::{AnalysisConfig, BackendSelector, Comment, SentimentPipeline};
//!
//! #[tokio::main]
//! async fn main() {
//!     let pipeline = SentimentPipeline::new(BackendSelector::new().api_key("AIza-your-key"));
//!     let mut analysis = AnalysisConfig::default();
//!
//!     let outcome = pipeline
//!         .process(
//!             vec![
//!                 Comment::new("c1", "I love this, great job!"),
//!                 Comment::new("c2", "I hate this, terrible."),
//!             ],
//!             &mut analysis,
//!         )
//!         .await;
//!
//!     for c in &outcome.comments {
//!         println!("{}: {}", c.comment.id, c.sentiment.category);
//!     }
//!     println!("{}% positive", outcome.stats.positive_percent);
//! }
//! ```

pub mod aggregate;
pub mod backends;
pub mod cache;
pub mod classifier;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod selector;
pub mod storage;
pub mod telemetry;
pub mod types;
pub mod version;

// Re-export main types at crate root
pub use aggregate::{DEFAULT_TAG_LIMIT, MAX_BATCH_COMMENTS, aggregate, comments_limited, tag_frequency};
#[cfg(feature = "google")]
pub use backends::GoogleNlClient;
pub use backends::{LexicalBackend, SentimentBackend};
pub use cache::CacheConfig;
pub use classifier::SentimentClassifier;
pub use config::{AnalysisConfig, Config, Secrets};
pub use error::{Result, SentimeterError};
pub use pipeline::{BatchOutcome, SentimentPipeline};
pub use selector::BackendSelector;
pub use storage::{FsSnapshotStore, SnapshotStore};
pub use version::{PKG_VERSION, version_string};

pub use types::{
    AnalyzedComment, Comment, RawScore, SentimentCategory, SentimentResult, SentimentStats,
    TagCount, Thresholds, Video,
};
