//! Sentiment scoring backends.
//!
//! Two interchangeable implementations of [`SentimentBackend`]: the remote
//! Google Cloud Natural Language client (feature `google`) and the
//! in-process lexical analyzer.

#[cfg(feature = "google")]
pub mod google;
pub mod lexical;
pub mod traits;

#[cfg(feature = "google")]
pub use google::GoogleNlClient;
pub use lexical::{LexicalBackend, LexicalSentiment, Lexicon, LexiconEntry};
pub use traits::{SentimentBackend, UnavailableBackend};
