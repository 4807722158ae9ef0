//! Backend selection with one-shot fallback.
//!
//! ```text
//!        select(&mut analysis)
//!                 │
//!     prefer_remote? ──no──────────────┐
//!                 │ yes                 │
//!                 ▼                     │
//!     ┌───────────────────────┐         │
//!     │ construct remote      │         │
//!     │ (API key, HTTP client)│         │
//!     └─────┬───────────┬─────┘         │
//!        ok │           │ err           │
//!           │           ▼               ▼
//!           │   warn + prefer_remote = false
//!           │           │
//!           │           ▼
//!           │   ┌───────────────────────┐
//!           │   │ construct lexical     │──err──► UnavailableBackend
//!           │   └───────────┬───────────┘         (every call fails soft)
//!           ▼               ▼
//!          SentimentClassifier
//! ```
//!
//! There is no retry: once downgraded, the caller's `AnalysisConfig` keeps
//! `prefer_remote = false` and later batches go straight to the local
//! backend.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::backends::{SentimentBackend, UnavailableBackend};
use crate::cache::CacheConfig;
use crate::classifier::SentimentClassifier;
use crate::config::{AnalysisConfig, Config, LexicalConfig, RemoteConfig, Secrets};
use crate::telemetry;
use crate::types::Thresholds;
use crate::{Result, SentimeterError};

/// Builds the classifier for a batch.
#[derive(Debug, Clone, Default)]
pub struct BackendSelector {
    remote: RemoteConfig,
    api_key: Option<String>,
    lexical: LexicalConfig,
    cache: Option<CacheConfig>,
}

impl BackendSelector {
    /// Selector with default settings and no remote credentials.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selector configured from the loaded config and secrets.
    pub fn from_config(config: &Config, secrets: &Secrets) -> Self {
        Self {
            remote: config.remote.clone(),
            api_key: secrets.api_key("google"),
            lexical: config.lexical.clone(),
            cache: config.cache.to_config(),
        }
    }

    pub fn remote(mut self, remote: RemoteConfig) -> Self {
        self.remote = remote;
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn lexical(mut self, lexical: LexicalConfig) -> Self {
        self.lexical = lexical;
        self
    }

    pub fn cache(mut self, cache: CacheConfig) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Choose and construct the backend for a batch.
    ///
    /// When the remote backend is preferred but cannot be constructed, the
    /// local backend is used instead and `analysis.prefer_remote` is
    /// cleared.
    pub fn select(&self, analysis: &mut AnalysisConfig) -> SentimentClassifier {
        let backend = if analysis.prefer_remote {
            match self.build_remote() {
                Ok(backend) => backend,
                Err(e) => {
                    warn!(error = %e, "remote sentiment backend unavailable, falling back to lexical");
                    metrics::counter!(telemetry::BACKEND_FALLBACKS_TOTAL,
                        "from" => "google-nl",
                        "to" => "lexical",
                    )
                    .increment(1);
                    analysis.prefer_remote = false;
                    self.build_local()
                }
            }
        } else {
            self.build_local()
        };

        debug!(backend = backend.name(), "sentiment backend selected");

        let classifier = SentimentClassifier::new(backend);
        match &self.cache {
            Some(cache) => classifier.with_cache(cache),
            None => classifier,
        }
    }

    #[cfg(feature = "google")]
    fn build_remote(&self) -> Result<Arc<dyn SentimentBackend>> {
        use crate::backends::GoogleNlClient;

        let api_key = self
            .api_key
            .as_deref()
            .ok_or(SentimeterError::MissingCredentials("google-nl"))?;
        let client =
            GoogleNlClient::with_options(api_key, &self.remote.base_url, self.remote.timeout())?;
        Ok(Arc::new(client))
    }

    #[cfg(not(feature = "google"))]
    fn build_remote(&self) -> Result<Arc<dyn SentimentBackend>> {
        Err(SentimeterError::Configuration(
            "remote backend not compiled in (enable the `google` feature)".to_string(),
        ))
    }

    fn build_local(&self) -> Arc<dyn SentimentBackend> {
        match self.lexical.build() {
            Ok(backend) => Arc::new(backend),
            Err(e) => {
                warn!(error = %e, "lexical sentiment backend failed to load; analyses will report errors");
                Arc::new(UnavailableBackend::new(
                    "lexical",
                    Thresholds::LEXICAL,
                    e.to_string(),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SentimentCategory;
    use std::path::PathBuf;

    #[test]
    fn missing_credentials_fall_back_and_flip_preference() {
        let selector = BackendSelector::new();
        let mut analysis = AnalysisConfig::default();
        assert!(analysis.prefer_remote);

        let classifier = selector.select(&mut analysis);

        assert_eq!(classifier.backend_name(), "lexical");
        assert_eq!(classifier.thresholds(), Thresholds::LEXICAL);
        assert!(!analysis.prefer_remote);
    }

    #[test]
    fn local_preference_never_touches_remote() {
        let selector = BackendSelector::new().api_key("AIza-test");
        let mut analysis = AnalysisConfig {
            prefer_remote: false,
            ..AnalysisConfig::default()
        };

        let classifier = selector.select(&mut analysis);
        assert_eq!(classifier.backend_name(), "lexical");
        assert!(!analysis.prefer_remote);
    }

    #[cfg(feature = "google")]
    #[test]
    fn credentials_select_remote_and_keep_preference() {
        let selector = BackendSelector::new().api_key("AIza-test");
        let mut analysis = AnalysisConfig::default();

        let classifier = selector.select(&mut analysis);
        assert_eq!(classifier.backend_name(), "google-nl");
        assert_eq!(classifier.thresholds(), Thresholds::REMOTE);
        assert!(analysis.prefer_remote);
    }

    #[tokio::test]
    async fn broken_lexicon_yields_fail_soft_classifier() {
        let selector = BackendSelector::new().lexical(LexicalConfig {
            lexicon_path: Some(PathBuf::from("/nonexistent/lexicon.json")),
        });
        let mut analysis = AnalysisConfig {
            prefer_remote: false,
            ..AnalysisConfig::default()
        };

        let classifier = selector.select(&mut analysis);
        let result = classifier.analyze("I love this").await;

        assert_eq!(result.category, SentimentCategory::Neutral);
        assert!(result.error.as_deref().unwrap().contains("lexicon"));
    }
}
