//! Google Cloud Natural Language client for document sentiment.
//!
//! Uses the REST `documents:analyzeSentiment` endpoint with an API key.
//! See: <https://cloud.google.com/natural-language/docs/reference/rest/v1/documents/analyzeSentiment>

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::traits::SentimentBackend;
use crate::types::{RawScore, Thresholds};
use crate::{Result, SentimeterError};

/// Default base URL for the Natural Language API
pub const DEFAULT_BASE_URL: &str = "https://language.googleapis.com";

/// Client for the Google Cloud Natural Language API.
///
/// Scores are in `[-1, 1]`; `magnitude` is the unbounded emotional
/// intensity of the whole document.
#[derive(Clone)]
pub struct GoogleNlClient {
    api_key: String,
    http: Client,
    base_url: String,
}

impl GoogleNlClient {
    /// Create a client against the public endpoint with no request timeout.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_options(api_key, DEFAULT_BASE_URL, None)
    }

    /// Create a client with a custom base URL (for testing with wiremock).
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        Self::with_options(api_key, base_url, None)
    }

    /// Create a client with a custom base URL and optional request timeout.
    ///
    /// Fails when the key is blank, so a missing credential surfaces at
    /// construction rather than on the first request.
    pub fn with_options(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(SentimeterError::MissingCredentials("google-nl"));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|e| {
            SentimeterError::Configuration(format!("Failed to build HTTP client: {e}"))
        })?;

        Ok(Self {
            api_key,
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Analyze the sentiment of a plain-text document.
    pub async fn analyze_sentiment(&self, text: &str) -> Result<RawScore> {
        let url = format!("{}/v1/documents:analyzeSentiment", self.base_url);
        let started = Instant::now();

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&AnalyzeSentimentRequest {
                document: Document {
                    kind: "PLAIN_TEXT",
                    content: text,
                },
                encoding_type: "UTF8",
            })
            .send()
            .await
            .map_err(|e| SentimeterError::Http(e.to_string()))?;

        let response = check_response(response).await?;

        let body: AnalyzeSentimentResponse = response
            .json()
            .await
            .map_err(|e| SentimeterError::DataError(format!("malformed sentiment response: {e}")))?;

        let sentiment = body
            .document_sentiment
            .ok_or(SentimeterError::EmptyResponse)?;

        debug!(
            score = sentiment.score,
            magnitude = sentiment.magnitude,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "google-nl sentiment"
        );

        Ok(RawScore {
            score: sentiment.score,
            magnitude: sentiment.magnitude,
        })
    }
}

/// Check response status and map to the appropriate error.
///
/// Google wraps failures in `{"error": {"code", "message", "status"}}`;
/// when that parses, its message is surfaced.
async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    match status.as_u16() {
        401 | 403 => Err(SentimeterError::AuthenticationFailed),
        429 => {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_secs);
            Err(SentimeterError::RateLimited { retry_after })
        }
        code => {
            let message = response
                .json::<ErrorEnvelope>()
                .await
                .ok()
                .map(|e| e.error.message)
                .unwrap_or_else(|| format!("Natural Language API error: {status}"));
            Err(SentimeterError::Api {
                status: code,
                message,
            })
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeSentimentRequest<'a> {
    document: Document<'a>,
    encoding_type: &'a str,
}

#[derive(Serialize)]
struct Document<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeSentimentResponse {
    document_sentiment: Option<DocumentSentiment>,
}

#[derive(Deserialize)]
struct DocumentSentiment {
    #[serde(default)]
    score: f64,
    #[serde(default)]
    magnitude: f64,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

// ============================================================================
// Backend Trait Implementation
// ============================================================================

#[async_trait]
impl SentimentBackend for GoogleNlClient {
    fn name(&self) -> &str {
        "google-nl"
    }

    fn thresholds(&self) -> Thresholds {
        Thresholds::REMOTE
    }

    async fn score(&self, text: &str) -> Result<RawScore> {
        self.analyze_sentiment(text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_key_is_rejected() {
        let err = GoogleNlClient::new("  ").err().unwrap();
        assert!(matches!(err, SentimeterError::MissingCredentials("google-nl")));
    }

    #[test]
    fn request_body_matches_api_shape() {
        let body = serde_json::to_value(AnalyzeSentimentRequest {
            document: Document {
                kind: "PLAIN_TEXT",
                content: "hello",
            },
            encoding_type: "UTF8",
        })
        .unwrap();
        assert_eq!(body["document"]["type"], "PLAIN_TEXT");
        assert_eq!(body["document"]["content"], "hello");
        assert_eq!(body["encodingType"], "UTF8");
    }

    #[test]
    fn parse_response_ignores_sentences() {
        let json = r#"{
            "documentSentiment": {"magnitude": 1.3, "score": 0.6},
            "language": "en",
            "sentences": [{"text": {"content": "hi", "beginOffset": 0}, "sentiment": {"magnitude": 0.6, "score": 0.6}}]
        }"#;
        let parsed: AnalyzeSentimentResponse = serde_json::from_str(json).unwrap();
        let sentiment = parsed.document_sentiment.unwrap();
        assert!((sentiment.score - 0.6).abs() < 1e-9);
        assert!((sentiment.magnitude - 1.3).abs() < 1e-9);
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = GoogleNlClient::with_base_url("k", "http://localhost:1234/").unwrap();
        assert_eq!(client.base_url, "http://localhost:1234");
    }
}
