//! Telemetry metric name constants.
//!
//! Centralised metric names for sentimeter operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `sentimeter_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `backend`: scoring backend name (e.g. "google-nl", "lexical")
//! - `status`: "ok" or "error"
//! - `from` / `to`: backends involved in a selector fallback

/// Total comments scored by a classifier.
///
/// Labels: `backend`, `status` ("ok" | "error").
pub const ANALYSES_TOTAL: &str = "sentimeter_analyses_total";

/// Duration of a single backend scoring call in seconds.
///
/// Labels: `backend`.
pub const ANALYSIS_DURATION_SECONDS: &str = "sentimeter_analysis_duration_seconds";

/// Total times the selector downgraded from the remote backend.
///
/// Labels: `from`, `to`.
pub const BACKEND_FALLBACKS_TOTAL: &str = "sentimeter_backend_fallbacks_total";

/// Total comments skipped by the pipeline because their text was empty.
pub const COMMENTS_SKIPPED_TOTAL: &str = "sentimeter_comments_skipped_total";

/// Total score cache hits.
///
/// Labels: `backend`.
pub const CACHE_HITS_TOTAL: &str = "sentimeter_cache_hits_total";

/// Total score cache misses.
///
/// Labels: `backend`.
pub const CACHE_MISSES_TOTAL: &str = "sentimeter_cache_misses_total";

/// Total failed snapshot writes (best-effort persistence).
pub const SNAPSHOT_FAILURES_TOTAL: &str = "sentimeter_snapshot_failures_total";
