//! End-to-end batch pipeline tests with the local backend.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use sentimeter::config::{AnalysisConfig, LexicalConfig};
use sentimeter::storage::BlobInfo;
use sentimeter::{
    AnalyzedComment, BackendSelector, CacheConfig, Comment, FsSnapshotStore, Result,
    SentimentCategory, SentimentPipeline, SentimentStats, SentimeterError, SnapshotStore, Video,
};

fn scenario() -> Vec<Comment> {
    vec![
        Comment::new("c1", "I love this, great job!"),
        Comment::new("c2", "I hate this, terrible."),
        Comment::new("c3", "It is Tuesday."),
    ]
}

fn local_only() -> AnalysisConfig {
    AnalysisConfig {
        prefer_remote: false,
        ..AnalysisConfig::default()
    }
}

/// Store whose every operation fails.
struct BrokenStore {
    saves: AtomicUsize,
}

#[async_trait]
impl SnapshotStore for BrokenStore {
    fn bucket(&self) -> &str {
        "broken"
    }

    async fn save_comments(&self, _video_id: &str, _comments: &[AnalyzedComment]) -> Result<String> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        Err(SentimeterError::Storage("bucket does not exist".into()))
    }

    async fn save_videos(&self, _videos: &[Video]) -> Result<String> {
        Err(SentimeterError::Storage("bucket does not exist".into()))
    }

    async fn load(&self, _blob: &str) -> Result<serde_json::Value> {
        Err(SentimeterError::Storage("bucket does not exist".into()))
    }

    async fn list(&self, _prefix: Option<&str>) -> Result<Vec<String>> {
        Err(SentimeterError::Storage("bucket does not exist".into()))
    }

    async fn metadata(&self, _blob: &str) -> Result<BlobInfo> {
        Err(SentimeterError::Storage("bucket does not exist".into()))
    }

    async fn delete(&self, _blob: &str) -> Result<()> {
        Err(SentimeterError::Storage("bucket does not exist".into()))
    }
}

#[tokio::test]
async fn scenario_batch_with_local_backend() {
    let pipeline = SentimentPipeline::default();
    let mut analysis = local_only();

    let outcome = pipeline.process(scenario(), &mut analysis).await;

    let categories: Vec<SentimentCategory> = outcome
        .comments
        .iter()
        .map(|c| c.sentiment.category)
        .collect();
    assert_eq!(
        categories,
        [
            SentimentCategory::Positive,
            SentimentCategory::Negative,
            SentimentCategory::Neutral,
        ]
    );
    assert_eq!(
        outcome.stats,
        SentimentStats {
            total: 3,
            positive_count: 1,
            neutral_count: 1,
            negative_count: 1,
            positive_percent: 33,
            neutral_percent: 33,
            negative_percent: 33,
        }
    );
    assert!(outcome.comments.iter().all(|c| c.sentiment.error.is_none()));
}

#[tokio::test]
async fn missing_credentials_fall_back_to_local_and_stay_there() {
    // No API key configured: remote construction fails.
    let pipeline = SentimentPipeline::new(BackendSelector::new());
    let mut analysis = AnalysisConfig::default();
    assert!(analysis.prefer_remote);

    let first = pipeline.process(scenario(), &mut analysis).await;
    assert!(!analysis.prefer_remote);
    assert_eq!(first.stats.positive_count, 1);
    assert_eq!(first.stats.negative_count, 1);

    // The downgraded preference carries over to the next batch.
    let second = pipeline.process(scenario(), &mut analysis).await;
    assert!(!analysis.prefer_remote);
    assert_eq!(first.stats, second.stats);
}

#[tokio::test]
async fn empty_text_comments_are_excluded_from_output_and_stats() {
    let pipeline = SentimentPipeline::default();
    let mut comments = scenario();
    comments.insert(1, Comment::new("blank", ""));
    comments.push(Comment::new("spaces", "  \t "));

    let outcome = pipeline.process(comments, &mut local_only()).await;

    assert_eq!(outcome.stats.total, 3);
    assert!(outcome.comments.iter().all(|c| c.comment.has_text()));
    let stats = outcome.stats;
    assert_eq!(
        stats.positive_count + stats.neutral_count + stats.negative_count,
        stats.total
    );
}

#[tokio::test]
async fn all_empty_batch_is_all_zero() {
    let pipeline = SentimentPipeline::default();
    let comments = vec![Comment::new("a", ""), Comment::new("b", " ")];

    let outcome = pipeline.process(comments, &mut local_only()).await;

    assert!(outcome.comments.is_empty());
    assert_eq!(outcome.stats, SentimentStats::default());
}

#[tokio::test]
async fn broken_lexicon_reports_errors_but_keeps_stats() {
    let selector = BackendSelector::new().lexical(LexicalConfig {
        lexicon_path: Some("/nonexistent/lexicon.json".into()),
    });
    let pipeline = SentimentPipeline::new(selector);

    let outcome = pipeline.process(scenario(), &mut local_only()).await;

    assert_eq!(outcome.stats.total, 3);
    assert_eq!(outcome.stats.neutral_count, 3);
    assert_eq!(outcome.stats.neutral_percent, 100);
    assert!(outcome.comments.iter().all(|c| c.sentiment.is_error()));
}

#[tokio::test]
async fn cached_pipeline_matches_uncached() {
    let plain = SentimentPipeline::default();
    let cached = SentimentPipeline::new(BackendSelector::new().cache(CacheConfig::default()));

    let a = plain.process(scenario(), &mut local_only()).await;
    let b = cached.process(scenario(), &mut local_only()).await;

    assert_eq!(a, b);
}

#[tokio::test]
async fn store_failure_does_not_change_outcome() {
    let pipeline = SentimentPipeline::default();
    let store = BrokenStore {
        saves: AtomicUsize::new(0),
    };

    let stored = pipeline
        .process_and_store(scenario(), "vid1", &mut local_only(), &store)
        .await;
    let plain = pipeline.process(scenario(), &mut local_only()).await;

    assert_eq!(stored, plain);
    assert_eq!(store.saves.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn empty_outcome_is_not_stored() {
    let pipeline = SentimentPipeline::default();
    let store = BrokenStore {
        saves: AtomicUsize::new(0),
    };

    let outcome = pipeline
        .process_and_store(vec![Comment::new("a", "")], "vid1", &mut local_only(), &store)
        .await;

    assert_eq!(outcome.stats.total, 0);
    assert_eq!(store.saves.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn snapshot_round_trips_through_filesystem_store() {
    let root = tempfile::tempdir().unwrap();
    let store = FsSnapshotStore::open(root.path(), "comment-snapshots")
        .await
        .unwrap();
    let pipeline = SentimentPipeline::default();

    let outcome = pipeline
        .process_and_store(scenario(), "dQw4w9WgXcQ", &mut local_only(), &store)
        .await;

    let blobs = store.list(Some("comments_dQw4w9WgXcQ_")).await.unwrap();
    assert_eq!(blobs.len(), 1);

    let saved: Vec<AnalyzedComment> =
        serde_json::from_value(store.load(&blobs[0]).await.unwrap()).unwrap();
    assert_eq!(saved.len(), outcome.comments.len());
    for (saved, original) in saved.iter().zip(&outcome.comments) {
        assert_eq!(saved.comment, original.comment);
        assert_eq!(saved.sentiment.category, original.sentiment.category);
    }
}

#[tokio::test]
async fn unusable_storage_root_still_yields_outcome() {
    let not_a_dir = tempfile::NamedTempFile::new().unwrap();
    let store = FsSnapshotStore::open_best_effort(not_a_dir.path(), "comment-snapshots").await;
    assert!(store.is_none());

    let pipeline = SentimentPipeline::default();
    let outcome = match store {
        Some(store) => {
            pipeline
                .process_and_store(scenario(), "vid1", &mut local_only(), &store)
                .await
        }
        None => pipeline.process(scenario(), &mut local_only()).await,
    };

    assert_eq!(outcome.stats.total, 3);
    assert_eq!(outcome.stats.positive_count, 1);
}

#[tokio::test]
async fn leading_negations_do_not_flip_later_praise() {
    let pipeline = SentimentPipeline::default();
    let comments = vec![
        Comment::new("a", "No way, this is amazing!"),
        Comment::new("b", "I don't know why but I love this"),
        Comment::new("c", "Never seen this before. Great video"),
    ];

    let outcome = pipeline.process(comments, &mut local_only()).await;

    assert!(
        outcome
            .comments
            .iter()
            .all(|c| c.sentiment.category == SentimentCategory::Positive),
        "{:?}",
        outcome.comments
    );
    assert_eq!(outcome.stats.positive_percent, 100);
}
