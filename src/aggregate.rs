//! Batch statistics over classified comments and fetched videos.
//!
//! Everything here is a pure function of its input.

use std::collections::HashMap;

use crate::types::{SentimentCategory, SentimentResult, SentimentStats, TagCount, Video};

/// Most comments analyzed per video.
pub const MAX_BATCH_COMMENTS: usize = 50;

/// Number of tags the dashboard shows.
pub const DEFAULT_TAG_LIMIT: usize = 20;

/// Category distribution over a batch of results.
///
/// Percentages are floored, so they may sum to slightly less than 100.
/// An empty batch yields all-zero stats.
pub fn aggregate<'a, I>(results: I) -> SentimentStats
where
    I: IntoIterator<Item = &'a SentimentResult>,
{
    let mut stats = SentimentStats::default();
    for result in results {
        stats.total += 1;
        match result.category {
            SentimentCategory::Positive => stats.positive_count += 1,
            SentimentCategory::Neutral => stats.neutral_count += 1,
            SentimentCategory::Negative => stats.negative_count += 1,
        }
    }

    stats.positive_percent = percent(stats.positive_count, stats.total);
    stats.neutral_percent = percent(stats.neutral_count, stats.total);
    stats.negative_percent = percent(stats.negative_count, stats.total);
    stats
}

/// `floor(count / total * 100)`, or 0 for an empty batch.
fn percent(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (count * 100 / total) as u32
}

/// Most frequent video tags.
///
/// Tags are trimmed and lowercased before counting; blank tags are
/// ignored. Ordered by count descending, then tag ascending.
pub fn tag_frequency(videos: &[Video], limit: usize) -> Vec<TagCount> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for tag in videos.iter().flat_map(|v| v.tags.iter()) {
        let tag = tag.trim().to_lowercase();
        if tag.is_empty() {
            continue;
        }
        *counts.entry(tag).or_insert(0) += 1;
    }

    let mut tags: Vec<TagCount> = counts
        .into_iter()
        .map(|(tag, count)| TagCount { tag, count })
        .collect();
    tags.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
    tags.truncate(limit);
    tags
}

/// Whether the video has more comments than one batch analyzes.
pub fn comments_limited(video: &Video) -> bool {
    video.comment_count > MAX_BATCH_COMMENTS as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(category: SentimentCategory) -> SentimentResult {
        SentimentResult {
            score: 0.0,
            magnitude: 0.0,
            category,
            error: None,
        }
    }

    #[test]
    fn empty_batch_is_all_zero() {
        let empty: Vec<SentimentResult> = Vec::new();
        assert_eq!(aggregate(&empty), SentimentStats::default());
    }

    #[test]
    fn one_of_each_is_a_third() {
        let results = [
            result(SentimentCategory::Positive),
            result(SentimentCategory::Negative),
            result(SentimentCategory::Neutral),
        ];
        let stats = aggregate(&results);
        assert_eq!(stats.total, 3);
        assert_eq!(
            (stats.positive_count, stats.neutral_count, stats.negative_count),
            (1, 1, 1)
        );
        assert_eq!(
            (stats.positive_percent, stats.neutral_percent, stats.negative_percent),
            (33, 33, 33)
        );
    }

    #[test]
    fn percentages_are_floored() {
        let mut results = vec![result(SentimentCategory::Positive); 2];
        results.extend(vec![result(SentimentCategory::Negative); 1]);
        let stats = aggregate(&results);
        assert_eq!(stats.positive_percent, 66);
        assert_eq!(stats.negative_percent, 33);
        assert_eq!(stats.neutral_percent, 0);
    }

    #[test]
    fn counts_always_sum_to_total() {
        let categories = [
            SentimentCategory::Positive,
            SentimentCategory::Neutral,
            SentimentCategory::Negative,
        ];
        for n in 0..40 {
            let results: Vec<_> = (0..n).map(|i| result(categories[(i * 7) % 3])).collect();
            let stats = aggregate(&results);
            assert_eq!(
                stats.positive_count + stats.neutral_count + stats.negative_count,
                stats.total
            );
            let percent_sum =
                stats.positive_percent + stats.neutral_percent + stats.negative_percent;
            if n > 0 {
                assert!((98..=100).contains(&percent_sum), "n={n} sum={percent_sum}");
            }
        }
    }

    #[test]
    fn aggregate_is_idempotent() {
        let results = vec![
            result(SentimentCategory::Positive),
            SentimentResult::failed("offline"),
        ];
        assert_eq!(aggregate(&results), aggregate(&results));
    }

    #[test]
    fn failed_results_count_as_neutral() {
        let stats = aggregate(&[SentimentResult::failed("quota")]);
        assert_eq!(stats.neutral_count, 1);
        assert_eq!(stats.neutral_percent, 100);
    }

    #[test]
    fn tag_frequency_normalizes_and_orders() {
        let videos = vec![
            Video {
                id: "a".into(),
                tags: vec!["Privacy".into(), " GDPR ".into(), "security".into()],
                ..Video::default()
            },
            Video {
                id: "b".into(),
                tags: vec!["privacy".into(), "gdpr".into(), "".into()],
                ..Video::default()
            },
            Video {
                id: "c".into(),
                tags: vec!["PRIVACY".into(), "ads".into()],
                ..Video::default()
            },
        ];

        let tags = tag_frequency(&videos, DEFAULT_TAG_LIMIT);
        let pairs: Vec<(&str, usize)> = tags.iter().map(|t| (t.tag.as_str(), t.count)).collect();
        assert_eq!(
            pairs,
            vec![("privacy", 3), ("gdpr", 2), ("ads", 1), ("security", 1)]
        );

        assert_eq!(tag_frequency(&videos, 1).len(), 1);
    }

    #[test]
    fn comment_limit_flag() {
        let mut video = Video {
            comment_count: 50,
            ..Video::default()
        };
        assert!(!comments_limited(&video));
        video.comment_count = 51;
        assert!(comments_limited(&video));
    }
}
