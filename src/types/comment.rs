//! Comment and video records handed in by the retrieval collaborator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::sentiment::SentimentResult;

/// A top-level comment on a video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub author: String,
    #[serde(default, alias = "likes")]
    pub like_count: u64,
    pub published_at: Option<DateTime<Utc>>,
}

impl Comment {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            author: String::new(),
            like_count: 0,
            published_at: None,
        }
    }

    /// Whether there is anything to classify.
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

/// A comment together with its sentiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedComment {
    #[serde(flatten)]
    pub comment: Comment,
    pub sentiment: SentimentResult,
}

/// Video metadata, used for tag statistics and the comment-limit flag.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, alias = "comments")]
    pub comment_count: u64,
    #[serde(default, alias = "likes")]
    pub like_count: u64,
    #[serde(default, alias = "views")]
    pub view_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_accepts_likes_alias() {
        let json = r#"{
            "id": "c1",
            "text": "nice",
            "author": "someone",
            "likes": 4,
            "published_at": "2024-03-01T12:00:00Z"
        }"#;
        let comment: Comment = serde_json::from_str(json).unwrap();
        assert_eq!(comment.like_count, 4);
        assert!(comment.published_at.is_some());
    }

    #[test]
    fn whitespace_only_text_is_empty() {
        assert!(!Comment::new("c1", "   \n").has_text());
        assert!(!Comment::new("c2", "").has_text());
        assert!(Comment::new("c3", "ok").has_text());
    }

    #[test]
    fn analyzed_comment_flattens_fields() {
        let analyzed = AnalyzedComment {
            comment: Comment::new("c1", "great"),
            sentiment: SentimentResult::failed("offline"),
        };
        let json = serde_json::to_value(&analyzed).unwrap();
        assert_eq!(json["id"], "c1");
        assert_eq!(json["text"], "great");
        assert_eq!(json["sentiment"]["category"], "neutral");
    }
}
