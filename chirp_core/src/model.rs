use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Maximum tweet length in characters, matching the composer's limit.
pub const MAX_CONTENT_CHARS: usize = 140;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
}

/// A like relationship between one user and one tweet.
/// A tweet holds at most one like per user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Like {
    pub user_id: String,
    pub tweet_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tweet {
    pub id: String,
    pub user_id: String,
    pub content: String,
    pub likes: Vec<Like>,
    pub created_at: DateTime<Utc>,
}

/// Check tweet content against the composer's limits before submission.
/// The cache never validates; this is the submitting caller's job.
pub fn validate_content(content: &str) -> Result<()> {
    let count = content.chars().count();
    if count == 0 {
        return Err(Error::InvalidContent("tweet content is empty".to_string()));
    }
    if count > MAX_CONTENT_CHARS {
        return Err(Error::InvalidContent(format!(
            "tweet content has {} characters, limit is {}",
            count, MAX_CONTENT_CHARS
        )));
    }
    Ok(())
}

impl Tweet {
    /// Whether `user_id` currently likes this tweet.
    pub fn liked_by(&self, user_id: &str) -> bool {
        self.likes.iter().any(|like| like.user_id == user_id)
    }

    /// Reflect a confirmed like toggle into this tweet's like set.
    ///
    /// The like service only reports that a toggle occurred; the direction is
    /// inferred here from the cached state. A like by the same user already
    /// present means the toggle was an unlike and that entry is removed,
    /// otherwise the incoming like is appended. Every other field carries
    /// over unchanged and the receiver is never mutated, so applying the same
    /// result twice restores the original like set.
    ///
    /// Note: inferring the direction from local state can diverge from the
    /// server when two toggles for the same user and tweet complete out of
    /// order; the mutation layer's in-flight guard narrows that window.
    pub fn merge_like(&self, like: &Like) -> Tweet {
        let mut likes = self.likes.clone();
        match likes.iter().position(|l| l.user_id == like.user_id) {
            Some(index) => {
                likes.remove(index);
            }
            None => likes.push(like.clone()),
        }
        Tweet {
            id: self.id.clone(),
            user_id: self.user_id.clone(),
            content: self.content.clone(),
            likes,
            created_at: self.created_at,
        }
    }
}
