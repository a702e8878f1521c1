use std::collections::HashMap;
use std::sync::Arc;

use crate::model::{Like, Tweet};

/// Ordered tweet sequences cached per profile, keyed by the profile's user id.
///
/// Sequences hold `Arc<Tweet>` handles, so a transform reallocates only the
/// tweets it actually changes; everything else is shared between the old and
/// the new sequence, and `Arc::ptr_eq` gives the client cheap change
/// detection. Order is whatever the populating fetch delivered; the cache
/// preserves it but never computes it.
#[derive(Debug, Clone, Default)]
pub struct FeedCache {
    feeds: HashMap<String, Vec<Arc<Tweet>>>,
}

impl FeedCache {
    pub fn new() -> Self {
        Self { feeds: HashMap::new() }
    }

    /// Cached sequence for a profile, if a fetch has populated it.
    pub fn get(&self, user_id: &str) -> Option<&[Arc<Tweet>]> {
        self.feeds.get(user_id).map(|tweets| tweets.as_slice())
    }

    /// Replace the whole sequence for a profile, creating the entry if needed.
    pub fn set(&mut self, user_id: &str, tweets: Vec<Arc<Tweet>>) {
        tracing::info!("Cached {} tweets for user {}", tweets.len(), user_id);
        self.feeds.insert(user_id.to_string(), tweets);
    }

    /// Drop the cached sequence for a profile. The entry stays absent until
    /// a fetch repopulates it.
    pub fn invalidate(&mut self, user_id: &str) {
        if self.feeds.remove(user_id).is_some() {
            tracing::info!("Invalidated cached feed for user {}", user_id);
        }
    }

    /// Apply a pure transform to an existing sequence. A transform that
    /// returns `None` declares the sequence unchanged and nothing is written.
    ///
    /// If the profile has never been populated by a real fetch, the transform
    /// is not applied: materializing a feed from a mutation side-effect would
    /// fabricate a stale feed, so absent entries stay absent.
    pub fn update<F>(&mut self, user_id: &str, transform: F)
    where
        F: FnOnce(&[Arc<Tweet>]) -> Option<Vec<Arc<Tweet>>>,
    {
        match self.feeds.get_mut(user_id) {
            Some(tweets) => {
                if let Some(next) = transform(tweets.as_slice()) {
                    *tweets = next;
                }
            }
            None => tracing::warn!("No cached feed for user {}, dropping update", user_id),
        }
    }

    /// Put a freshly created tweet at the front of its owner's feed.
    /// Untouched when the owner's feed has never been populated.
    pub fn prepend(&mut self, user_id: &str, tweet: Tweet) {
        self.update(user_id, |tweets| {
            let mut next = Vec::with_capacity(tweets.len() + 1);
            next.push(Arc::new(tweet));
            next.extend(tweets.iter().cloned());
            Some(next)
        });
    }

    /// Reflect a confirmed like toggle on the tweet it targets.
    /// A tweet id missing from the sequence leaves the sequence untouched.
    pub fn toggle_like(&mut self, user_id: &str, like: &Like) {
        self.update(user_id, |tweets| {
            let Some(index) = tweets.iter().position(|t| t.id == like.tweet_id) else {
                tracing::warn!("Tweet {} not cached for user {}, skipping like merge", like.tweet_id, user_id);
                return None;
            };
            let mut next = tweets.to_vec();
            next[index] = Arc::new(tweets[index].merge_like(like));
            Some(next)
        });
    }
}
