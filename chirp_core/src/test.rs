use std::sync::Arc;

use chrono::{TimeZone, Utc};

use crate::cache::FeedCache;
use crate::error::Error;
use crate::model::{validate_content, Like, Tweet, MAX_CONTENT_CHARS};

fn tweet(id: &str, user_id: &str, content: &str) -> Tweet {
    Tweet {
        id: id.to_string(),
        user_id: user_id.to_string(),
        content: content.to_string(),
        likes: vec![],
        created_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
    }
}

fn like(user_id: &str, tweet_id: &str) -> Like {
    Like {
        user_id: user_id.to_string(),
        tweet_id: tweet_id.to_string(),
    }
}

#[test]
fn test_merge_like_adds_when_absent() {
    let original = tweet("t1", "u1", "hello");
    let merged = original.merge_like(&like("u2", "t1"));
    assert_eq!(merged.likes, vec![like("u2", "t1")]);
    assert_eq!(merged.id, original.id);
    assert_eq!(merged.content, original.content);
    assert_eq!(merged.created_at, original.created_at);
}

#[test]
fn test_merge_like_removes_when_present() {
    let mut original = tweet("t1", "u1", "hello");
    original.likes = vec![like("u2", "t1")];
    let merged = original.merge_like(&like("u2", "t1"));
    assert!(merged.likes.is_empty());
}

#[test]
fn test_merge_like_twice_restores_likes() {
    let mut original = tweet("t1", "u1", "hello");
    original.likes = vec![like("u2", "t1"), like("u3", "t1")];
    let result = like("u4", "t1");
    let round_trip = original.merge_like(&result).merge_like(&result);
    assert_eq!(round_trip, original);
}

#[test]
fn test_merge_like_preserves_other_likes_order() {
    let mut original = tweet("t1", "u1", "hello");
    original.likes = vec![like("u2", "t1"), like("u3", "t1"), like("u4", "t1")];
    let merged = original.merge_like(&like("u3", "t1"));
    assert_eq!(merged.likes, vec![like("u2", "t1"), like("u4", "t1")]);
}

#[test]
fn test_merge_like_does_not_mutate_input() {
    let mut original = tweet("t1", "u1", "hello");
    original.likes = vec![like("u2", "t1")];
    let before = original.clone();
    let _ = original.merge_like(&like("u3", "t1"));
    assert_eq!(original, before);
}

#[test]
fn test_validate_content_bounds() {
    assert!(validate_content("hello").is_ok());
    assert!(validate_content(&"の".repeat(MAX_CONTENT_CHARS)).is_ok());
    assert!(matches!(validate_content(""), Err(Error::InvalidContent(_))));
    assert!(matches!(
        validate_content(&"a".repeat(MAX_CONTENT_CHARS + 1)),
        Err(Error::InvalidContent(_))
    ));
}

#[test]
fn test_cache_set_and_get() {
    let mut cache = FeedCache::new();
    assert!(cache.get("u1").is_none());
    cache.set("u1", vec![Arc::new(tweet("t1", "u1", "hello"))]);
    let tweets = cache.get("u1").unwrap();
    assert_eq!(tweets.len(), 1);
    assert_eq!(tweets[0].id, "t1");
}

#[test]
fn test_cache_set_replaces_sequence() {
    let mut cache = FeedCache::new();
    cache.set("u1", vec![Arc::new(tweet("t1", "u1", "old"))]);
    cache.set("u1", vec![Arc::new(tweet("t2", "u1", "new"))]);
    let tweets = cache.get("u1").unwrap();
    assert_eq!(tweets.len(), 1);
    assert_eq!(tweets[0].id, "t2");
}

#[test]
fn test_cache_update_skips_unpopulated_feed() {
    let mut cache = FeedCache::new();
    cache.update("u1", |_| Some(vec![Arc::new(tweet("t1", "u1", "fabricated"))]));
    assert!(cache.get("u1").is_none());
}

#[test]
fn test_cache_update_unchanged_writes_nothing() {
    let mut cache = FeedCache::new();
    cache.set("u1", vec![Arc::new(tweet("t1", "u1", "hello"))]);
    let before = cache.get("u1").unwrap().as_ptr();
    cache.update("u1", |_| None);
    assert_eq!(before, cache.get("u1").unwrap().as_ptr());
}

#[test]
fn test_cache_prepend_puts_tweet_first() {
    let mut cache = FeedCache::new();
    cache.set("u1", vec![Arc::new(tweet("t1", "u1", "first"))]);
    cache.prepend("u1", tweet("t2", "u1", "second"));
    let ids = cache.get("u1").unwrap().iter().map(|t| t.id.clone()).collect::<Vec<_>>();
    assert_eq!(ids, vec!["t2", "t1"]);
}

#[test]
fn test_cache_prepend_shares_existing_tweets() {
    let mut cache = FeedCache::new();
    cache.set("u1", vec![Arc::new(tweet("t1", "u1", "first"))]);
    let before = cache.get("u1").unwrap()[0].clone();
    cache.prepend("u1", tweet("t2", "u1", "second"));
    assert!(Arc::ptr_eq(&before, &cache.get("u1").unwrap()[1]));
}

#[test]
fn test_cache_prepend_without_feed_is_noop() {
    let mut cache = FeedCache::new();
    cache.prepend("u1", tweet("t1", "u1", "hello"));
    assert!(cache.get("u1").is_none());
}

#[test]
fn test_cache_toggle_like_round_trip() {
    let mut cache = FeedCache::new();
    cache.set("u1", vec![Arc::new(tweet("t1", "u1", "hello"))]);

    cache.toggle_like("u1", &like("u2", "t1"));
    assert_eq!(cache.get("u1").unwrap()[0].likes, vec![like("u2", "t1")]);

    cache.toggle_like("u1", &like("u2", "t1"));
    assert!(cache.get("u1").unwrap()[0].likes.is_empty());
}

#[test]
fn test_cache_toggle_like_rebuilds_only_target() {
    let mut cache = FeedCache::new();
    cache.set(
        "u1",
        vec![Arc::new(tweet("t1", "u1", "first")), Arc::new(tweet("t2", "u1", "second"))],
    );
    let untouched = cache.get("u1").unwrap()[1].clone();
    cache.toggle_like("u1", &like("u2", "t1"));
    let tweets = cache.get("u1").unwrap();
    assert!(tweets[0].liked_by("u2"));
    assert!(Arc::ptr_eq(&untouched, &tweets[1]));
}

#[test]
fn test_cache_toggle_like_missing_tweet_keeps_handles() {
    let mut cache = FeedCache::new();
    cache.set(
        "u1",
        vec![Arc::new(tweet("t1", "u1", "first")), Arc::new(tweet("t2", "u1", "second"))],
    );
    let before = cache.get("u1").unwrap().to_vec();
    let buffer = cache.get("u1").unwrap().as_ptr();
    cache.toggle_like("u1", &like("u2", "t9"));
    let after = cache.get("u1").unwrap();
    // The sequence itself is untouched, not just its elements.
    assert_eq!(buffer, after.as_ptr());
    assert_eq!(before.len(), after.len());
    for (old, new) in before.iter().zip(after.iter()) {
        assert!(Arc::ptr_eq(old, new));
    }
}

#[test]
fn test_cache_invalidate_drops_entry() {
    let mut cache = FeedCache::new();
    cache.set("u1", vec![Arc::new(tweet("t1", "u1", "hello"))]);
    cache.invalidate("u1");
    assert!(cache.get("u1").is_none());
}
