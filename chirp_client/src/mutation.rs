use std::sync::{Arc, Mutex};

use tokio::sync::RwLock;

use chirp_core::model::validate_content;
use chirp_core::{Error, FeedCache, Result};

use crate::service::{LikeService, SessionProvider, TweetService};

/// Lifecycle of one mutation kind. `Success` and `Failure` are resting
/// states; a new submission may begin from any state except `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MutationState {
    #[default]
    Idle,
    Pending,
    Success,
    Failure,
}

/// Outcome of a submission attempt as seen by the view binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// The request was issued, confirmed, and the cache reflects it.
    Accepted,
    /// A request of the same kind is still in flight; nothing was sent.
    Busy,
}

/// Per-mutation-kind in-flight guard.
#[derive(Debug, Default)]
struct MutationGate {
    state: Mutex<MutationState>,
}

impl MutationGate {
    fn current(&self) -> MutationState {
        *self.state.lock().unwrap()
    }

    /// Move to `Pending` unless a request is already in flight.
    /// The check and the transition are one atomic step.
    fn try_begin(&self) -> bool {
        let mut state = self.state.lock().unwrap();
        if *state == MutationState::Pending {
            return false;
        }
        *state = MutationState::Pending;
        true
    }

    fn finish(&self, success: bool) {
        let mut state = self.state.lock().unwrap();
        *state = if success {
            MutationState::Success
        } else {
            MutationState::Failure
        };
    }
}

/// Issues the two feed mutations and applies their confirmed results to the
/// shared cache.
///
/// At most one request per mutation kind is in flight at any time, and the
/// cache is only written after the server has acknowledged a mutation, so it
/// never shows state the server hasn't confirmed. Completions are applied in
/// the order they arrive; the per-kind gate narrows, but cannot fully remove,
/// the window in which two toggles for the same tweet reorder on the wire.
/// There is no cancellation: a request that never resolves leaves its kind
/// `Pending` for the life of the coordinator.
pub struct MutationCoordinator {
    session: Arc<dyn SessionProvider>,
    tweets: Arc<dyn TweetService>,
    likes: Arc<dyn LikeService>,
    cache: Arc<RwLock<FeedCache>>,
    post_gate: MutationGate,
    like_gate: MutationGate,
}

impl MutationCoordinator {
    pub fn new(
        session: Arc<dyn SessionProvider>,
        tweets: Arc<dyn TweetService>,
        likes: Arc<dyn LikeService>,
        cache: Arc<RwLock<FeedCache>>,
    ) -> Self {
        Self {
            session,
            tweets,
            likes,
            cache,
            post_gate: MutationGate::default(),
            like_gate: MutationGate::default(),
        }
    }

    pub fn post_status(&self) -> MutationState {
        self.post_gate.current()
    }

    pub fn like_status(&self) -> MutationState {
        self.like_gate.current()
    }

    pub fn is_posting(&self) -> bool {
        self.post_status() == MutationState::Pending
    }

    /// Whether a like toggle would pass the sign-in gate.
    pub fn can_like(&self) -> bool {
        self.session.current_user_id().is_some()
    }

    /// Create a tweet and put it at the front of its owner's cached feed.
    ///
    /// Content is validated before anything is sent. A call while a previous
    /// submission is pending sends nothing and reports `Busy`. On failure the
    /// cache is untouched; nothing was written optimistically, so there is
    /// nothing to roll back.
    pub async fn submit_tweet(&self, content: &str) -> Result<Submission> {
        validate_content(content)?;
        if !self.post_gate.try_begin() {
            tracing::warn!("Tweet submission already pending, ignoring");
            return Ok(Submission::Busy);
        }
        match self.tweets.create(content).await {
            Ok(tweet) => {
                let owner = tweet.user_id.clone();
                tracing::info!("Created tweet {} for user {}", tweet.id, owner);
                self.cache.write().await.prepend(&owner, tweet);
                self.post_gate.finish(true);
                Ok(Submission::Accepted)
            }
            Err(err) => {
                self.post_gate.finish(false);
                Err(err)
            }
        }
    }

    /// Toggle the viewer's like on a tweet in the given profile's feed.
    ///
    /// Rejected before any request is issued when no user is signed in, and
    /// reported as `Busy` while a previous toggle is pending. The confirmed
    /// result is merged into the cached tweet; a tweet id missing from the
    /// cache makes the merge a no-op.
    pub async fn submit_like_toggle(&self, feed_user_id: &str, tweet_id: &str) -> Result<Submission> {
        if self.session.current_user_id().is_none() {
            return Err(Error::NotLoggedIn("liking a tweet requires a signed-in user".to_string()));
        }
        if !self.like_gate.try_begin() {
            tracing::warn!("Like toggle already pending, ignoring");
            return Ok(Submission::Busy);
        }
        match self.likes.toggle(tweet_id).await {
            Ok(like) => {
                tracing::info!("Toggled like on tweet {} by user {}", like.tweet_id, like.user_id);
                self.cache.write().await.toggle_like(feed_user_id, &like);
                self.like_gate.finish(true);
                Ok(Submission::Accepted)
            }
            Err(err) => {
                self.like_gate.finish(false);
                Err(err)
            }
        }
    }
}
