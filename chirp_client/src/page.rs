use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

use chirp_core::model::{Tweet, User};
use chirp_core::{Error, FeedCache, Result};

use crate::mutation::MutationCoordinator;
use crate::service::{LikeService, SessionProvider, TweetService, UserDirectory};

/// Load status of the profile behind the page.
/// `NotFound` is terminal; the page never retries the lookup.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProfileState {
    Loading,
    NotFound,
    Ready { user: User },
}

/// One cached tweet prepared for display.
#[derive(Debug, Clone, Serialize)]
pub struct TweetView {
    pub id: String,
    pub user_id: String,
    pub content: String,
    pub like_count: usize,
    pub liked_by_viewer: bool,
    pub created_at: DateTime<Utc>,
}

/// Snapshot of the whole page for the client to render.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    pub state: ProfileState,
    pub tweets: Vec<TweetView>,
    pub is_loading_tweets: bool,
    /// The composer is only offered to the profile's owner.
    pub can_post: bool,
    pub is_posting: bool,
    pub can_like: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

/// Binds one profile's feed to the cache and the mutation coordinator.
///
/// The page reads whatever the cache currently holds and dispatches user
/// actions into the coordinator; mutation failures never escape it, they
/// surface as a user-facing notice on the next view.
pub struct ProfilePage {
    user_id: String,
    session: Arc<dyn SessionProvider>,
    directory: Arc<dyn UserDirectory>,
    tweets: Arc<dyn TweetService>,
    coordinator: MutationCoordinator,
    cache: Arc<RwLock<FeedCache>>,
    state: ProfileState,
    loaded_tweets: bool,
    notice: Option<String>,
}

impl ProfilePage {
    pub fn new(
        user_id: impl Into<String>,
        session: Arc<dyn SessionProvider>,
        directory: Arc<dyn UserDirectory>,
        tweets: Arc<dyn TweetService>,
        likes: Arc<dyn LikeService>,
    ) -> Self {
        let cache = Arc::new(RwLock::new(FeedCache::new()));
        let coordinator =
            MutationCoordinator::new(session.clone(), tweets.clone(), likes, cache.clone());
        Self {
            user_id: user_id.into(),
            session,
            directory,
            tweets,
            coordinator,
            cache,
            state: ProfileState::Loading,
            loaded_tweets: false,
            notice: None,
        }
    }

    /// Shared cache handle, for callers that keep the cache alive across
    /// page instances.
    pub fn cache(&self) -> Arc<RwLock<FeedCache>> {
        self.cache.clone()
    }

    /// Fetch the profile and its feed.
    ///
    /// An unknown user id is a terminal `NotFound`. The feed fetch populates
    /// the cache wholesale; only later mutations go through the incremental
    /// path.
    pub async fn load(&mut self) -> Result<()> {
        self.state = ProfileState::Loading;
        let user = match self.directory.get_by_user_id(&self.user_id).await? {
            Some(user) => user,
            None => {
                tracing::warn!("User {} not found", self.user_id);
                self.state = ProfileState::NotFound;
                return Ok(());
            }
        };
        let tweets = self.tweets.list_by_user_id(&self.user_id).await?;
        self.cache
            .write()
            .await
            .set(&self.user_id, tweets.into_iter().map(Arc::new).collect());
        self.loaded_tweets = true;
        self.state = ProfileState::Ready { user };
        Ok(())
    }

    /// Submit the composer's content. Failures become a notice instead of
    /// escaping to the caller.
    pub async fn post(&mut self, content: &str) {
        self.notice = None;
        if let Err(err) = self.coordinator.submit_tweet(content).await {
            tracing::warn!("Tweet submission failed: {}", err);
            self.notice = Some(notice_for(&err));
        }
    }

    /// Toggle the viewer's like on a tweet of this profile. Failures become
    /// a notice, including the sign-in prompt for anonymous viewers.
    pub async fn toggle_like(&mut self, tweet_id: &str) {
        self.notice = None;
        if let Err(err) = self.coordinator.submit_like_toggle(&self.user_id, tweet_id).await {
            tracing::warn!("Like toggle failed: {}", err);
            self.notice = Some(notice_for(&err));
        }
    }

    pub async fn view(&self) -> ProfileView {
        let viewer = self.session.current_user_id();
        let cache = self.cache.read().await;
        let tweets = cache
            .get(&self.user_id)
            .unwrap_or(&[])
            .iter()
            .map(|tweet| tweet_view(tweet, viewer.as_deref()))
            .collect();
        ProfileView {
            state: self.state.clone(),
            tweets,
            is_loading_tweets: !self.loaded_tweets,
            can_post: viewer.as_deref() == Some(self.user_id.as_str()),
            is_posting: self.coordinator.is_posting(),
            can_like: self.coordinator.can_like(),
            notice: self.notice.clone(),
        }
    }
}

fn tweet_view(tweet: &Tweet, viewer: Option<&str>) -> TweetView {
    TweetView {
        id: tweet.id.clone(),
        user_id: tweet.user_id.clone(),
        content: tweet.content.clone(),
        like_count: tweet.likes.len(),
        liked_by_viewer: viewer.map(|v| tweet.liked_by(v)).unwrap_or(false),
        created_at: tweet.created_at,
    }
}

fn notice_for(err: &Error) -> String {
    match err {
        Error::NotLoggedIn(_) => "Please sign in to like tweets.".to_string(),
        Error::InvalidContent(_) => "Tweets must be between 1 and 140 characters.".to_string(),
        Error::ObjectNotFound(_) => "That tweet is no longer available.".to_string(),
        _ => "Something went wrong. Please try again.".to_string(),
    }
}
