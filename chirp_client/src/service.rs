// Contracts of the external services the page consumes. The page only
// depends on these seams; transport, persistence and authentication live
// behind them.

use async_trait::async_trait;

use chirp_core::model::{Like, Tweet, User};
use chirp_core::Result;

/// Supplies the signed-in viewer, if any. Like toggles are gated on it.
pub trait SessionProvider: Send + Sync {
    fn current_user_id(&self) -> Option<String>;
}

/// Profile lookup. An absent user is terminal for the page; no retry.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn get_by_user_id(&self, user_id: &str) -> Result<Option<User>>;
}

/// Tweet creation and the initial feed fetch.
/// `create` trusts the caller to have validated the content length.
#[async_trait]
pub trait TweetService: Send + Sync {
    async fn create(&self, content: &str) -> Result<Tweet>;
    async fn list_by_user_id(&self, user_id: &str) -> Result<Vec<Tweet>>;
}

/// Server-side like toggling. The returned record names the resulting
/// actor/target pair; its presence only means a toggle occurred, the
/// direction is derived from the cached state. A tweet id unknown to the
/// server surfaces as `Error::ObjectNotFound`.
#[async_trait]
pub trait LikeService: Send + Sync {
    async fn toggle(&self, tweet_id: &str) -> Result<Like>;
}
