pub mod mutation;
pub mod page;
pub mod service;

pub use mutation::{MutationCoordinator, MutationState, Submission};
pub use page::{ProfilePage, ProfileState, ProfileView, TweetView};
