pub mod cache;
pub mod error;
pub mod model;
#[cfg(test)]
mod test;

pub use cache::FeedCache;
pub use error::*;
