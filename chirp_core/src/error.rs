use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Not logged in: {0}")]
    NotLoggedIn(String),
    #[error("Invalid content: {0}")]
    InvalidContent(String),
    #[error("Object `{0}` not found")]
    ObjectNotFound(String),

    #[error("Cannot encode/decode JSON: {0}")]
    JSONError(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
