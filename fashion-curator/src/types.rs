// Core data model lives in the interfaces crate
pub use interfaces::defs::{FeedItem, PublishedRecord, RunResult, RunStatus};

#[derive(Debug, thiserror::Error)]
pub enum CuratorError {
    /// The request URL is stripped on conversion; it can carry credentials.
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("Feed parse error: {0}")]
    Parse(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Rewrite failed: {0}")]
    Rewrite(String),

    #[error("Image lookup failed: {0}")]
    ImageLookup(String),

    #[error("Only {found} image candidates found, need at least {needed}")]
    InsufficientCandidates { found: usize, needed: usize },

    #[error("Publish rejected with HTTP {status}: {body}")]
    PublishRejected { status: u16, body: String },

    #[error("Unexpected HTTP {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<reqwest::Error> for CuratorError {
    fn from(e: reqwest::Error) -> Self {
        CuratorError::Http(e.without_url())
    }
}

pub type Result<T> = std::result::Result<T, CuratorError>;
