use crate::types::{FeedItem, Result};
use async_trait::async_trait;

/// Pulls a content source and normalizes its entries into [`FeedItem`]s.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch and parse one source. Items come back in source order.
    async fn fetch(&self, source_url: &str) -> Result<Vec<FeedItem>>;
}

/// Turns an article into a short localized promotional text.
#[async_trait]
pub trait ContentRewriter: Send + Sync {
    async fn rewrite(&self, title: &str, excerpt: &str) -> Result<String>;
}

/// Finds a representative image URL for a topic.
#[async_trait]
pub trait ImageResolver: Send + Sync {
    async fn resolve(&self, topic_query: &str) -> Result<String>;
}

/// Delivers an image with a caption to the broadcast channel.
///
/// `Ok(())` means the transport reported success; anything else is an error.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, image_url: &str, caption: &str) -> Result<()>;
}

/// Durable memory of what has already been published.
#[async_trait]
pub trait DeduplicationStore: Send + Sync {
    /// Whether a record with this identifier is already persisted.
    async fn exists(&self, identifier: &str) -> Result<bool>;

    /// Persist a new record. Recording an identifier twice is a no-op.
    async fn record(&self, identifier: &str, title: &str) -> Result<()>;
}
