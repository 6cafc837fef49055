pub mod types;
pub mod config;
pub mod traits;
pub mod rss_utils;
pub mod fetcher;
pub mod parser;
pub mod aggregator;
pub mod llm_adapter;
pub mod image_resolver;
pub mod caption;
pub mod publisher;
pub mod store;
pub mod pipeline;

pub use types::*;
pub use config::AppConfig;
pub use traits::{ContentRewriter, DeduplicationStore, FeedSource, ImageResolver, Publisher};
pub use fetcher::Fetcher;
pub use parser::FeedParser;
pub use aggregator::RssFeedAggregator;
pub use llm_adapter::GeminiRewriter;
pub use image_resolver::SearchApiImageResolver;
pub use publisher::{LogPublisher, TelegramPublisher};
pub use store::{MemoryDedupStore, PgDedupStore};
pub use pipeline::{Capabilities, RunCoordinator, RunStats};
