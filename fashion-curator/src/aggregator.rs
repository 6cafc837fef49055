use crate::config::FetchConfig;
use crate::rss_utils::url::{is_valid_feed_url, redact};
use crate::traits::FeedSource;
use crate::types::{CuratorError, FeedItem, Result};
use crate::{FeedParser, Fetcher};
use async_trait::async_trait;
use tracing::debug;

/// RSS/Atom implementation of [`FeedSource`]: one GET, one parse.
pub struct RssFeedAggregator {
    fetcher: Fetcher,
    parser: FeedParser,
}

impl RssFeedAggregator {
    pub fn new(fetch_config: FetchConfig, excerpt_max_chars: usize) -> Result<Self> {
        Ok(Self {
            fetcher: Fetcher::new(fetch_config)?,
            parser: FeedParser::new(excerpt_max_chars),
        })
    }
}

#[async_trait]
impl FeedSource for RssFeedAggregator {
    async fn fetch(&self, source_url: &str) -> Result<Vec<FeedItem>> {
        if !is_valid_feed_url(source_url) {
            return Err(CuratorError::Config(format!("Not an http(s) feed URL: {}", redact(source_url))));
        }

        let content = self.fetcher.fetch_feed(source_url).await?;
        let items = self.parser.parse_feed(&content)?;
        debug!("Source {} yielded {} items", redact(source_url), items.len());
        Ok(items)
    }
}
