use crate::config::FetchConfig;
use crate::rss_utils::url::redact;
use crate::types::{CuratorError, Result};
use reqwest::Client;
use std::time::Instant;
use tracing::{debug, info};

/// Single-attempt HTTP getter for feed documents.
pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout())
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client, config })
    }

    /// GET a feed document and return its body. Non-success statuses and
    /// oversized bodies are errors.
    pub async fn fetch_feed(&self, url: &str) -> Result<String> {
        let start_time = Instant::now();
        debug!("Fetching feed: {}", redact(url));

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(CuratorError::UnexpectedStatus {
                status: status.as_u16(),
                url: redact(url),
            });
        }

        let max_bytes = self.config.max_feed_size_mb * 1024 * 1024;
        if let Some(content_length) = response.content_length() {
            if content_length as usize > max_bytes {
                return Err(CuratorError::Parse(format!(
                    "Feed too large: {} bytes",
                    content_length
                )));
            }
        }

        let content = response.text().await?;
        if content.len() > max_bytes {
            return Err(CuratorError::Parse(format!("Feed too large: {} bytes", content.len())));
        }

        info!(
            "Fetched feed {} ({} bytes in {}ms)",
            redact(url),
            content.len(),
            start_time.elapsed().as_millis()
        );
        Ok(content)
    }
}
