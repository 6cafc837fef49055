use crate::config::{FetchConfig, ImageSearchConfig};
use crate::traits::ImageResolver;
use crate::types::{CuratorError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

/// Pick the candidate at the one-based `position`.
///
/// The leading slots of image searches are often logos or sponsored
/// placements, so the pick is positional and never falls back to an
/// earlier candidate.
pub fn select_candidate(candidates: Vec<String>, position: usize) -> Result<String> {
    let found = candidates.len();
    position
        .checked_sub(1)
        .and_then(|index| candidates.into_iter().nth(index))
        .ok_or(CuratorError::InsufficientCandidates {
            found,
            needed: position,
        })
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    link: Option<String>,
}

/// [`ImageResolver`] over a Custom Search style JSON API in image mode.
pub struct SearchApiImageResolver {
    client: Client,
    config: ImageSearchConfig,
}

impl SearchApiImageResolver {
    pub fn new(config: ImageSearchConfig, fetch_config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&fetch_config.user_agent)
            .timeout(fetch_config.timeout())
            .build()?;
        Ok(Self { client, config })
    }

    async fn search(&self, topic_query: &str) -> Result<Vec<String>> {
        let response = self
            .client
            .get(&self.config.base_url)
            .header("x-goog-api-key", &self.config.api_key)
            .query(&[
                ("cx", self.config.engine_id.as_str()),
                ("q", topic_query),
                ("searchType", "image"),
                ("num", "10"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CuratorError::ImageLookup(format!("HTTP {}", status.as_u16())));
        }

        let body: SearchResponse = response.json().await?;
        Ok(body
            .items
            .into_iter()
            .filter_map(|item| item.link)
            .filter(|link| link.starts_with("http"))
            .collect())
    }
}

#[async_trait]
impl ImageResolver for SearchApiImageResolver {
    async fn resolve(&self, topic_query: &str) -> Result<String> {
        let candidates = self.search(topic_query).await?;
        debug!("Image search for \"{}\" found {} candidates", topic_query, candidates.len());
        select_candidate(candidates, self.config.result_position)
    }
}
