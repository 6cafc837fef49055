use crate::config::{FetchConfig, RewriterConfig};
use crate::rss_utils::text::truncate_chars;
use crate::traits::ContentRewriter;
use crate::types::{CuratorError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

const PROMPT_EXCERPT_MAX_CHARS: usize = 500;

/// Fixed persona and style directives. `{language}`, `{title}` and
/// `{excerpt}` are substituted per item.
const PROMPT_TEMPLATE: &str = "You are the voice of a trendy fashion boutique's broadcast channel. \
Write in {language}, in a warm, enthusiastic and stylish tone, as if talking to a close friend who loves fashion. \
Summarize the news below in at most three short sentences, add one or two fitting emojis, \
and end with a line inviting readers to get the look. \
Do not include links, hashtags or prices. Reply with the text only.\n\n\
Headline: {title}\n\
Summary: {excerpt}";

/// Compose the prompt sent for one article.
pub fn build_prompt(language: &str, title: &str, excerpt: &str) -> String {
    PROMPT_TEMPLATE
        .replace("{language}", language)
        .replace("{title}", title.trim())
        .replace("{excerpt}", &truncate_chars(excerpt.trim(), PROMPT_EXCERPT_MAX_CHARS))
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

/// [`ContentRewriter`] backed by the Gemini `generateContent` endpoint.
pub struct GeminiRewriter {
    client: Client,
    config: RewriterConfig,
}

impl GeminiRewriter {
    pub fn new(config: RewriterConfig, fetch_config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&fetch_config.user_agent)
            .timeout(fetch_config.timeout())
            .build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl ContentRewriter for GeminiRewriter {
    async fn rewrite(&self, title: &str, excerpt: &str) -> Result<String> {
        let prompt = build_prompt(&self.config.language, title, excerpt);
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: &prompt }],
            }],
        };

        debug!("Requesting rewrite for \"{}\" from {}", title, self.config.model);
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CuratorError::Rewrite(format!("HTTP {}", status.as_u16())));
        }

        let body: GenerateContentResponse = response.json().await?;
        let text = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect::<String>())
            .unwrap_or_default();

        let text = text.trim();
        if text.is_empty() {
            return Err(CuratorError::Rewrite("empty response".to_string()));
        }
        Ok(text.to_string())
    }
}
