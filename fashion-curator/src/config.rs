use crate::types::{CuratorError, Result};
use std::time::Duration;

const DEFAULT_FEED_URLS: &[&str] = &[
    "https://www.vogue.com/feed/rss",
    "https://wwd.com/feed/",
    "https://fashionista.com/.rss/excerpt/",
    "https://www.harpersbazaar.com/rss/all.xml/",
    "https://www.elle.com/rss/all.xml/",
];

const DEFAULT_CAPTION_FOOTER: &str = "✨ Descubre más tendencias cada día en nuestro canal.";
const DEFAULT_CAPTION_HASHTAGS: &str = "#moda #fashion #tendencias #estilo";

/// HTTP settings shared by every outbound client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_feed_size_mb: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "Fashion-Curator/1.0".to_string(),
            timeout_seconds: 20,
            max_feed_size_mb: 10,
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Policy knobs of the run coordinator.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub feed_urls: Vec<String>,
    pub post_quota: usize,
    pub items_per_source: usize,
    pub publish_delay: Duration,
    pub shuffle_sources: bool,
    pub excerpt_max_chars: usize,
    pub title_max_chars: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            feed_urls: DEFAULT_FEED_URLS.iter().map(|s| s.to_string()).collect(),
            post_quota: 2,
            items_per_source: 5,
            publish_delay: Duration::from_secs(10),
            shuffle_sources: true,
            excerpt_max_chars: 500,
            title_max_chars: 200,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RewriterConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub language: String,
}

#[derive(Debug, Clone)]
pub struct ImageSearchConfig {
    pub api_key: String,
    pub engine_id: String,
    pub base_url: String,
    /// One-based position of the candidate to pick.
    pub result_position: usize,
}

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub channel_id: String,
    pub api_base: String,
}

#[derive(Debug, Clone)]
pub struct CaptionConfig {
    pub footer: String,
    pub hashtags: String,
    pub max_chars: usize,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            footer: DEFAULT_CAPTION_FOOTER.to_string(),
            hashtags: DEFAULT_CAPTION_HASHTAGS.to_string(),
            max_chars: 1024,
        }
    }
}

/// Immutable process configuration, built once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub fetch: FetchConfig,
    pub pipeline: PipelineConfig,
    pub rewriter: RewriterConfig,
    pub image_search: ImageSearchConfig,
    pub caption: CaptionConfig,
    /// Absent when the channel credentials are not configured (dry runs).
    pub telegram: Option<TelegramConfig>,
    pub database_url: Option<String>,
}

impl AppConfig {
    /// Load configuration from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let required = |key: &str| get(key).ok_or_else(|| CuratorError::Config(format!("{} must be set", key)));

        let pipeline_defaults = PipelineConfig::default();
        let feed_urls = match get("FEED_URLS") {
            Some(raw) => raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            None => pipeline_defaults.feed_urls,
        };

        let pipeline = PipelineConfig {
            feed_urls,
            post_quota: parse_or(&get, "POST_QUOTA", pipeline_defaults.post_quota)?,
            items_per_source: parse_or(&get, "ITEMS_PER_SOURCE", pipeline_defaults.items_per_source)?,
            publish_delay: Duration::from_secs(parse_or(
                &get,
                "PUBLISH_DELAY_SECS",
                pipeline_defaults.publish_delay.as_secs(),
            )?),
            shuffle_sources: parse_or(&get, "SHUFFLE_SOURCES", pipeline_defaults.shuffle_sources)?,
            excerpt_max_chars: parse_or(&get, "EXCERPT_MAX_CHARS", pipeline_defaults.excerpt_max_chars)?,
            title_max_chars: parse_or(&get, "TITLE_MAX_CHARS", pipeline_defaults.title_max_chars)?,
        };

        let fetch_defaults = FetchConfig::default();
        let fetch = FetchConfig {
            user_agent: get("HTTP_USER_AGENT").unwrap_or(fetch_defaults.user_agent),
            timeout_seconds: parse_or(&get, "HTTP_TIMEOUT_SECS", fetch_defaults.timeout_seconds)?,
            max_feed_size_mb: parse_or(&get, "MAX_FEED_SIZE_MB", fetch_defaults.max_feed_size_mb)?,
        };

        let rewriter = RewriterConfig {
            api_key: required("GEMINI_API_KEY")?,
            model: get("GEMINI_MODEL").unwrap_or_else(|| "gemini-1.5-flash".to_string()),
            base_url: get("GEMINI_BASE_URL")
                .unwrap_or_else(|| "https://generativelanguage.googleapis.com/v1beta".to_string()),
            language: get("REWRITE_LANGUAGE").unwrap_or_else(|| "Spanish".to_string()),
        };

        let result_position = parse_or(&get, "IMAGE_RESULT_POSITION", 3usize)?;
        if result_position == 0 {
            return Err(CuratorError::Config("IMAGE_RESULT_POSITION is one-based".to_string()));
        }
        let image_search = ImageSearchConfig {
            api_key: required("IMAGE_SEARCH_API_KEY")?,
            engine_id: required("IMAGE_SEARCH_ENGINE_ID")?,
            base_url: get("IMAGE_SEARCH_BASE_URL")
                .unwrap_or_else(|| "https://www.googleapis.com/customsearch/v1".to_string()),
            result_position,
        };

        let caption_defaults = CaptionConfig::default();
        let caption = CaptionConfig {
            footer: get("CAPTION_FOOTER").unwrap_or(caption_defaults.footer),
            hashtags: get("CAPTION_HASHTAGS").unwrap_or(caption_defaults.hashtags),
            max_chars: parse_or(&get, "CAPTION_MAX_CHARS", caption_defaults.max_chars)?,
        };

        let telegram = match (get("TELEGRAM_BOT_TOKEN"), get("TELEGRAM_CHANNEL_ID")) {
            (Some(bot_token), Some(channel_id)) => Some(TelegramConfig {
                bot_token,
                channel_id,
                api_base: get("TELEGRAM_API_BASE").unwrap_or_else(|| "https://api.telegram.org".to_string()),
            }),
            (None, None) => None,
            _ => {
                return Err(CuratorError::Config(
                    "TELEGRAM_BOT_TOKEN and TELEGRAM_CHANNEL_ID must be set together".to_string(),
                ))
            }
        };

        Ok(Self {
            fetch,
            pipeline,
            rewriter,
            image_search,
            caption,
            telegram,
            database_url: get("DATABASE_URL"),
        })
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .parse()
            .map_err(|_| CuratorError::Config(format!("{} has an invalid value: {}", key, raw))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("GEMINI_API_KEY", "gemini-key"),
            ("IMAGE_SEARCH_API_KEY", "search-key"),
            ("IMAGE_SEARCH_ENGINE_ID", "engine"),
        ])
    }

    fn load(env: &HashMap<&'static str, &'static str>) -> Result<AppConfig> {
        AppConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()))
    }

    #[test]
    fn defaults_match_run_policy() {
        let config = load(&base_env()).unwrap();
        assert_eq!(config.pipeline.post_quota, 2);
        assert_eq!(config.pipeline.items_per_source, 5);
        assert_eq!(config.pipeline.publish_delay, Duration::from_secs(10));
        assert!(config.pipeline.shuffle_sources);
        assert_eq!(config.image_search.result_position, 3);
        assert!(!config.pipeline.feed_urls.is_empty());
        assert!(config.telegram.is_none());
        assert!(config.database_url.is_none());
    }

    #[test]
    fn publish_delay_can_be_overridden() {
        let mut env = base_env();
        env.insert("PUBLISH_DELAY_SECS", "3");
        assert_eq!(load(&env).unwrap().pipeline.publish_delay, Duration::from_secs(3));
    }

    #[test]
    fn feed_urls_are_split_and_trimmed() {
        let mut env = base_env();
        env.insert("FEED_URLS", " https://a.example/rss , ,https://b.example/feed ");
        let config = load(&env).unwrap();
        assert_eq!(config.pipeline.feed_urls, vec!["https://a.example/rss", "https://b.example/feed"]);
    }

    #[test]
    fn missing_credentials_are_reported() {
        let mut env = base_env();
        env.remove("GEMINI_API_KEY");
        let err = load(&env).unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let mut env = base_env();
        env.insert("POST_QUOTA", "two");
        assert!(matches!(load(&env), Err(CuratorError::Config(_))));
    }

    #[test]
    fn telegram_needs_both_token_and_channel() {
        let mut env = base_env();
        env.insert("TELEGRAM_BOT_TOKEN", "123:abc");
        assert!(load(&env).is_err());

        env.insert("TELEGRAM_CHANNEL_ID", "@fashion");
        let telegram = load(&env).unwrap().telegram.unwrap();
        assert_eq!(telegram.channel_id, "@fashion");
        assert_eq!(telegram.api_base, "https://api.telegram.org");
    }
}
