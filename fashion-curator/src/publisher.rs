use crate::config::{FetchConfig, TelegramConfig};
use crate::traits::Publisher;
use crate::types::{CuratorError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Serialize)]
struct SendPhotoRequest<'a> {
    chat_id: &'a str,
    photo: &'a str,
    caption: &'a str,
}

/// [`Publisher`] that posts photos to a Telegram channel through the Bot API.
pub struct TelegramPublisher {
    client: Client,
    config: TelegramConfig,
}

impl TelegramPublisher {
    pub fn new(config: TelegramConfig, fetch_config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&fetch_config.user_agent)
            .timeout(fetch_config.timeout())
            .build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/bot{}/sendPhoto",
            self.config.api_base.trim_end_matches('/'),
            self.config.bot_token
        )
    }
}

#[async_trait]
impl Publisher for TelegramPublisher {
    async fn publish(&self, image_url: &str, caption: &str) -> Result<()> {
        let request = SendPhotoRequest {
            chat_id: &self.config.channel_id,
            photo: image_url,
            caption,
        };

        // The endpoint embeds the bot token, never log it
        debug!("Sending photo to {}", self.config.channel_id);
        let response = self.client.post(self.endpoint()).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CuratorError::PublishRejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

/// Dry-run [`Publisher`]: logs what would be sent and always succeeds.
#[derive(Debug, Default)]
pub struct LogPublisher;

#[async_trait]
impl Publisher for LogPublisher {
    async fn publish(&self, image_url: &str, caption: &str) -> Result<()> {
        info!("[dry-run] would publish {} with caption:\n{}", image_url, caption);
        Ok(())
    }
}
