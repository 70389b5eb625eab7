//! HTTP client for the Telegram Bot API.

use super::Announcer;
use anyhow::{Context, Result};
use serde::Serialize;
use std::time::Duration;
use tracing::{error, info};

pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

#[derive(Serialize)]
struct SendPhotoRequest<'a> {
    chat_id: &'a str,
    photo: &'a str,
    caption: &'a str,
    parse_mode: &'static str,
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
    disable_web_page_preview: bool,
}

pub struct TelegramClient {
    client: reqwest::Client,
    base_url: String,
    bot_token: String,
    channel_id: String,
}

impl TelegramClient {
    /// Create a new Telegram client posting to `channel_id`.
    ///
    /// # Arguments
    /// * `base_url` - Bot API base URL (e.g., "https://api.telegram.org")
    /// * `timeout_sec` - Request timeout in seconds
    pub fn new(
        base_url: String,
        bot_token: String,
        channel_id: String,
        timeout_sec: u64,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .build()
            .context("Failed to create HTTP client")?;

        // Ensure base_url doesn't have trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            bot_token,
            channel_id,
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.bot_token, method)
    }

    async fn post<T: Serialize + ?Sized>(&self, method: &str, body: &T) -> Result<()> {
        let response = self
            .client
            .post(self.method_url(method))
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to reach Telegram for {}", method))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            anyhow::bail!("Telegram {} failed with status {}: {}", method, status, detail);
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl Announcer for TelegramClient {
    async fn send(&self, text: &str, image_url: Option<&str>) -> bool {
        let result = match image_url {
            Some(photo) => {
                let body = SendPhotoRequest {
                    chat_id: &self.channel_id,
                    photo,
                    caption: text,
                    parse_mode: "HTML",
                };
                self.post("sendPhoto", &body).await
            }
            None => {
                let body = SendMessageRequest {
                    chat_id: &self.channel_id,
                    text,
                    parse_mode: "HTML",
                    disable_web_page_preview: false,
                };
                self.post("sendMessage", &body).await
            }
        };

        match result {
            Ok(()) => {
                info!("Message sent to Telegram channel {}", self.channel_id);
                true
            }
            Err(err) => {
                error!("Failed to send Telegram message: {:#}", err);
                false
            }
        }
    }
}
