//! Telegram channel adapter.
//!
//! Inbound updates arrive through the gateway's webhook route and are
//! decoded with [`types::Update`]. Outbound replies go through the Bot API
//! `sendMessage` method with MarkdownV2 formatting.

pub mod markdown;
pub mod types;

use async_trait::async_trait;
use notewire_config::AppConfig;
use notewire_core::channel::{Channel, ChatId};
use notewire_core::error::ChannelError;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};

use types::{TelegramResponse, User};

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";
pub const PARSE_MODE: &str = "MarkdownV2";

/// Telegram channel configuration.
#[derive(Clone)]
pub struct TelegramConfig {
    /// Bot token from @BotFather.
    pub bot_token: String,
    /// Bot API base URL, without the `/bot<token>` suffix.
    pub api_base: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl TelegramConfig {
    pub fn new(bot_token: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            api_base: DEFAULT_API_BASE.into(),
            timeout: Duration::from_secs(20),
        }
    }

    /// Build from application config. `None` when no token is configured.
    pub fn from_app_config(config: &AppConfig) -> Option<Self> {
        let token = config.telegram_token()?;
        Some(Self {
            bot_token: token.to_string(),
            api_base: config.telegram.api_base.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.telegram.timeout_secs),
        })
    }
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Body of a `sendMessage` call.
#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a ChatId,
    text: &'a str,
    parse_mode: &'static str,
    disable_web_page_preview: bool,
}

/// Telegram channel adapter.
pub struct TelegramChannel {
    config: TelegramConfig,
    client: reqwest::Client,
}

impl TelegramChannel {
    pub fn new(config: TelegramConfig) -> Result<Self, ChannelError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ChannelError::NotConfigured(format!("HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.config.api_base, self.config.bot_token, method
        )
    }

    /// Call `getMe` and return the bot account.
    pub async fn get_me(&self) -> Result<User, ChannelError> {
        let response = self
            .client
            .get(self.method_url("getMe"))
            .send()
            .await
            .map_err(|e| ChannelError::ConnectionLost(e.without_url().to_string()))?;

        let status = response.status();
        let body: TelegramResponse<User> = response.json().await.map_err(|e| {
            ChannelError::DeliveryFailed {
                channel: "telegram".into(),
                reason: format!("getMe ({status}): {}", e.without_url()),
            }
        })?;

        if !body.ok {
            return Err(ChannelError::DeliveryFailed {
                channel: "telegram".into(),
                reason: body.description.unwrap_or_else(|| "unknown error".into()),
            });
        }

        body.result.ok_or_else(|| ChannelError::DeliveryFailed {
            channel: "telegram".into(),
            reason: "missing result in response".into(),
        })
    }
}

#[async_trait]
impl Channel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn send(&self, chat_id: &ChatId, content: &str) -> Result<(), ChannelError> {
        let body = SendMessage {
            chat_id,
            text: content,
            parse_mode: PARSE_MODE,
            disable_web_page_preview: true,
        };

        debug!(chat_id = %chat_id, content_len = content.len(), "Telegram sendMessage");

        // `without_url` keeps the bot token out of error messages.
        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&body)
            .send()
            .await
            .map_err(|e| ChannelError::ConnectionLost(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let reason = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %reason, "Telegram rejected message");
            return Err(ChannelError::DeliveryFailed {
                channel: "telegram".into(),
                reason: format!("{status}: {reason}"),
            });
        }

        let parsed: TelegramResponse<serde_json::Value> =
            response
                .json()
                .await
                .map_err(|e| ChannelError::DeliveryFailed {
                    channel: "telegram".into(),
                    reason: e.without_url().to_string(),
                })?;

        if !parsed.ok {
            return Err(ChannelError::DeliveryFailed {
                channel: "telegram".into(),
                reason: parsed
                    .description
                    .unwrap_or_else(|| "unknown error".into()),
            });
        }

        info!(chat_id = %chat_id, "Reply delivered");
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, ChannelError> {
        Ok(self.get_me().await.is_ok())
    }
}
