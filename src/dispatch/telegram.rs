//! Telegram Bot API channel.

use reqwest::Client;

use super::ChannelError;
use crate::config::TelegramConfig;

/// Production Bot API host.
pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Sends composed payloads via `sendMessage`.
#[derive(Debug, Clone)]
pub struct TelegramChannel {
    client: Client,
    base_url: String,
}

impl TelegramChannel {
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, DEFAULT_API_BASE)
    }

    /// Point the channel at an alternate API host (tests, proxies).
    pub fn with_base_url(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// One send attempt. The caller decides what to do with the error;
    /// this channel never retries.
    pub async fn send(&self, config: &TelegramConfig, text: &str) -> Result<(), ChannelError> {
        let url = format!(
            "{}/bot{}/sendMessage",
            self.base_url,
            config.bot_token.trim()
        );

        let response = self
            .client
            .post(&url)
            .form(&[("chat_id", config.chat_id.trim()), ("text", text)])
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ChannelError::Status(response.status()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let channel = TelegramChannel::with_base_url(Client::new(), "http://127.0.0.1:9001/");
        assert_eq!(channel.base_url, "http://127.0.0.1:9001");
    }
}
