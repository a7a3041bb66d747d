//! WhatsApp Business Cloud API channel.

use reqwest::Client;
use serde::Serialize;

use super::ChannelError;
use crate::config::WhatsAppConfig;

/// Production Graph API host, pinned to the version the payload schema
/// was written against.
pub const DEFAULT_API_BASE: &str = "https://graph.facebook.com/v20.0";

/// Sends composed payloads as `text` messages.
#[derive(Debug, Clone)]
pub struct WhatsAppChannel {
    client: Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    messaging_product: &'a str,
    to: &'a str,
    #[serde(rename = "type")]
    message_type: &'a str,
    text: TextBody<'a>,
}

#[derive(Debug, Serialize)]
struct TextBody<'a> {
    body: &'a str,
}

impl WhatsAppChannel {
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

    /// One send attempt. No retries.
    pub async fn send(&self, config: &WhatsAppConfig, text: &str) -> Result<(), ChannelError> {
        let url = format!(
            "{}/{}/messages",
            self.base_url,
            config.phone_number_id.trim()
        );

        let request = SendMessageRequest {
            messaging_product: "whatsapp",
            to: config.to.trim(),
            message_type: "text",
            text: TextBody { body: text },
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(config.access_token.trim())
            .json(&request)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ChannelError::Status(response.status()))
        }
    }
}
