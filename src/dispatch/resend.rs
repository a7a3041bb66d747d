//! Native re-send channel transport.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use super::ChannelError;

/// Collaborator that delivers a text to one phone-number recipient.
///
/// Implementations own transport-level concerns, in particular splitting
/// the text into message-sized segments and sending them as one logical
/// multi-part message.
#[async_trait]
pub trait SmsTransport: Send + Sync {
    async fn send(&self, recipient: &str, text: &str) -> Result<(), ChannelError>;

    /// Transport name for logging.
    fn name(&self) -> &'static str;
}

/// [`SmsTransport`] backed by an HTTP SMS gateway.
///
/// Posts `{"to": ..., "text": ...}` to the configured endpoint; the
/// gateway handles segmentation and carrier delivery.
#[derive(Debug, Clone)]
pub struct HttpSmsGateway {
    client: Client,
    url: String,
}

#[derive(Debug, Serialize)]
struct GatewayRequest<'a> {
    to: &'a str,
    text: &'a str,
}

impl HttpSmsGateway {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl SmsTransport for HttpSmsGateway {
    async fn send(&self, recipient: &str, text: &str) -> Result<(), ChannelError> {
        let response = self
            .client
            .post(&self.url)
            .json(&GatewayRequest {
                to: recipient,
                text,
            })
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ChannelError::Status(response.status()))
        }
    }

    fn name(&self) -> &'static str {
        "http-gateway"
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Recording transport for dispatcher tests.

    use std::sync::Mutex;

    use super::*;

    /// Records every send; recipients listed in `fail` return an error.
    pub struct RecordingTransport {
        pub sent: Mutex<Vec<(String, String)>>,
        pub fail: Vec<String>,
    }

    impl RecordingTransport {
        pub fn new() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail: Vec::new(),
            }
        }

        pub fn failing_for(recipients: &[&str]) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail: recipients.iter().map(|r| r.to_string()).collect(),
            }
        }
    }

    #[async_trait]
    impl SmsTransport for RecordingTransport {
        async fn send(&self, recipient: &str, text: &str) -> Result<(), ChannelError> {
            self.sent
                .lock()
                .unwrap()
                .push((recipient.to_string(), text.to_string()));
            if self.fail.iter().any(|r| r == recipient) {
                Err(ChannelError::Transport("simulated failure".into()))
            } else {
                Ok(())
            }
        }

        fn name(&self) -> &'static str {
            "recording"
        }
    }
}
