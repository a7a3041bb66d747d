//! Concurrent fan-out to delivery channels.
//!
//! The dispatcher spawns one task per delivery attempt: one per resend
//! recipient plus at most one per HTTP channel. Attempts are independent;
//! a failure on one channel is logged and discarded without affecting the
//! others, and no attempt is ever retried. A channel with missing
//! credentials is skipped silently.

mod inflight;
pub mod resend;
pub mod telegram;
pub mod whatsapp;

pub use inflight::{InFlight, InFlightToken};
pub use resend::{HttpSmsGateway, SmsTransport};
pub use telegram::TelegramChannel;
pub use whatsapp::WhatsAppChannel;

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::ChannelsConfig;
use crate::relay::OutboundPayload;

/// Delivery channel identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    Resend,
    Telegram,
    WhatsApp,
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChannelKind::Resend => "resend",
            ChannelKind::Telegram => "telegram",
            ChannelKind::WhatsApp => "whatsapp",
        };
        f.write_str(name)
    }
}

/// Failure at a channel boundary.
///
/// Always absorbed by the dispatcher after logging; it never propagates
/// past the delivery attempt that produced it.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("api returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("transport error: {0}")]
    Transport(String),
}

/// Result of one delivery attempt, collected for logging only.
#[derive(Debug)]
pub struct DeliveryOutcome {
    pub channel: ChannelKind,
    pub recipient: String,
    pub success: bool,
    pub error: Option<ChannelError>,
}

impl DeliveryOutcome {
    fn from_result(
        channel: ChannelKind,
        recipient: String,
        result: Result<(), ChannelError>,
    ) -> Self {
        match result {
            Ok(()) => {
                debug!(channel = %channel, recipient = %recipient, "delivered");
                Self {
                    channel,
                    recipient,
                    success: true,
                    error: None,
                }
            }
            Err(error) => {
                warn!(
                    channel = %channel,
                    recipient = %recipient,
                    error = %error,
                    "channel send failed"
                );
                Self {
                    channel,
                    recipient,
                    success: false,
                    error: Some(error),
                }
            }
        }
    }
}

/// Handle over the spawned attempts of one dispatch.
///
/// Dropping the handle does not cancel anything; the attempts keep
/// running under their in-flight tokens.
pub struct DispatchHandle {
    tasks: Vec<JoinHandle<DeliveryOutcome>>,
}

impl DispatchHandle {
    /// Number of attempts spawned.
    pub fn attempts(&self) -> usize {
        self.tasks.len()
    }

    /// Await every attempt and collect the outcomes.
    pub async fn join(self) -> Vec<DeliveryOutcome> {
        let results = futures::future::join_all(self.tasks).await;
        results
            .into_iter()
            .filter_map(|result| match result {
                Ok(outcome) => Some(outcome),
                Err(err) => {
                    warn!(error = %err, "dispatch task panicked");
                    None
                }
            })
            .collect()
    }
}

/// Fans one composed payload out to the enabled channels.
pub struct Dispatcher {
    telegram: TelegramChannel,
    whatsapp: WhatsAppChannel,
    transport: Option<Arc<dyn SmsTransport>>,
    inflight: InFlight,
}

impl Dispatcher {
    pub fn new(client: reqwest::Client, transport: Option<Arc<dyn SmsTransport>>) -> Self {
        Self {
            telegram: TelegramChannel::new(client.clone()),
            whatsapp: WhatsAppChannel::new(client),
            transport,
            inflight: InFlight::new(),
        }
    }

    /// Replace the Telegram adapter (alternate API host).
    pub fn with_telegram(mut self, channel: TelegramChannel) -> Self {
        self.telegram = channel;
        self
    }

    /// Replace the WhatsApp adapter (alternate API host).
    pub fn with_whatsapp(mut self, channel: WhatsAppChannel) -> Self {
        self.whatsapp = channel;
        self
    }

    /// Tracker the server drains on shutdown.
    pub fn in_flight(&self) -> &InFlight {
        &self.inflight
    }

    /// Spawn one independent send per enabled attempt and return without
    /// awaiting any of them.
    ///
    /// Every task acquires its in-flight token before it is spawned, so a
    /// drain that starts after `dispatch` returns always sees the full
    /// attempt set.
    pub fn dispatch(&self, payload: &OutboundPayload, channels: &ChannelsConfig) -> DispatchHandle {
        let mut tasks = Vec::new();

        if channels.resend.enabled {
            self.spawn_resend(payload, channels, &mut tasks);
        }

        if channels.telegram.enabled {
            if channels.telegram.is_configured() {
                let token = self.inflight.token();
                let channel = self.telegram.clone();
                let config = channels.telegram.clone();
                let payload = payload.clone();
                let recipient = config.chat_id.trim().to_string();
                tasks.push(tokio::spawn(async move {
                    let _token = token;
                    let result = channel.send(&config, payload.as_str()).await;
                    DeliveryOutcome::from_result(ChannelKind::Telegram, recipient, result)
                }));
            } else {
                debug!(channel = %ChannelKind::Telegram, "credentials missing, skipping");
            }
        }

        if channels.whatsapp.enabled {
            if channels.whatsapp.is_configured() {
                let token = self.inflight.token();
                let channel = self.whatsapp.clone();
                let config = channels.whatsapp.clone();
                let payload = payload.clone();
                let recipient = config.to.trim().to_string();
                tasks.push(tokio::spawn(async move {
                    let _token = token;
                    let result = channel.send(&config, payload.as_str()).await;
                    DeliveryOutcome::from_result(ChannelKind::WhatsApp, recipient, result)
                }));
            } else {
                debug!(channel = %ChannelKind::WhatsApp, "credentials missing, skipping");
            }
        }

        DispatchHandle { tasks }
    }

    fn spawn_resend(
        &self,
        payload: &OutboundPayload,
        channels: &ChannelsConfig,
        tasks: &mut Vec<JoinHandle<DeliveryOutcome>>,
    ) {
        let recipients = channels.resend.effective_recipients();
        if recipients.is_empty() {
            debug!(channel = %ChannelKind::Resend, "no recipient configured, skipping");
            return;
        }

        let Some(transport) = &self.transport else {
            debug!(channel = %ChannelKind::Resend, "no transport configured, skipping");
            return;
        };

        for recipient in recipients {
            let token = self.inflight.token();
            let transport = transport.clone();
            let payload = payload.clone();
            let recipient = recipient.to_string();
            tasks.push(tokio::spawn(async move {
                let _token = token;
                let result = transport.send(&recipient, payload.as_str()).await;
                DeliveryOutcome::from_result(ChannelKind::Resend, recipient, result)
            }));
        }
    }
}
