use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

/// Root configuration for smsrelayd
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Relay decision rules
    #[serde(default)]
    pub relay: RelayRules,

    /// Delivery channels
    #[serde(default)]
    pub channels: ChannelsConfig,

    /// Inbound HTTP surface
    #[serde(default)]
    pub ingest: IngestConfig,

    /// Logging settings
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Rules consulted by the filter pipeline.
///
/// The four pattern lists are kept as the raw stored strings and parsed
/// fresh on every evaluation; the stored string is the source of truth.
#[derive(Debug, Clone, Deserialize)]
pub struct RelayRules {
    /// Master switch; when false every message is dropped
    #[serde(default)]
    pub enabled: bool,

    /// Suppress messages the OTP heuristic classifies as passcodes
    #[serde(default = "default_true")]
    pub skip_otp: bool,

    /// Senders to relay exclusively (empty = rule inactive)
    #[serde(default)]
    pub whitelist: String,

    /// Senders never relayed
    #[serde(default)]
    pub blacklist: String,

    /// Body keywords required for relaying (empty = rule inactive)
    #[serde(default)]
    pub only_keywords: String,

    /// Body keywords that always suppress relaying
    #[serde(default)]
    pub never_keywords: String,

    /// IANA timezone for the payload timestamp (host-local if unset
    /// or unrecognized)
    #[serde(default)]
    pub timezone: Option<String>,
}

impl Default for RelayRules {
    fn default() -> Self {
        Self {
            enabled: false,
            skip_otp: default_true(),
            whitelist: String::new(),
            blacklist: String::new(),
            only_keywords: String::new(),
            never_keywords: String::new(),
            timezone: None,
        }
    }
}

/// Per-channel enablement and credentials.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelsConfig {
    /// Native SMS re-send
    #[serde(default)]
    pub resend: ResendConfig,

    /// Telegram Bot API
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// WhatsApp Business Cloud API
    #[serde(default)]
    pub whatsapp: WhatsAppConfig,

    /// Timeout applied to each outbound HTTP send
    #[serde(default = "default_http_timeout", with = "humantime_serde")]
    pub http_timeout: Duration,
}

impl Default for ChannelsConfig {
    fn default() -> Self {
        Self {
            resend: ResendConfig::default(),
            telegram: TelegramConfig::default(),
            whatsapp: WhatsAppConfig::default(),
            http_timeout: default_http_timeout(),
        }
    }
}

/// Native re-send channel configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ResendConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Recipients, one independent send each
    #[serde(default)]
    pub recipients: Vec<String>,

    /// Legacy single recipient, used when `recipients` is empty
    #[serde(default)]
    pub target: String,

    /// SMS gateway endpoint the transport posts to
    #[serde(default)]
    pub gateway_url: String,
}

impl Default for ResendConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            recipients: Vec::new(),
            target: String::new(),
            gateway_url: String::new(),
        }
    }
}

impl ResendConfig {
    /// Resolve the recipient set: explicit recipients first, then the
    /// legacy single target, then none (channel no-op).
    pub fn effective_recipients(&self) -> Vec<&str> {
        let explicit: Vec<&str> = self
            .recipients
            .iter()
            .map(|r| r.trim())
            .filter(|r| !r.is_empty())
            .collect();
        if !explicit.is_empty() {
            return explicit;
        }

        let target = self.target.trim();
        if target.is_empty() {
            Vec::new()
        } else {
            vec![target]
        }
    }
}

/// Telegram Bot API channel configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TelegramConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub bot_token: String,

    #[serde(default)]
    pub chat_id: String,
}

impl TelegramConfig {
    /// All required fields present.
    pub fn is_configured(&self) -> bool {
        !self.bot_token.trim().is_empty() && !self.chat_id.trim().is_empty()
    }
}

/// WhatsApp Business Cloud API channel configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WhatsAppConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub phone_number_id: String,

    #[serde(default)]
    pub access_token: String,

    #[serde(default)]
    pub to: String,
}

impl WhatsAppConfig {
    /// All required fields present.
    pub fn is_configured(&self) -> bool {
        !self.phone_number_id.trim().is_empty()
            && !self.access_token.trim().is_empty()
            && !self.to.trim().is_empty()
    }
}

/// Ingest HTTP listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct IngestConfig {
    /// Bind address
    #[serde(default = "default_ingest_address")]
    pub address: SocketAddr,

    /// How long shutdown waits for in-flight sends to finish
    #[serde(default = "default_drain_period", with = "humantime_serde")]
    pub drain_period: Duration,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            address: default_ingest_address(),
            drain_period: default_drain_period(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    /// Log level filter (overridden by RUST_LOG)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit JSON log lines instead of the pretty format
    #[serde(default)]
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_http_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_ingest_address() -> SocketAddr {
    ([127, 0, 0, 1], 8780).into()
}

fn default_drain_period() -> Duration {
    Duration::from_secs(30)
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(!config.relay.enabled);
        assert!(config.relay.skip_otp);
        assert!(config.channels.resend.enabled);
        assert!(!config.channels.telegram.enabled);
        assert!(!config.channels.whatsapp.enabled);
    }

    #[test]
    fn test_effective_recipients_explicit() {
        let resend = ResendConfig {
            recipients: vec!["+1555000111".into(), " ".into(), "+1555000222".into()],
            target: "+1555000999".into(),
            ..Default::default()
        };
        assert_eq!(
            resend.effective_recipients(),
            vec!["+1555000111", "+1555000222"]
        );
    }

    #[test]
    fn test_effective_recipients_legacy_fallback() {
        let resend = ResendConfig {
            target: " +1555000999 ".into(),
            ..Default::default()
        };
        assert_eq!(resend.effective_recipients(), vec!["+1555000999"]);
    }

    #[test]
    fn test_effective_recipients_none() {
        let resend = ResendConfig::default();
        assert!(resend.effective_recipients().is_empty());
    }

    #[test]
    fn test_channel_is_configured() {
        let mut telegram = TelegramConfig {
            enabled: true,
            bot_token: "123:abc".into(),
            chat_id: String::new(),
        };
        assert!(!telegram.is_configured());
        telegram.chat_id = "42".into();
        assert!(telegram.is_configured());

        let whatsapp = WhatsAppConfig {
            enabled: true,
            phone_number_id: "1001".into(),
            access_token: "tok".into(),
            to: "+1555000111".into(),
        };
        assert!(whatsapp.is_configured());
    }
}
