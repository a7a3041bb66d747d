use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use super::types::Config;

impl Config {
    /// Load configuration from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        debug!(path = %path.display(), "loading configuration");

        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        Self::from_yaml(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Parse configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config =
            serde_yaml::from_str(yaml).context("failed to parse YAML configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    ///
    /// Misconfigured channels are not errors (they are skipped at dispatch
    /// time), so validation only surfaces the setups that silently do
    /// nothing.
    pub fn validate(&self) -> Result<()> {
        if self.relay.enabled && !self.any_channel_enabled() {
            warn!("relay is enabled but no delivery channel is enabled");
        }

        if self.channels.resend.enabled
            && !self.channels.resend.effective_recipients().is_empty()
            && self.channels.resend.gateway_url.trim().is_empty()
        {
            warn!("resend recipients configured without a gateway_url; resend sends will be skipped");
        }

        if let Some(ref tz) = self.relay.timezone {
            if !tz.trim().is_empty() && tz.parse::<chrono_tz::Tz>().is_err() {
                warn!(timezone = %tz, "unknown timezone identifier; host-local time will be used");
            }
        }

        debug!("configuration validated");
        Ok(())
    }

    fn any_channel_enabled(&self) -> bool {
        self.channels.resend.enabled
            || self.channels.telegram.enabled
            || self.channels.whatsapp.enabled
    }
}
