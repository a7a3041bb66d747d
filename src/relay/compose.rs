//! Outbound payload composition.

use std::fmt;
use std::sync::Arc;

use chrono::Local;
use chrono_tz::Tz;
use tracing::debug;

/// Fixed marker prepended to every composed payload.
///
/// The self-echo rule keys on this exact prefix, so it must stay stable
/// and distinct from the timestamp portion that follows it.
pub const FWD_MARKER: &str = "[FWD";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S %Z";

/// The composed outbound text, immutable and cheap to share across
/// concurrent channel sends.
#[derive(Debug, Clone)]
pub struct OutboundPayload {
    text: Arc<str>,
}

impl OutboundPayload {
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for OutboundPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Build the annotated payload: marker, timestamp, original sender, and
/// the body verbatim.
///
/// The timestamp is rendered in the configured IANA timezone; an absent
/// or unparseable identifier falls back to the host's local timezone.
pub fn compose(sender: &str, body: &str, timezone: Option<&str>) -> OutboundPayload {
    let timestamp = match timezone.and_then(parse_timezone) {
        Some(tz) => chrono::Utc::now()
            .with_timezone(&tz)
            .format(TIMESTAMP_FORMAT)
            .to_string(),
        None => Local::now().format(TIMESTAMP_FORMAT).to_string(),
    };

    let text = format!("{FWD_MARKER} @ {timestamp}] From: {sender}\n{body}");
    OutboundPayload { text: text.into() }
}

fn parse_timezone(id: &str) -> Option<Tz> {
    if id.trim().is_empty() {
        return None;
    }
    match id.parse::<Tz>() {
        Ok(tz) => Some(tz),
        Err(_) => {
            debug!(timezone = %id, "unknown timezone, using host-local time");
            None
        }
    }
}
