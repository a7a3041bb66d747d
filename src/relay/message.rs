//! Inbound message model.

/// One logical inbound short message.
///
/// Constructed once per received event and never mutated. The event
/// source is responsible for reassembling physical segments; the `body`
/// here is always the full logical text.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// Originating address exactly as received
    pub from: String,
    /// Message body
    pub body: String,
}

impl InboundMessage {
    pub fn new(from: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            body: body.into(),
        }
    }

    /// Assemble one logical message from its physical segments,
    /// concatenated in order.
    pub fn from_segments<S: AsRef<str>>(from: impl Into<String>, segments: &[S]) -> Self {
        let body = segments.iter().map(|s| s.as_ref()).collect::<String>();
        Self {
            from: from.into(),
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_segments_concatenates_in_order() {
        let message =
            InboundMessage::from_segments("+1555", &["part one, ", "part two, ", "part three"]);
        assert_eq!(message.body, "part one, part two, part three");
    }

    #[test]
    fn test_from_segments_empty() {
        let message = InboundMessage::from_segments("+1555", &[] as &[&str]);
        assert_eq!(message.body, "");
    }
}
