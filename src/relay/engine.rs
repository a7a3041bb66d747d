//! Per-event orchestration.
//!
//! One inbound event flows: config snapshot -> filter chain -> compose
//! -> dispatch. The decision is made inline; the sends run on spawned
//! tasks and the engine does not wait for them before reporting the
//! event handled.

use tracing::{debug, info, instrument};

use crate::config::{ConfigError, SharedConfigStore};
use crate::dispatch::Dispatcher;

use super::compose::compose;
use super::filter::{self, Verdict};
use super::message::InboundMessage;

/// What happened to one inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Dropped by the named filter rule.
    Dropped(filter::DropReason),
    /// Composed and handed to the dispatcher.
    Dispatched {
        /// Independent send attempts spawned.
        attempts: usize,
    },
}

/// The filter-and-dispatch engine.
pub struct RelayEngine {
    store: SharedConfigStore,
    dispatcher: Dispatcher,
}

impl RelayEngine {
    pub fn new(store: SharedConfigStore, dispatcher: Dispatcher) -> Self {
        Self { store, dispatcher }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Handle one inbound message.
    ///
    /// Reads exactly one configuration snapshot, decides, and returns as
    /// soon as the sends are spawned. Outcomes are joined on a background
    /// task and logged; they feed nothing back into future decisions.
    #[instrument(skip(self, message), fields(from = %message.from))]
    pub async fn handle(&self, message: InboundMessage) -> Result<Disposition, ConfigError> {
        let config = self.store.load().await?;

        match filter::evaluate(&message, &config.relay) {
            Verdict::Drop(reason) => {
                debug!(reason = %reason, "message dropped");
                Ok(Disposition::Dropped(reason))
            }
            Verdict::Forward => {
                let payload = compose(
                    &message.from,
                    &message.body,
                    config.relay.timezone.as_deref(),
                );

                let handle = self.dispatcher.dispatch(&payload, &config.channels);
                let attempts = handle.attempts();
                info!(attempts, "message dispatched");

                tokio::spawn(async move {
                    let outcomes = handle.join().await;
                    let delivered = outcomes.iter().filter(|o| o.success).count();
                    info!(
                        delivered,
                        attempted = outcomes.len(),
                        "dispatch complete"
                    );
                });

                Ok(Disposition::Dispatched { attempts })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::{Config, MemoryConfigStore, ResendConfig};
    use crate::dispatch::resend::testing::RecordingTransport;
    use crate::relay::filter::DropReason;

    fn engine_with(
        config: Config,
        transport: Arc<RecordingTransport>,
    ) -> RelayEngine {
        let store = Arc::new(MemoryConfigStore::new(config));
        let dispatcher = Dispatcher::new(reqwest::Client::new(), Some(transport));
        RelayEngine::new(store, dispatcher)
    }

    fn relaying_config() -> Config {
        let mut config = Config::default();
        config.relay.enabled = true;
        config.relay.skip_otp = false;
        config.channels.resend = ResendConfig {
            recipients: vec!["+1555000111".into()],
            ..Default::default()
        };
        config
    }

    #[tokio::test]
    async fn test_dropped_message_never_dispatches() {
        let transport = Arc::new(RecordingTransport::new());
        let mut config = relaying_config();
        config.relay.blacklist = "SPAMCO".into();
        let engine = engine_with(config, transport.clone());

        let disposition = engine
            .handle(InboundMessage::new("SPAMCO", "buy now"))
            .await
            .unwrap();
        assert_eq!(
            disposition,
            Disposition::Dropped(DropReason::BlacklistedSender)
        );

        engine.dispatcher().in_flight().drained().await;
        assert!(transport.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_forwarded_message_reaches_transport() {
        let transport = Arc::new(RecordingTransport::new());
        let engine = engine_with(relaying_config(), transport.clone());

        let disposition = engine
            .handle(InboundMessage::new("BANKXY", "Payment received"))
            .await
            .unwrap();
        assert_eq!(disposition, Disposition::Dispatched { attempts: 1 });

        engine.dispatcher().in_flight().drained().await;

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "+1555000111");
        assert!(sent[0].1.starts_with("[FWD @ "));
        assert!(sent[0].1.contains("] From: BANKXY\nPayment received"));
    }

    #[tokio::test]
    async fn test_settings_edit_applies_to_next_event() {
        let transport = Arc::new(RecordingTransport::new());
        let store = Arc::new(MemoryConfigStore::new(relaying_config()));
        let dispatcher = Dispatcher::new(reqwest::Client::new(), Some(transport.clone()));
        let engine = RelayEngine::new(store.clone(), dispatcher);

        let first = engine
            .handle(InboundMessage::new("BANKXY", "one"))
            .await
            .unwrap();
        assert!(matches!(first, Disposition::Dispatched { .. }));

        let mut updated = store.current();
        updated.relay.enabled = false;
        store.update(updated);

        let second = engine
            .handle(InboundMessage::new("BANKXY", "two"))
            .await
            .unwrap();
        assert_eq!(second, Disposition::Dropped(DropReason::Disabled));
    }
}
