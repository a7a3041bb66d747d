//! Filtering SMS relay.
//!
//! One inbound short message at a time: a layered, user-configurable
//! rule set decides whether to relay it, and surviving messages are
//! fanned out concurrently to the enabled delivery channels (native
//! re-send via an SMS gateway, Telegram, WhatsApp). Delivery is
//! best-effort and per-channel isolated; nothing here retries or
//! persists a queue.

pub mod bootstrap;
pub mod config;
pub mod dispatch;
pub mod ingest;
pub mod relay;
pub mod telemetry;
