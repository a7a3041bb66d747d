//! The filter-and-dispatch core.
//!
//! Leaf-first: pattern matching and the OTP heuristic feed the filter
//! chain; messages that survive it are composed into the annotated
//! outbound payload and handed to the dispatcher.

mod compose;
mod engine;
pub mod filter;
pub mod matcher;
mod message;
pub mod otp;

pub use compose::{compose, OutboundPayload, FWD_MARKER};
pub use engine::{Disposition, RelayEngine};
pub use filter::{DropReason, Verdict};
pub use message::InboundMessage;
