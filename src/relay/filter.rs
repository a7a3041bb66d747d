//! The relay decision pipeline.
//!
//! A fixed, ordered chain of rules; the first rule that fires drops the
//! message. The order encodes precedence: blacklist outranks whitelist,
//! keyword rules outrank OTP suppression, so an operator cannot
//! whitelist a blacklisted sender but can carve content exceptions with
//! never-keywords.

use std::fmt;

use crate::config::RelayRules;

use super::compose::FWD_MARKER;
use super::matcher::PatternList;
use super::message::InboundMessage;
use super::otp::looks_like_otp;

/// Outcome of filtering one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Message proceeds to composition and dispatch.
    Forward,
    /// Message is dropped; nothing downstream runs.
    Drop(DropReason),
}

/// Which rule dropped the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Master switch is off.
    Disabled,
    /// Body already carries the forwarding marker.
    SelfEcho,
    /// Sender matched the blacklist.
    BlacklistedSender,
    /// Whitelist is active and the sender is not on it.
    NotWhitelisted,
    /// Body matched a never-keyword.
    NeverKeyword,
    /// Only-keywords are active and none matched the body.
    MissingOnlyKeyword,
    /// OTP suppression is on and the body looks like a passcode.
    LooksLikeOtp,
}

impl DropReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DropReason::Disabled => "disabled",
            DropReason::SelfEcho => "self_echo",
            DropReason::BlacklistedSender => "blacklisted_sender",
            DropReason::NotWhitelisted => "not_whitelisted",
            DropReason::NeverKeyword => "never_keyword",
            DropReason::MissingOnlyKeyword => "missing_only_keyword",
            DropReason::LooksLikeOtp => "looks_like_otp",
        }
    }
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Run the rule chain against one message.
///
/// Pattern lists are parsed from the raw stored strings on every call;
/// the stored string is the source of truth, not a cached parse.
pub fn evaluate(message: &InboundMessage, rules: &RelayRules) -> Verdict {
    if !rules.enabled {
        return Verdict::Drop(DropReason::Disabled);
    }

    if message.body.starts_with(FWD_MARKER) {
        return Verdict::Drop(DropReason::SelfEcho);
    }

    let blacklist = PatternList::parse(&rules.blacklist);
    if blacklist.matches_sender(&message.from) {
        return Verdict::Drop(DropReason::BlacklistedSender);
    }

    let whitelist = PatternList::parse(&rules.whitelist);
    if !whitelist.is_empty() && !whitelist.matches_sender(&message.from) {
        return Verdict::Drop(DropReason::NotWhitelisted);
    }

    let never_keywords = PatternList::parse(&rules.never_keywords);
    if never_keywords.matches_keyword(&message.body) {
        return Verdict::Drop(DropReason::NeverKeyword);
    }

    let only_keywords = PatternList::parse(&rules.only_keywords);
    if !only_keywords.is_empty() && !only_keywords.matches_keyword(&message.body) {
        return Verdict::Drop(DropReason::MissingOnlyKeyword);
    }

    if rules.skip_otp && looks_like_otp(&message.body) {
        return Verdict::Drop(DropReason::LooksLikeOtp);
    }

    Verdict::Forward
}
