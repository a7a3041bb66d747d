//! Heuristic one-time-passcode detection.

use std::sync::OnceLock;

use regex::Regex;

/// Marker words that suggest a passcode message.
const OTP_MARKERS: [&str; 3] = ["OTP", "ONE TIME", "VERIFY"];

fn code_pattern() -> &'static Regex {
    static CODE: OnceLock<Regex> = OnceLock::new();
    CODE.get_or_init(|| Regex::new(r"\b\d{4,8}\b").expect("static regex"))
}

/// Classify free text as "looks like a one-time-passcode message".
///
/// Requires both a marker word (case-insensitive) and a standalone run of
/// 4 to 8 digits bounded by word boundaries. Heuristic only; false
/// positives and negatives are accepted.
pub fn looks_like_otp(text: &str) -> bool {
    let upper = text.to_uppercase();
    if !OTP_MARKERS.iter().any(|marker| upper.contains(marker)) {
        return false;
    }
    code_pattern().is_match(text)
}
