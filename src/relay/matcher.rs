//! Sender and keyword pattern matching.
//!
//! User rules are stored as one raw string per list and parsed fresh on
//! every evaluation. A pattern prefixed with `re:` (any case) is compiled
//! as a case-insensitive regular expression; anything else is a literal
//! matched by substring and, for sender lists, by normalized digit suffix.

use regex::{Regex, RegexBuilder};
use tracing::warn;

/// Prefix that selects the regex pattern form. Compared case-insensitively.
const REGEX_PREFIX: &str = "re:";

/// A single user pattern, classified once at parse time.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Plain match string, compared by substring and digit-suffix rules.
    Literal(String),
    /// Compiled `re:`-prefixed expression, matched by substring search.
    Regex(Regex),
}

impl Pattern {
    /// Parse one raw pattern.
    ///
    /// Returns `None` for a `re:` pattern that fails to compile; the rule
    /// set keeps working with the remaining patterns.
    pub fn parse(raw: &str) -> Option<Self> {
        let prefixed = raw
            .get(..REGEX_PREFIX.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(REGEX_PREFIX));
        if prefixed {
            let expr = &raw[REGEX_PREFIX.len()..];
            match RegexBuilder::new(expr).case_insensitive(true).build() {
                Ok(re) => Some(Pattern::Regex(re)),
                Err(err) => {
                    warn!(pattern = %raw, error = %err, "skipping invalid regex pattern");
                    None
                }
            }
        } else {
            Some(Pattern::Literal(raw.to_string()))
        }
    }
}

/// An ordered list of parsed patterns.
#[derive(Debug, Clone, Default)]
pub struct PatternList {
    patterns: Vec<Pattern>,
}

impl PatternList {
    /// Parse a raw stored string into a pattern list.
    ///
    /// Entries are separated by newline, comma, or semicolon. Blank
    /// entries are dropped and duplicates keep their first occurrence.
    pub fn parse(raw: &str) -> Self {
        let mut seen: Vec<&str> = Vec::new();
        let mut patterns = Vec::new();

        for entry in raw.split(['\n', ',', ';']) {
            let entry = entry.trim();
            if entry.is_empty() || seen.contains(&entry) {
                continue;
            }
            seen.push(entry);
            if let Some(pattern) = Pattern::parse(entry) {
                patterns.push(pattern);
            }
        }

        Self { patterns }
    }

    /// True when the list holds no usable patterns.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Number of usable patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Match a sender address against the list.
    ///
    /// Literals match when the normalized digits of address and pattern
    /// are equal or the address digits end with the pattern digits, or
    /// when the uppercased address contains the uppercased pattern. The
    /// two modes let one list hold both alphanumeric sender ids and phone
    /// numbers with or without a country prefix. An empty list matches
    /// nothing.
    pub fn matches_sender(&self, address: &str) -> bool {
        if self.patterns.is_empty() {
            return false;
        }

        let address_digits = normalize_number(address);
        let address_upper = address.to_uppercase();

        for pattern in &self.patterns {
            match pattern {
                Pattern::Regex(re) => {
                    if re.is_match(address) {
                        return true;
                    }
                }
                Pattern::Literal(lit) => {
                    let pattern_digits = normalize_number(lit);
                    if !pattern_digits.is_empty()
                        && !address_digits.is_empty()
                        && (address_digits == pattern_digits
                            || address_digits.ends_with(&pattern_digits))
                    {
                        return true;
                    }
                    if address_upper.contains(&lit.to_uppercase()) {
                        return true;
                    }
                }
            }
        }

        false
    }

    /// Match message text against the list.
    ///
    /// Literals match by case-insensitive substring only; no digit
    /// normalization applies to body text. An empty list matches nothing.
    pub fn matches_keyword(&self, text: &str) -> bool {
        if self.patterns.is_empty() {
            return false;
        }

        let text_upper = text.to_uppercase();

        for pattern in &self.patterns {
            match pattern {
                Pattern::Regex(re) => {
                    if re.is_match(text) {
                        return true;
                    }
                }
                Pattern::Literal(lit) => {
                    if text_upper.contains(&lit.to_uppercase()) {
                        return true;
                    }
                }
            }
        }

        false
    }
}

/// Reduce a phone-number-like string to a comparable digit suffix.
///
/// Keeps the digits-only subsequence; when more than 10 digits remain,
/// keeps the last 10 so that country-code variants of the same number
/// compare equal.
pub fn normalize_number(s: &str) -> String {
    let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() > 10 {
        digits[digits.len() - 10..].to_string()
    } else {
        digits
    }
}
