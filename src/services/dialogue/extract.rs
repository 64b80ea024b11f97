//! Entity extractors. Each returns `None` when nothing usable was said;
//! the state machine turns that into a re-ask, never an error.

use std::sync::LazyLock;

use regex::Regex;

use super::classify::{self, SERVICE_RULES};
use crate::models::Service;

static NAME_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // Introducer in any case, name capitalised: stops at the first lowercase word.
        r"(?i:\b(?:my name is|i am|i'm|this is|it's))\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)",
        r"\b([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)\s+(?i:here|speaking)\b",
        r"(?i:\b(?:call me|i'm|i am))\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)",
        // Lowercased transcripts: at most three words.
        r"(?i)\b(?:my name is|this is|call me)\s+([a-z]+(?:\s+[a-z]+){0,2})",
    ]
    .into_iter()
    .map(|p| Regex::new(p).expect("name pattern must compile"))
    .collect()
});

const NAME_BLOCKLIST: &[&str] = &[
    "unable to hear",
    "looking for",
    "trying to",
    "calling about",
    "interested in",
    "checking",
    "inquiring",
    "appointment",
    "schedule",
];

const TRAILING_FILLERS: &[&str] = &["and", "but", "so", "i", "from", "calling", "here", "speaking"];

fn is_blocked_name(candidate: &str) -> bool {
    let lower = candidate.to_lowercase();
    NAME_BLOCKLIST.iter().any(|phrase| lower.contains(phrase))
}

fn title_case(words: &str) -> String {
    words
        .split_whitespace()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn trim_trailing_fillers(candidate: &str) -> String {
    let mut words: Vec<&str> = candidate.split_whitespace().collect();
    while words.len() > 1
        && words
            .last()
            .is_some_and(|w| TRAILING_FILLERS.contains(&w.to_lowercase().as_str()))
    {
        words.pop();
    }
    words.join(" ")
}

/// Ordered patterns first, then a short all-alphabetic utterance.
pub fn extract_name(text: &str) -> Option<String> {
    introduced_name(text).or_else(|| bare_name(text))
}

/// Only an explicit introduction ("my name is", "call me", "X speaking").
pub fn introduced_name(text: &str) -> Option<String> {
    for (index, pattern) in NAME_PATTERNS.iter().enumerate() {
        let Some(caps) = pattern.captures(text) else {
            continue;
        };
        let Some(raw) = caps.get(1) else {
            continue;
        };
        let candidate = trim_trailing_fillers(raw.as_str());
        if candidate.is_empty() || is_blocked_name(&candidate) {
            continue;
        }
        let lowercase_pattern = index == NAME_PATTERNS.len() - 1;
        return Some(if lowercase_pattern {
            title_case(&candidate)
        } else {
            candidate
        });
    }
    None
}

fn bare_name(text: &str) -> Option<String> {
    let cleaned = text.trim().trim_end_matches(['.', '!', '?', ',']);
    let words: Vec<&str> = cleaned.split_whitespace().collect();
    if (1..=3).contains(&words.len())
        && words.iter().all(|w| w.chars().all(char::is_alphabetic))
        && !is_blocked_name(cleaned)
    {
        return Some(words.join(" "));
    }

    None
}

/// First department whose keyword set matches, in declaration order.
pub fn extract_service(text: &str) -> Option<Service> {
    classify::first_match(SERVICE_RULES, text)
}

const MONTHS: &str =
    "january|february|march|april|may|june|july|august|september|october|november|december";

static DAY_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\b(?:monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b".to_string(),
        r"\b(?:tomorrow|today|next week)\b".to_string(),
        format!(r"\b(?:{MONTHS}) \d{{1,2}}(?:st|nd|rd|th)?\b"),
        format!(r"\b\d{{1,2}}(?:st|nd|rd|th)? of (?:{MONTHS})\b"),
    ]
    .iter()
    .map(|p| Regex::new(p).expect("day pattern must compile"))
    .collect()
});

static CLOCK_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,2})(?::(\d{2}))? ?(am|pm)\b").expect("clock pattern must compile")
});

static TIME_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\b\d{1,2} o'?clock\b",
        r"\b(?:morning|afternoon|evening)\b",
        r"\b(?:noon|midnight)\b",
    ]
    .into_iter()
    .map(|p| Regex::new(p).expect("time pattern must compile"))
    .collect()
});

fn extract_day(lower: &str) -> Option<String> {
    DAY_PATTERNS
        .iter()
        .find_map(|p| p.find(lower))
        .map(|m| m.as_str().to_string())
}

fn extract_clock(lower: &str) -> Option<String> {
    if let Some(caps) = CLOCK_TIME.captures(lower) {
        let hour = &caps[1];
        let meridiem = caps[3].to_uppercase();
        return Some(match caps.get(2) {
            Some(minutes) => format!("{hour}:{} {meridiem}", minutes.as_str()),
            None => format!("{hour} {meridiem}"),
        });
    }
    TIME_PATTERNS
        .iter()
        .find_map(|p| p.find(lower))
        .map(|m| m.as_str().to_string())
}

/// "<day> at <time>". A missing half defaults to "tomorrow" or "10:00 AM".
pub fn extract_time(text: &str) -> Option<String> {
    let lower = text.to_lowercase();
    match (extract_day(&lower), extract_clock(&lower)) {
        (Some(day), Some(time)) => Some(format!("{day} at {time}")),
        (Some(day), None) => Some(format!("{day} at 10:00 AM")),
        (None, Some(time)) => Some(format!("tomorrow at {time}")),
        (None, None) => None,
    }
}

/// Digits only, and only for UAE-style prefixes with enough digits behind them.
pub fn extract_phone(text: &str) -> Option<String> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    if digits.len() < 9 {
        return None;
    }
    if digits.starts_with("05") && digits.len() >= 10 {
        Some(digits[..10].to_string())
    } else if digits.starts_with("971") && digits.len() >= 12 {
        Some(digits[..12].to_string())
    } else if digits.starts_with("00971") && digits.len() >= 14 {
        Some(digits[..14].to_string())
    } else {
        None
    }
}

pub fn is_valid_uae_phone(phone: &str) -> bool {
    if phone.starts_with("05") && phone.len() == 10 && phone.chars().all(|c| c.is_ascii_digit()) {
        true
    } else if phone.starts_with("+971") || phone.starts_with("00971") {
        phone.len() >= 12
    } else {
        phone.starts_with("971") && phone.len() >= 12
    }
}

/// Display form read back to the caller, e.g. "(05) 012-34567".
pub fn format_uae_phone(phone: &str) -> String {
    if !phone.is_ascii() {
        return phone.to_string();
    }
    if phone.starts_with("05") && phone.len() == 10 {
        format!("({}) {}-{}", &phone[..2], &phone[2..5], &phone[5..])
    } else if phone.starts_with("971") && phone.len() > 8 {
        format!("+{} {} {}-{}", &phone[..3], &phone[3..5], &phone[5..8], &phone[8..])
    } else if phone.starts_with("+971") && phone.len() > 9 {
        format!("{} {} {}-{}", &phone[..4], &phone[4..6], &phone[6..9], &phone[9..])
    } else {
        phone.to_string()
    }
}

/// E.164 form for the SMS gateway.
pub fn uae_e164(phone: &str) -> String {
    if let Some(rest) = phone.strip_prefix("00971") {
        format!("+971{rest}")
    } else if phone.starts_with("971") {
        format!("+{phone}")
    } else if let Some(rest) = phone.strip_prefix('0') {
        format!("+971{rest}")
    } else if phone.starts_with('+') {
        phone.to_string()
    } else {
        format!("+{phone}")
    }
}
