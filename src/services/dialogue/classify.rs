//! Keyword classifiers over caller utterances.
//!
//! Rule tables are evaluated in declaration order and the first match wins,
//! so reordering a table changes behavior.

use crate::models::{Emotion, Service};

/// A set of trigger terms and the value produced when any of them matches.
pub struct Rule<T> {
    pub terms: &'static [&'static str],
    pub result: T,
}

/// Returns the result of the first rule with a matching term.
pub fn first_match<T: Copy>(rules: &[Rule<T>], text: &str) -> Option<T> {
    let lower = text.to_lowercase();
    rules
        .iter()
        .find(|rule| has_any_term(&lower, rule.terms))
        .map(|rule| rule.result)
}

/// Whole-word (or whole-phrase) match against already lowercased text.
/// Terms of four or more characters also match their plural in "s".
pub fn has_term(text: &str, term: &str) -> bool {
    if term.is_empty() {
        return false;
    }
    text.match_indices(term).any(|(start, _)| {
        let before_ok = text[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let mut rest = &text[start + term.len()..];
        if term.len() >= 4 {
            rest = rest.strip_prefix('s').unwrap_or(rest);
        }
        let after_ok = rest.chars().next().map_or(true, |c| !c.is_alphanumeric());
        before_ok && after_ok
    })
}

pub fn has_any_term(text: &str, terms: &[&str]) -> bool {
    terms.iter().any(|term| has_term(text, term))
}

/// Match at a word start only, so "haha" also catches "hahaha".
pub fn has_stem(text: &str, stem: &str) -> bool {
    text.match_indices(stem).any(|(start, _)| {
        text[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric())
    })
}

pub const SERVICE_RULES: &[Rule<Service>] = &[
    Rule {
        terms: &[
            "dental", "dentist", "teeth", "tooth", "cavity", "filling", "crown", "root canal",
            "braces", "orthodontist", "gums",
        ],
        result: Service::Dental,
    },
    Rule {
        terms: &[
            "ent", "ear", "ears", "nose", "throat", "sinus", "hearing", "tonsil", "tonsils",
            "voice", "snoring", "sleep apnea",
        ],
        result: Service::Ent,
    },
    Rule {
        terms: &[
            "dermatology", "dermatologist", "skin", "rash", "acne", "mole", "moles", "eczema",
            "psoriasis", "hair loss",
        ],
        result: Service::Dermatology,
    },
    Rule {
        terms: &[
            "general", "checkup", "check up", "check-up", "physical", "exam", "consultation",
            "primary care", "doctor",
        ],
        result: Service::General,
    },
];

pub const EMOTION_RULES: &[Rule<Emotion>] = &[
    Rule {
        terms: &[
            "pain", "painful", "hurt", "hurts", "hurting", "ache", "aching", "sore", "discomfort",
            "suffering", "agony", "ouch",
        ],
        result: Emotion::Pain,
    },
    Rule {
        terms: &[
            "anxious", "nervous", "worried", "worry", "scared", "afraid", "fear", "stress",
            "stressed", "concern", "concerned", "panic",
        ],
        result: Emotion::Anxiety,
    },
    Rule {
        terms: &[
            "urgent", "urgently", "emergency", "asap", "right away", "immediately", "soon",
            "hurry", "quick", "quickly",
        ],
        result: Emotion::Urgency,
    },
    Rule {
        terms: &[
            "confused", "confusing", "don't understand", "what do you mean", "unclear", "lost",
            "not following",
        ],
        result: Emotion::Confusion,
    },
    Rule {
        terms: &[
            "frustrated", "frustrating", "annoyed", "upset", "angry", "mad", "irritated",
            "fed up", "tired of",
        ],
        result: Emotion::Frustration,
    },
];

/// One emotion per turn, by fixed priority; neutral when nothing matches.
pub fn detect_emotion(text: &str) -> Emotion {
    first_match(EMOTION_RULES, text).unwrap_or_default()
}

const AFFIRMATIVE_WORDS: &[&str] = &[
    "yes", "yeah", "yep", "sure", "okay", "ok", "fine", "good", "alright", "correct", "right",
    "yup", "absolutely", "definitely", "certainly", "indeed", "true", "affirmative", "agreed",
    "works", "that works",
];

// "not" makes "not bad" read as a refusal. Known and kept.
const NEGATIVE_WORDS: &[&str] = &[
    "no", "nope", "nah", "not", "don't", "cannot", "can't", "won't", "wouldn't", "shouldn't",
    "never", "negative", "disagree", "incorrect", "wrong", "false", "impossible", "unavailable",
];

/// Plain substring membership, deliberately looser than the keyword rules.
pub fn is_affirmative(text: &str) -> bool {
    let lower = text.to_lowercase();
    AFFIRMATIVE_WORDS.iter().any(|w| lower.contains(w))
}

pub fn is_negative(text: &str) -> bool {
    let lower = text.to_lowercase();
    NEGATIVE_WORDS.iter().any(|w| lower.contains(w))
}

const BOOKING_TERMS: &[&str] = &[
    "book", "schedule", "appointment", "reserve", "see a doctor", "visit", "come in",
];

pub fn is_booking_inquiry(text: &str) -> bool {
    has_any_term(&text.to_lowercase(), BOOKING_TERMS)
}

const COMPLIMENT_TERMS: &[&str] = &[
    "nice voice", "sound nice", "sound good", "like your voice", "helpful", "you're great",
    "you are great", "you're amazing", "you are amazing", "thank you so much", "appreciate",
    "wonderful", "excellent", "fantastic", "good job", "well done", "impressive",
];

pub fn is_compliment(text: &str) -> bool {
    let lower = text.to_lowercase();
    COMPLIMENT_TERMS.iter().any(|t| has_stem(&lower, t))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Humor {
    Laughter,
    KnockKnock,
    Riddle,
}

const LAUGHTER_TERMS: &[&str] = &[
    "haha", "hehe", "lol", "lmao", "rofl", "joke", "funny", "kidding", "just kidding", "jk",
];

pub fn detect_humor(text: &str) -> Option<Humor> {
    let lower = text.to_lowercase();
    if LAUGHTER_TERMS.iter().any(|t| has_stem(&lower, t)) {
        Some(Humor::Laughter)
    } else if lower.contains("knock knock") {
        Some(Humor::KnockKnock)
    } else if lower.contains("why did the") || lower.contains("what do you call") {
        Some(Humor::Riddle)
    } else {
        None
    }
}

const ATTENTION_CUES: &[&str] = &["hear me out", "listen", "excuse me", "wait", "hold on"];

/// "Hold on", "listen": the caller wants the floor.
pub fn wants_to_speak(text: &str) -> bool {
    has_any_term(&text.to_lowercase(), ATTENTION_CUES)
}

/// Mentions a doctor generically ("doctor", "Dr.").
pub fn mentions_doctor(text: &str) -> bool {
    has_any_term(&text.to_lowercase(), &["doctor", "dr", "specialist", "physician"])
}
