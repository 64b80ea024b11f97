//! Canned reply tables and the random choices made over them.

use rand::seq::SliceRandom;
use rand::Rng;

use super::classify;
use super::clinic::Doctor;
use crate::models::{ConversationState, Emotion};

pub const FILLERS: &[&str] = &[
    "um", "uh", "hmm", "well", "you know", "like", "actually", "basically", "I mean",
    "let's see", "so", "right", "okay", "now", "honestly", "let me think",
    "let me check that for you", "just a moment", "that's a good question", "I understand",
    "I see what you mean",
];

/// Tokens whose presence means the text already sounds spoken.
const TOUCH_MARKERS: &[&str] = &["um", "uh", "well", "actually", "you know"];

const EMPATHY_PAIN: &[&str] = &[
    "Oh no, that sounds uncomfortable. We'll make sure the doctor addresses that right away.",
    "I'm sorry to hear you're in pain. That must be difficult to deal with.",
    "That sounds painful! Let's get you in to see the doctor as soon as possible.",
    "I understand how disruptive pain can be. We'll make sure you get the care you need.",
];

const EMPATHY_ANXIETY: &[&str] = &[
    "It's completely normal to feel nervous about medical appointments. Our doctors are really good at putting patients at ease.",
    "I understand your concerns. Many patients feel the same way, and our team is very gentle and supportive.",
    "I hear you. Medical anxiety is very common, and our doctors are really understanding about it.",
    "That's a very valid feeling. If it helps, we can make a note for the doctor so they're aware of your concerns.",
];

const EMPATHY_URGENCY: &[&str] = &[
    "I understand this is urgent for you. Let me see what we can do to get you in quickly.",
    "That definitely sounds like something we should address soon. Let me check our earliest openings.",
    "I can hear this is important to you. Let's prioritize finding you an appointment as soon as possible.",
    "I appreciate you letting me know this is urgent. Let me look for our next available slot.",
];

const EMPATHY_CONFUSION: &[&str] = &[
    "I might not have explained that clearly. Let me try again in a different way.",
    "I understand that might be confusing. Let me break it down a bit more.",
    "Sorry about that! Let me clarify what I mean.",
    "That's a good point - let me make sure I'm being clear about this.",
];

const EMPATHY_FRUSTRATION: &[&str] = &[
    "I understand your frustration. Let's take a step back and figure out the best way forward.",
    "I'm sorry this has been difficult. Your concerns are completely valid, and I want to help resolve this.",
    "I can hear this is frustrating for you, and I apologize for that. Let's see how we can make this better.",
    "You have every right to feel that way. Let me see what I can do to help improve the situation.",
];

pub const BRIDGE_TRANSITION: &[&str] = &[
    "Let me address that first, and then we can continue with the booking if that's okay.",
    "I'd be happy to discuss that before we continue.",
    "Let's pause the scheduling for a moment to talk about that.",
    "That's a good question. Let me answer that before we move on.",
    "I can definitely help with that. Let's take a moment to address it.",
];

pub const BRIDGE_RETURN: &[&str] = &[
    "Now, getting back to your appointment...",
    "So, returning to what we were discussing about scheduling...",
    "If you're ready, shall we continue with booking your appointment?",
    "Is there anything else you'd like to know, or shall we continue with the appointment details?",
    "Thanks for that discussion. Now, where were we with your appointment?",
];

pub const LISTENING: &[&str] = &[
    "I'm listening, go ahead.",
    "Sure, I'm all ears.",
    "Of course, please tell me more.",
    "Yes, I'm here and listening.",
    "Please go ahead, I'm following you.",
];

const TRUST_BUILDERS: &[&str] = &[
    "Patients consistently give {doctor} excellent reviews, especially for {specialty}.",
    "I've heard many patients say that {doctor} is particularly good with {trait}.",
    "{doctor} has a wonderful way of explaining procedures in simple terms that patients really appreciate.",
    "Many of our regular patients specifically request {doctor} because of their gentle approach.",
    "If it helps, {doctor} has {experience} of experience and specializes in {specialty}.",
    "Personally, I've heard great things about how {doctor} takes time with each patient.",
];

pub const GREETINGS: &[&str] = &[
    "Hi there! How are you doing today?",
    "Hello! It's great to hear from you. How can I help?",
    "Hey! How's your day going so far?",
    "Good to hear from you! How are you feeling today?",
];

pub const HOW_ARE_YOU: &[&str] = &[
    "I'm doing great, thanks for asking! It's been a busy but good day at the clinic. How about you?",
    "I'm wonderful, thank you! Always happy to help our patients. How are you today?",
    "I'm excellent! Just helping patients schedule their appointments. How are you feeling today?",
    "I'm very well, thanks! It's a pleasure to assist you today. How are you doing?",
];

pub const THANKS: &[&str] = &[
    "You're very welcome! It's my pleasure to help.",
    "Happy to help! That's what I'm here for.",
    "No problem at all! Is there anything else I can assist you with?",
    "Of course! I'm glad I could be of assistance.",
];

pub const WEATHER: &[&str] = &[
    "The weather's been lovely lately! Though I'm inside the clinic most of the day. Are you enjoying it?",
    "I heard it's supposed to be nice this week! Perfect time to come in for your appointment.",
    "It's a beautiful day outside! Makes coming to appointments a bit more pleasant, doesn't it?",
    "The weather's been changing so much lately! Hope it's nice when you come in for your visit.",
];

pub const WEEKEND: &[&str] = &[
    "Weekends at the clinic are a bit quieter, but we're open Saturday mornings! Do you prefer weekend appointments?",
    "I love weekends too! We offer Saturday morning appointments if that works better for your schedule.",
    "Weekends are great, aren't they? We have limited Saturday hours if that's more convenient for you.",
    "The clinic has Saturday morning hours, which many of our patients find convenient for their busy schedules.",
];

pub const JOKES: &[&str] = &[
    "Why don't scientists trust atoms? Because they make up everything! Sorry, that's my favorite clinic joke.",
    "What did one wall say to the other wall? I'll meet you at the corner! Sorry, I like to keep things light around here.",
    "Why did the doctor carry a red pen? In case they needed to draw blood! Sorry, medical humor is my specialty.",
    "What do you call a doctor who fixes websites? A URL-ologist! Sorry, I can't help myself with these jokes.",
];

pub const COMPLIMENT_REPLIES: &[&str] = &[
    "Aww, that's so sweet of you to say! You just made my day!",
    "Thank you so much! I really enjoy helping our patients.",
    "That's very kind of you! It means a lot to hear that.",
    "You're too kind! Comments like that make this job so rewarding.",
];

const HUMOR_REPLIES: &[&str] = &[
    "Haha! That's a good one! {filler} I needed that laugh today.",
    "Oh my goodness, that's funny! {filler} You have a great sense of humor.",
    "Haha! {filler} I appreciate patients who can keep things light.",
    "That made me smile! {filler} It's always nice to have a bit of humor in the day.",
];

const INTERRUPTED_GREETING: &[&str] = &[
    "Oh, sorry! Go ahead, I'm listening.",
    "Please, I didn't mean to interrupt. What were you saying?",
    "Sorry about that! Please continue.",
];
const INTERRUPTED_NAME: &[&str] = &[
    "I'll pause there. Did you want to tell me your name?",
    "Sorry for talking too much. Please go ahead with your name.",
    "I hear you. Let's start with your name when you're ready.",
];
const INTERRUPTED_SERVICE: &[&str] = &[
    "Sorry, I'll stop there. What type of appointment did you need?",
    "I hear you. What service were you interested in?",
    "Let me pause. What kind of appointment are you looking for?",
];
const INTERRUPTED_TIME: &[&str] = &[
    "Sorry about that. What time works best for you?",
    "I'll pause there. When would you like to come in?",
    "Let me stop and listen. What day and time would you prefer?",
];
const INTERRUPTED_PHONE: &[&str] = &[
    "Sorry, I'll pause. Could you share your phone number?",
    "I hear you. What's your phone number for the confirmation?",
    "Let me stop there. What phone number should we use for the confirmation?",
];
const INTERRUPTED_DEFAULT: &[&str] = &[
    "Sorry for talking over you. Please go ahead.",
    "I hear you. Please continue.",
    "Let me pause and listen to what you're saying.",
];

pub fn interruption_lines(state: ConversationState) -> &'static [&'static str] {
    match state {
        ConversationState::Greeting => INTERRUPTED_GREETING,
        ConversationState::CollectName => INTERRUPTED_NAME,
        ConversationState::CollectService => INTERRUPTED_SERVICE,
        ConversationState::CollectTime => INTERRUPTED_TIME,
        ConversationState::CollectPhone => INTERRUPTED_PHONE,
        _ => INTERRUPTED_DEFAULT,
    }
}

fn empathy_lines(emotion: Emotion) -> &'static [&'static str] {
    match emotion {
        Emotion::Pain => EMPATHY_PAIN,
        Emotion::Anxiety => EMPATHY_ANXIETY,
        Emotion::Urgency => EMPATHY_URGENCY,
        Emotion::Confusion => EMPATHY_CONFUSION,
        Emotion::Frustration => EMPATHY_FRUSTRATION,
        Emotion::Neutral => &[],
    }
}

/// Uniform pick; empty string for an empty table.
pub fn pick<'a, R: Rng + ?Sized>(rng: &mut R, options: &[&'a str]) -> &'a str {
    options.choose(rng).copied().unwrap_or("")
}

/// A filler 40% of the time.
pub fn filler<R: Rng + ?Sized>(rng: &mut R) -> Option<&'static str> {
    if rng.gen_bool(0.4) {
        Some(pick(rng, FILLERS))
    } else {
        None
    }
}

/// Sentence with a possible spoken lead-in: "Hmm, let me check".
pub fn lead<R: Rng + ?Sized>(rng: &mut R, sentence: &str) -> String {
    match filler(rng) {
        Some(f) => format!("{}, {}", capitalize(f), soften_start(sentence)),
        None => sentence.to_string(),
    }
}

pub fn empathy<R: Rng + ?Sized>(rng: &mut R, emotion: Emotion) -> Option<&'static str> {
    let lines = empathy_lines(emotion);
    (!lines.is_empty()).then(|| pick(rng, lines))
}

pub fn humor_reply<R: Rng + ?Sized>(rng: &mut R) -> String {
    let template = pick(rng, HUMOR_REPLIES);
    let filler = filler(rng).map(capitalize).unwrap_or_default();
    collapse_whitespace(&template.replace("{filler}", &filler))
}

pub fn trust_builder<R: Rng + ?Sized>(rng: &mut R, doctor: &Doctor) -> String {
    pick(rng, TRUST_BUILDERS)
        .replace("{doctor}", doctor.name)
        .replace("{specialty}", doctor.specialty)
        .replace("{trait}", doctor.personality)
        .replace("{experience}", doctor.experience)
}

/// Sprinkles fillers in front of later sentences (30% each), unless the text
/// already carries one.
pub fn add_human_touches<R: Rng + ?Sized>(text: &str, rng: &mut R) -> String {
    let lower = text.to_lowercase();
    if classify::has_any_term(&lower, TOUCH_MARKERS) {
        return collapse_whitespace(text);
    }

    let touched: Vec<String> = split_sentences(text)
        .into_iter()
        .enumerate()
        .map(|(i, sentence)| {
            if i > 0 && sentence.split_whitespace().count() >= 3 && rng.gen_bool(0.3) {
                lead(rng, sentence)
            } else {
                sentence.to_string()
            }
        })
        .collect();

    collapse_whitespace(&touched.join(" "))
}

fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        let Some(&(next, n)) = chars.peek() else {
            break;
        };
        // "Dr. Chen" is one sentence
        if n.is_whitespace() && !text[start..=i].ends_with("Dr.") {
            sentences.push(text[start..next].trim());
            start = next;
        }
    }
    let rest = text[start..].trim();
    if !rest.is_empty() {
        sentences.push(rest);
    }
    sentences.retain(|s| !s.is_empty());
    sentences
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lowercases the first letter unless the sentence opens with "I", a title,
/// an acronym or a name we know.
fn soften_start(sentence: &str) -> String {
    let first_word = sentence.split_whitespace().next().unwrap_or("");
    let letters: String = first_word.chars().filter(|c| c.is_alphabetic()).collect();
    let keep = first_word == "I"
        || first_word.starts_with("I'")
        || first_word.starts_with("Dr")
        || first_word.starts_with("Noor")
        || first_word.starts_with("Rachel")
        || (letters.len() > 1 && letters.chars().all(char::is_uppercase));
    if keep {
        return sentence.to_string();
    }
    let mut chars = sentence.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_split_sentences_keeps_titles_together() {
        let parts = split_sentences("Great choice! Dr. Sarah Chen is lovely. When works?");
        assert_eq!(parts, vec!["Great choice!", "Dr. Sarah Chen is lovely.", "When works?"]);
    }

    #[test]
    fn test_human_touches_skip_text_with_fillers() {
        let mut rng = StdRng::seed_from_u64(7);
        let text = "Well, that is fine. We can see you on Monday at noon.";
        assert_eq!(add_human_touches(text, &mut rng), text);
    }

    #[test]
    fn test_human_touches_keep_first_sentence_and_content() {
        let text = "Perfect! Monday at 10:00 AM works great for your dental appointment. Could I get your phone number please?";
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let touched = add_human_touches(text, &mut rng);
            assert!(touched.starts_with("Perfect!"));
            assert!(touched.contains("at 10:00 AM works great"));
            assert!(touched.ends_with("phone number please?"));
            assert!(!touched.contains("  "));
        }
    }

    #[test]
    fn test_lead_softens_but_keeps_names() {
        assert_eq!(soften_start("Let me check"), "let me check");
        assert_eq!(soften_start("I'm here"), "I'm here");
        assert_eq!(soften_start("Dr. Kim is in"), "Dr. Kim is in");
        assert_eq!(soften_start("ENT is upstairs"), "ENT is upstairs");
    }

    #[test]
    fn test_empathy_only_for_emotions() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(empathy(&mut rng, Emotion::Neutral).is_none());
        let line = empathy(&mut rng, Emotion::Pain).unwrap();
        assert!(EMPATHY_PAIN.contains(&line));
    }

    #[test]
    fn test_humor_reply_has_no_placeholder() {
        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let reply = humor_reply(&mut rng);
            assert!(!reply.contains("{filler}"));
            assert!(!reply.contains("  "));
        }
    }

    #[test]
    fn test_trust_builder_fills_placeholders() {
        let doctor = &super::super::clinic::doctors(crate::models::Service::Ent)[0];
        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let line = trust_builder(&mut rng, doctor);
            assert!(line.contains("Dr. James Wilson"));
            assert!(!line.contains('{'));
        }
    }

    #[test]
    fn test_interruption_lines_per_state() {
        assert_eq!(interruption_lines(ConversationState::CollectTime), INTERRUPTED_TIME);
        assert_eq!(interruption_lines(ConversationState::ConfirmPhone), INTERRUPTED_DEFAULT);
    }
}
