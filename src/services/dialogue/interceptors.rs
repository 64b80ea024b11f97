//! Side-topic handlers checked before the state table. The first one that
//! answers wins and the conversation stays in its current state.

use rand::RngCore;

use super::classify::{self, has_any_term, has_term, Humor};
use super::clinic::{self, Doctor};
use super::extract;
use super::responses::{self, pick};
use crate::models::{ConversationState, Emotion, Service, Session, Topic, VoiceTone};
use crate::services::scheduling;

/// A reply produced outside the booking flow.
#[derive(Debug, Clone, PartialEq)]
pub struct Interception {
    pub text: String,
    pub tone: VoiceTone,
}

impl Interception {
    fn new(text: impl Into<String>, tone: VoiceTone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

type Interceptor = fn(&mut Session, &str, &mut dyn RngCore) -> Option<Interception>;

/// Checked in this order.
const CHAIN: &[(&str, Interceptor)] = &[
    ("doctor_rejection", doctor_rejection),
    ("humor", humor),
    ("compliment", compliment),
    ("doctor_question", doctor_question),
    ("clinic_question", clinic_question),
    ("small_talk", small_talk),
    ("wants_to_speak", wants_to_speak),
    ("interruption_ack", interruption_ack),
];

pub fn intercept(
    session: &mut Session,
    text: &str,
    rng: &mut dyn RngCore,
) -> Option<Interception> {
    CHAIN.iter().find_map(|(name, interceptor)| {
        let reply = interceptor(session, text, rng)?;
        tracing::debug!(
            session_id = %session.id,
            interceptor = *name,
            state = session.state.as_str(),
            "turn intercepted"
        );
        Some(reply)
    })
}

const SWITCH_DOCTOR: &[&str] = &["another doctor", "different doctor", "someone else"];

const DONT_WANT_DOCTOR: &[&str] = &[
    "don't want him",
    "don't want her",
    "don't want them",
    "don't want that doctor",
    "don't want this doctor",
];

fn doctor_rejection(
    session: &mut Session,
    text: &str,
    rng: &mut dyn RngCore,
) -> Option<Interception> {
    let current = session.flags.current_doctor.clone()?;
    let (_, doctor) = clinic::find_doctor(&current)?;
    let lower = text.to_lowercase();
    let first = doctor.first_name().to_lowercase();
    let last = doctor.last_name().to_lowercase();

    let named = has_term(&lower, &first) || has_term(&lower, &last);
    let rejected = has_any_term(&lower, SWITCH_DOCTOR)
        || has_any_term(&lower, DONT_WANT_DOCTOR)
        || has_term(&lower, &format!("not {first}"))
        || has_term(&lower, &format!("not {last}"))
        || (named && classify::is_negative(&lower));
    if !rejected {
        return None;
    }

    session.flags.rejected_doctors.insert(current);
    let service = session.patient_info.service_category();
    let next = scheduling::pick_doctor(service, &session.flags.rejected_doctors, rng);
    session.flags.current_doctor = Some(next.name.to_string());
    session.flags.last_topic = Some(Topic::DoctorInfo);

    Some(Interception::new(
        format!(
            "No problem, we can look at other options. {} is available and specializes in {}. \
             Would you like to schedule with them?",
            next.name, next.specialty
        ),
        VoiceTone::Reassuring,
    ))
}

/// Asking for a joke is small talk, not the caller joking.
const JOKE_REQUESTS: &[&str] = &["tell me a joke", "know any jokes", "know a joke"];

fn humor(session: &mut Session, text: &str, rng: &mut dyn RngCore) -> Option<Interception> {
    if has_any_term(&text.to_lowercase(), JOKE_REQUESTS) {
        return None;
    }
    let reply = match classify::detect_humor(text)? {
        Humor::Laughter => responses::humor_reply(rng),
        Humor::KnockKnock => "Haha! Who's there? I love knock-knock jokes!".to_string(),
        Humor::Riddle => "Haha! That's a good one! I love jokes like that. They make my day at the reception desk more fun.".to_string(),
    };
    session.flags.last_topic = Some(Topic::SmallTalk);
    Some(Interception::new(reply, VoiceTone::Amused))
}

fn compliment(session: &mut Session, text: &str, rng: &mut dyn RngCore) -> Option<Interception> {
    if !classify::is_compliment(text) {
        return None;
    }
    session.flags.last_topic = Some(Topic::SmallTalk);
    Some(Interception::new(
        pick(rng, responses::COMPLIMENT_REPLIES),
        VoiceTone::Happy,
    ))
}

const PRAISE_QUESTIONS: &[&str] = &["good", "recommend", "best", "trust"];
const FOLLOW_UP_CUES: &[&str] = &["doctor", "dr", "who", "tell me about", "about him", "about her"];

fn doctor_question(
    session: &mut Session,
    text: &str,
    rng: &mut dyn RngCore,
) -> Option<Interception> {
    let lower = text.to_lowercase();
    // "who is the doctor?" while an alternative is on offer is answered by the offer itself
    let follow_up = session.state != ConversationState::ConfirmAlternativeTime;
    let answer = named_doctor_answer(session, text, &lower)
        .or_else(|| follow_up.then(|| current_doctor_answer(session, &lower)).flatten())
        .or_else(|| general_doctor_answer(&lower))?;

    session.flags.last_topic = Some(Topic::DoctorInfo);
    let emotion = session.flags.emotional_state;
    let text = match emotion {
        Emotion::Anxiety | Emotion::Confusion => match responses::empathy(rng, emotion) {
            Some(prefix) => format!("{prefix} {answer}"),
            None => answer,
        },
        _ => answer,
    };
    Some(Interception::new(text, VoiceTone::Reassuring))
}

fn named_doctor_answer(session: &mut Session, text: &str, lower: &str) -> Option<String> {
    // "my name is Sarah Johnson" is not a question about Dr. Emily Johnson
    if extract::introduced_name(text).is_some() && !classify::mentions_doctor(text) {
        return None;
    }

    let titled = has_term(lower, "dr");
    let (service, doctor) = clinic::roster().find(|(_, d)| {
        has_term(lower, &d.last_name().to_lowercase())
            || (titled && has_term(lower, &d.first_name().to_lowercase()))
    })?;
    session.flags.current_doctor = Some(doctor.name.to_string());

    let answer = if has_any_term(lower, PRAISE_QUESTIONS) {
        praise(doctor)
    } else if has_any_term(lower, &["available", "schedule", "appointment", "book"]) {
        format!(
            "{} is typically available on {}. Would any of those days work for you?",
            doctor.name,
            doctor.availability_phrase()
        )
    } else if has_any_term(lower, &["specialty", "specialize", "expert"]) {
        format!(
            "{} specializes in {}. They're particularly known for their {} approach with patients.",
            doctor.name, doctor.specialty, doctor.personality
        )
    } else if has_any_term(lower, &["experience", "how long", "background"]) {
        format!(
            "{} has {} of experience and trained at {}. They're one of our most experienced specialists in {}.",
            doctor.name,
            doctor.experience,
            doctor.education,
            service.label()
        )
    } else if has_any_term(lower, &["language", "speak"]) {
        format!(
            "{} speaks {}. Would you prefer your appointment in a specific language?",
            doctor.name,
            doctor.languages.join(", ")
        )
    } else {
        overview(service, doctor)
    };
    Some(answer)
}

fn current_doctor_answer(session: &Session, lower: &str) -> Option<String> {
    let current = session.flags.current_doctor.as_deref()?;
    if !has_any_term(lower, FOLLOW_UP_CUES) {
        return None;
    }
    let (service, doctor) = clinic::find_doctor(current)?;
    Some(if has_any_term(lower, PRAISE_QUESTIONS) {
        praise(doctor)
    } else {
        overview(service, doctor)
    })
}

fn general_doctor_answer(lower: &str) -> Option<String> {
    if !has_any_term(lower, &["doctor", "specialist", "physician"]) {
        return None;
    }
    if has_any_term(lower, &["best", "recommend", "good"]) {
        Some("All of our doctors are excellent and board-certified in their specialties. If you let me know what type of service you're looking for, I can tell you more about the specific doctors in that department.".to_string())
    } else if has_any_term(lower, &["how many", "available"]) {
        Some("We have multiple specialists in each department. Our dental, ENT, dermatology, and general practice departments each have at least two dedicated doctors, plus supporting staff. Would you like to know about a specific department?".to_string())
    } else {
        None
    }
}

fn praise(doctor: &Doctor) -> String {
    format!(
        "Yes, {} is excellent! Patients consistently say that {}. They have {} experience and are known for being {}. Would you like to schedule with them?",
        doctor.name, doctor.patients_say, doctor.experience, doctor.personality
    )
}

fn overview(service: Service, doctor: &Doctor) -> String {
    format!(
        "{} is one of our top {} specialists with {} experience. They're known for being {} and specializing in {}. Patients particularly appreciate how {}. Would you like to schedule an appointment with them?",
        doctor.name,
        service.label(),
        doctor.experience,
        doctor.personality,
        doctor.specialty,
        doctor.patients_say
    )
}

fn clinic_question(
    session: &mut Session,
    text: &str,
    _rng: &mut dyn RngCore,
) -> Option<Interception> {
    let lower = text.to_lowercase();
    // once booked, parking and insurance get the wrap-up answer
    if session.state == ConversationState::ConfirmComplete
        && has_any_term(&lower, &["parking", "insurance", "payment"])
    {
        return None;
    }
    let answer = if has_any_term(&lower, &["hours", "open", "close", "when"]) {
        format!("{} is open {}", clinic::CLINIC_NAME, clinic::CLINIC_HOURS)
    } else if has_any_term(&lower, &["location", "address", "where"]) {
        format!("We're located at {}", clinic::CLINIC_LOCATION)
    } else if has_term(&lower, "parking") {
        format!("We have {}", clinic::CLINIC_PARKING)
    } else if has_any_term(&lower, &["insurance", "cover", "payment"]) {
        format!(
            "{} We also offer payment plans for those without insurance. Would you like me to check if we accept your specific insurance?",
            clinic::INSURANCE
        )
    } else if has_any_term(&lower, &["covid", "mask", "vaccination"]) {
        "We follow all current health guidelines. Masks are optional but available if you'd like one. If you're experiencing any COVID symptoms, we ask that you reschedule or consider a telehealth appointment instead.".to_string()
    } else if has_any_term(&lower, &["services", "offer", "provide"]) {
        format!(
            "{} Each department has highly qualified specialists. Is there a particular service you're interested in today?",
            clinic::CLINIC_INFO
        )
    } else {
        return None;
    };
    session.flags.last_topic = Some(Topic::ClinicInfo);
    Some(Interception::new(answer, VoiceTone::Informative))
}

const GREETING_WORDS: &[&str] = &[
    "hi", "hello", "hey", "greetings", "good morning", "good afternoon", "good evening",
];

fn small_talk_reply(session: &Session, text: &str, rng: &mut dyn RngCore) -> Option<String> {
    let lower = text.to_lowercase();
    let has = |term: &str| has_term(&lower, term);

    if has("your name") || has("who are you") {
        return Some(format!(
            "My name is {}! I'm the receptionist here at {}. I've been working here for {} and I really enjoy {}.",
            clinic::RECEPTIONIST,
            clinic::CLINIC_NAME,
            clinic::RECEPTIONIST_EXPERIENCE,
            clinic::FAVORITE_PART
        ));
    }
    if has("how are you") || has("how's your day") || has("how are things") {
        return Some(pick(rng, responses::HOW_ARE_YOU).to_string());
    }
    // "yes, thanks" to a confirmation question is a yes
    let confirming = matches!(
        session.state,
        ConversationState::ConfirmPhone | ConversationState::ConfirmAlternativeTime
    );
    if (has("thank you") || has("thanks")) && !(confirming && classify::is_affirmative(text)) {
        return Some(pick(rng, responses::THANKS).to_string());
    }
    if has_any_term(&lower, &["weather", "nice day", "raining", "sunny"]) {
        return Some(pick(rng, responses::WEATHER).to_string());
    }
    // a weekday answer while choosing a time is not small talk
    let choosing_time = matches!(
        session.state,
        ConversationState::CollectTime | ConversationState::ConfirmAlternativeTime
    );
    if has("weekend") || (!choosing_time && (has("saturday") || has("sunday"))) {
        return Some(pick(rng, responses::WEEKEND).to_string());
    }
    if has("joke") || has("funny") {
        return Some(pick(rng, responses::JOKES).to_string());
    }
    if has("how long") && (has("work") || has("been")) {
        return Some(format!(
            "I've been working at {} for {}. Before that, I was a {}. I really love working here because {}.",
            clinic::CLINIC_NAME,
            clinic::RECEPTIONIST_EXPERIENCE,
            clinic::RECEPTIONIST_BACKGROUND,
            clinic::FAVORITE_PART
        ));
    }
    if has("like") && has("job") {
        return Some(format!(
            "I really enjoy my job! My favorite part is {}. {}",
            clinic::FAVORITE_PART,
            clinic::PERSONAL_TOUCH
        ));
    }
    if has("do you") && (has("live") || has("from")) {
        return Some(format!(
            "I live pretty close to the clinic actually. Makes for an easy commute! In my free time, I enjoy {}.",
            clinic::HOBBIES
        ));
    }
    let short = lower.split_whitespace().count() < 5;
    if short && has_any_term(&lower, GREETING_WORDS) && extract::introduced_name(text).is_none() {
        return Some(pick(rng, responses::GREETINGS).to_string());
    }
    None
}

fn small_talk(session: &mut Session, text: &str, rng: &mut dyn RngCore) -> Option<Interception> {
    let mut reply = small_talk_reply(session, text, rng)?;

    let earlier = session.flags.small_talk_count;
    session.flags.small_talk_count += 1;
    session.flags.last_topic = Some(Topic::SmallTalk);

    let steering = matches!(
        session.state,
        ConversationState::Greeting | ConversationState::CollectName
    );
    if earlier >= 1 && steering {
        reply = format!(
            "{reply} {} {}",
            pick(rng, responses::BRIDGE_TRANSITION),
            pick(rng, responses::BRIDGE_RETURN)
        );
    }
    Some(Interception::new(reply, VoiceTone::Friendly))
}

fn wants_to_speak(
    session: &mut Session,
    text: &str,
    rng: &mut dyn RngCore,
) -> Option<Interception> {
    if !classify::wants_to_speak(text) {
        return None;
    }
    session.flags.last_topic = Some(Topic::Listening);
    Some(Interception::new(
        pick(rng, responses::LISTENING),
        VoiceTone::Attentive,
    ))
}

fn interruption_ack(
    session: &mut Session,
    _text: &str,
    rng: &mut dyn RngCore,
) -> Option<Interception> {
    if !session.flags.was_interrupted {
        return None;
    }
    session.flags.was_interrupted = false;
    Some(Interception::new(
        pick(rng, responses::interruption_lines(session.state)),
        VoiceTone::Apologetic,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_humor_wins_over_everything_after_rejection() {
        let mut session = Session::new("s1");
        let reply = intercept(&mut session, "Haha, my name is John", &mut rng()).unwrap();
        assert_eq!(reply.tone, VoiceTone::Amused);
        assert_eq!(session.state, ConversationState::Greeting);
        assert!(session.patient_info.name.is_none());
    }

    #[test]
    fn test_plain_booking_answers_are_not_intercepted() {
        let mut session = Session::new("s1");
        assert!(intercept(&mut session, "My name is Sarah Ahmed", &mut rng()).is_none());
        session.state = ConversationState::CollectService;
        assert!(intercept(&mut session, "I need a dental appointment", &mut rng()).is_none());
        session.state = ConversationState::CollectTime;
        session.flags.current_doctor = Some("Dr. Sarah Chen".to_string());
        assert!(intercept(&mut session, "Monday at 10 AM", &mut rng()).is_none());
        assert!(intercept(&mut session, "Saturday at 10 AM", &mut rng()).is_none());
        session.state = ConversationState::CollectPhone;
        assert!(intercept(&mut session, "0501234567", &mut rng()).is_none());
    }

    #[test]
    fn test_self_introduction_does_not_trigger_doctor_lookup() {
        let mut session = Session::new("s1");
        assert!(intercept(&mut session, "My name is Sarah Johnson", &mut rng()).is_none());
        assert!(session.flags.current_doctor.is_none());
    }

    #[test]
    fn test_doctor_question_by_last_name() {
        let mut session = Session::new("s1");
        let reply = intercept(&mut session, "Is Dr. Kim good?", &mut rng()).unwrap();
        assert_eq!(reply.tone, VoiceTone::Reassuring);
        assert!(reply.text.starts_with("Yes, Dr. David Kim is excellent!"));
        assert_eq!(session.flags.current_doctor.as_deref(), Some("Dr. David Kim"));
        assert_eq!(session.flags.last_topic, Some(Topic::DoctorInfo));
    }

    #[test]
    fn test_doctor_languages() {
        let mut session = Session::new("s1");
        let reply = intercept(&mut session, "What languages does Dr. Patel speak?", &mut rng()).unwrap();
        assert!(reply.text.contains("English, Hindi, Gujarati"));
    }

    #[test]
    fn test_doctor_rejection_picks_someone_else() {
        let mut session = Session::new("s1");
        session.patient_info.service = Some(Service::Dental);
        session.flags.current_doctor = Some("Dr. Sarah Chen".to_string());
        let reply = intercept(&mut session, "Can I see a different doctor?", &mut rng()).unwrap();
        assert!(reply.text.contains("Dr. Michael Rodriguez"));
        assert!(session.flags.rejected_doctors.contains("Dr. Sarah Chen"));
        assert_eq!(
            session.flags.current_doctor.as_deref(),
            Some("Dr. Michael Rodriguez")
        );
    }

    #[test]
    fn test_clinic_hours() {
        let mut session = Session::new("s1");
        let reply = intercept(&mut session, "What are your hours?", &mut rng()).unwrap();
        assert_eq!(reply.tone, VoiceTone::Informative);
        assert!(reply.text.contains("Monday through Friday"));
    }

    #[test]
    fn test_small_talk_bridges_back_on_second_exchange() {
        let mut session = Session::new("s1");
        let first = intercept(&mut session, "How are you?", &mut rng()).unwrap();
        assert!(responses::HOW_ARE_YOU.contains(&first.text.as_str()));
        let second = intercept(&mut session, "Nice weather today", &mut rng()).unwrap();
        assert!(responses::BRIDGE_RETURN
            .iter()
            .any(|phrase| second.text.ends_with(phrase)));
        assert_eq!(session.flags.small_talk_count, 2);
        assert_eq!(session.state, ConversationState::Greeting);
    }

    #[test]
    fn test_short_greeting_with_name_is_not_small_talk() {
        let mut session = Session::new("s1");
        assert!(intercept(&mut session, "Hello, I'm Omar", &mut rng()).is_none());
        assert!(intercept(&mut session, "Hello there", &mut rng()).is_some());
    }

    #[test]
    fn test_joke_request_is_small_talk() {
        let mut session = Session::new("s1");
        let reply = intercept(&mut session, "Can you tell me a joke", &mut rng()).unwrap();
        assert_eq!(reply.tone, VoiceTone::Friendly);
        assert!(responses::JOKES.contains(&reply.text.as_str()));
    }

    #[test]
    fn test_interruption_acknowledged_once() {
        let mut session = Session::new("s1");
        session.state = ConversationState::CollectPhone;
        session.mark_interrupted();
        let reply = intercept(&mut session, "0501234567", &mut rng()).unwrap();
        assert_eq!(reply.tone, VoiceTone::Apologetic);
        assert!(!session.flags.was_interrupted);
        assert!(intercept(&mut session, "0501234567", &mut rng()).is_none());
    }

    #[test]
    fn test_follow_up_doctor_question_left_to_alternative_offer() {
        let mut session = Session::new("s1");
        session.state = ConversationState::ConfirmAlternativeTime;
        session.flags.current_doctor = Some("Dr. Sarah Chen".to_string());
        assert!(intercept(&mut session, "Who is the doctor?", &mut rng()).is_none());
        session.state = ConversationState::CollectService;
        assert!(intercept(&mut session, "Who is the doctor?", &mut rng()).is_some());
    }

    #[test]
    fn test_parking_after_booking_left_to_wrap_up() {
        let mut session = Session::new("s1");
        session.state = ConversationState::ConfirmComplete;
        assert!(intercept(&mut session, "Is there parking?", &mut rng()).is_none());
        assert!(intercept(&mut session, "Do you take insurance?", &mut rng()).is_none());
        session.state = ConversationState::CollectTime;
        let reply = intercept(&mut session, "Is there parking?", &mut rng()).unwrap();
        assert_eq!(reply.tone, VoiceTone::Informative);
    }

    #[test]
    fn test_yes_thanks_while_confirming_is_not_small_talk() {
        let mut session = Session::new("s1");
        session.state = ConversationState::ConfirmPhone;
        assert!(intercept(&mut session, "Yes, thank you", &mut rng()).is_none());
        assert!(intercept(&mut session, "Thanks", &mut rng()).is_some());
        session.state = ConversationState::CollectTime;
        assert!(intercept(&mut session, "Yes, thank you", &mut rng()).is_some());
    }

    #[test]
    fn test_listening_cue() {
        let mut session = Session::new("s1");
        let reply = intercept(&mut session, "Hold on a second", &mut rng()).unwrap();
        assert_eq!(reply.tone, VoiceTone::Attentive);
        assert_eq!(session.flags.last_topic, Some(Topic::Listening));
    }
}
