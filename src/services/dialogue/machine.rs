//! One conversation turn: emotion, interceptors, then the state table.

use rand::{Rng, RngCore};

use super::classify::{self, has_any_term, has_term};
use super::clinic;
use super::extract;
use super::interceptors;
use super::responses::{self, lead};
use crate::models::{Appointment, ConversationState, Emotion, Session, Topic, VoiceTone};
use crate::services::scheduling::{self, SlotBook};

/// Result of one turn. `state` is already stored on the session.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub text: String,
    pub state: ConversationState,
    pub tone: VoiceTone,
    /// Set only on the turn that confirms the booking.
    pub appointment: Option<Appointment>,
}

const GREETING: &str =
    "Hello, thank you for calling Noor Medical Clinic. This is Rachel speaking. How can I help you today?";

const HANDOFF: &str = "I'm still having trouble understanding. Would you like me to connect you to a staff member for further assistance?";

const SERVICE_MENU: &str =
    "We offer dental care, ENT services, dermatology, and general checkups.";

pub fn greeting_text<R: Rng + ?Sized>(rng: &mut R) -> String {
    responses::add_human_touches(GREETING, rng)
}

struct Step {
    text: String,
    next: ConversationState,
    appointment: Option<Appointment>,
    /// Spoken as-is in this voice: no empathy prefix, no fillers added.
    fixed_tone: Option<VoiceTone>,
}

impl Step {
    fn to(next: ConversationState, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            next,
            appointment: None,
            fixed_tone: None,
        }
    }
}

pub fn process_turn(
    session: &mut Session,
    transcript: &str,
    slots: &dyn SlotBook,
    rng: &mut dyn RngCore,
) -> TurnOutcome {
    let emotion = classify::detect_emotion(transcript);
    if emotion != Emotion::Neutral {
        tracing::info!(session_id = %session.id, emotion = emotion.as_str(), "emotion detected");
        session.flags.emotional_state = emotion;
    }

    if let Some(reply) = interceptors::intercept(session, transcript, rng) {
        return TurnOutcome {
            text: responses::add_human_touches(&reply.text, rng),
            state: session.state,
            tone: reply.tone,
            appointment: None,
        };
    }

    let step = match session.state {
        ConversationState::Greeting => greeting(session, transcript, rng),
        ConversationState::CollectName => collect_name(session, transcript, rng),
        ConversationState::CollectService => collect_service(session, transcript, rng),
        ConversationState::CollectTime => collect_time(session, transcript, slots, rng),
        ConversationState::ConfirmAlternativeTime => {
            confirm_alternative_time(session, transcript, rng)
        }
        ConversationState::CollectPhone => collect_phone(session, transcript, rng),
        ConversationState::ConfirmPhone => confirm_phone(session, transcript, rng),
        ConversationState::ConfirmComplete => confirm_complete(session, transcript, rng),
        ConversationState::ProvideInfo => provide_info(session, transcript, rng),
        ConversationState::EndCall => after_goodbye(session, transcript, rng),
    };

    tracing::debug!(
        session_id = %session.id,
        from = session.state.as_str(),
        to = step.next.as_str(),
        "state transition"
    );
    session.state = step.next;
    session.flags.last_topic = Some(Topic::Appointment);

    let (text, tone) = match step.fixed_tone {
        Some(tone) => (responses::collapse_whitespace(&step.text), tone),
        None => {
            let emotion = session.flags.emotional_state;
            let text = match responses::empathy(rng, emotion) {
                Some(prefix) if rng.gen_bool(0.7) => format!("{prefix} {}", step.text),
                _ => step.text,
            };
            (responses::add_human_touches(&text, rng), emotion.reply_tone())
        }
    };

    TurnOutcome {
        text,
        state: step.next,
        tone,
        appointment: step.appointment,
    }
}

/// Re-ask, then re-ask asking for a rephrase, then offer a person.
fn fallback(session: &mut Session, reask: String) -> String {
    session.flags.fallback_count += 1;
    match session.flags.fallback_count {
        1 => reask,
        2 => format!("{reask} Could you rephrase it another way?"),
        _ => HANDOFF.to_string(),
    }
}

fn greeting(session: &mut Session, text: &str, rng: &mut dyn RngCore) -> Step {
    if let Some(name) = extract::extract_name(text) {
        let reply = format!(
            "{} {}",
            lead(rng, &format!("It's lovely to meet you, {name}!")),
            lead(rng, "My name is Rachel, and I'm the receptionist here at Noor Medical. What type of appointment are you looking to schedule today? We offer dental, ENT, dermatology, and general checkups.")
        );
        session.patient_info.name = Some(name);
        session.flags.fallback_count = 0;
        return Step::to(ConversationState::CollectService, reply);
    }

    let reply = if classify::is_booking_inquiry(text) {
        lead(rng, "I'd be happy to help you book an appointment! Could I get your name first, please?")
    } else {
        format!(
            "It's great to chat with you! {}",
            lead(rng, "I'm Rachel, the receptionist at Noor Medical Clinic. Could I get your name, please? Then I can help you with scheduling an appointment or answering any questions you might have.")
        )
    };
    Step::to(ConversationState::CollectName, reply)
}

fn collect_name(session: &mut Session, text: &str, rng: &mut dyn RngCore) -> Step {
    match extract::extract_name(text) {
        Some(name) => {
            let reply = format!(
                "Thanks, {name}! {} {}",
                lead(rng, "Did I get your name right?"),
                lead(rng, "What type of appointment would you like to schedule? We offer dental care, ENT services, dermatology, and general checkups. Or if you have questions about any of our doctors or services, I'm happy to help with that too.")
            );
            session.patient_info.name = Some(name);
            session.flags.fallback_count = 0;
            Step::to(ConversationState::CollectService, reply)
        }
        None => {
            let reask = lead(rng, "I'm sorry, I didn't quite catch your name. Could you please repeat it for me?");
            Step::to(ConversationState::CollectName, fallback(session, reask))
        }
    }
}

fn collect_service(session: &mut Session, text: &str, rng: &mut dyn RngCore) -> Step {
    if let Some(service) = extract::extract_service(text) {
        session.patient_info.service = Some(service);
        session.flags.fallback_count = 0;

        let doctor = scheduling::pick_doctor(service, &session.flags.rejected_doctors, rng);
        session.flags.current_doctor = Some(doctor.name.to_string());
        let reply = format!(
            "Great choice! {} {} When would you prefer to come in? We have several openings this week, or I can check specific days for you.",
            lead(rng, &format!("Our {} department is excellent.", service.label())),
            responses::trust_builder(rng, doctor)
        );
        return Step::to(ConversationState::CollectTime, reply);
    }

    let lower = text.to_lowercase();
    let reply = if has_term(&lower, "what")
        && has_any_term(&lower, &["services", "offer", "provide", "available"])
    {
        lead(rng, "We offer a wide range of services at Noor Medical Clinic, including dental care, ENT (ear, nose, and throat), dermatology, and general medical checkups. Our doctors are all board-certified with excellent reputations. Which service were you interested in today?")
    } else {
        let reask = format!(
            "I'm sorry, {} {SERVICE_MENU} Which one would you like to schedule?",
            lead(rng, "I didn't quite catch which service you need.")
        );
        fallback(session, reask)
    };
    Step::to(ConversationState::CollectService, reply)
}

/// The doctor already being discussed, or a fresh pick that becomes it.
fn discussed_doctor(session: &mut Session, rng: &mut dyn RngCore) -> &'static clinic::Doctor {
    let service = session.patient_info.service_category();
    let current = session
        .flags
        .current_doctor
        .as_deref()
        .and_then(clinic::find_doctor)
        .filter(|(s, _)| *s == service)
        .map(|(_, d)| d);
    let doctor = current.unwrap_or_else(|| {
        scheduling::pick_doctor(service, &session.flags.rejected_doctors, rng)
    });
    session.flags.current_doctor = Some(doctor.name.to_string());
    doctor
}

fn collect_time(
    session: &mut Session,
    text: &str,
    slots: &dyn SlotBook,
    rng: &mut dyn RngCore,
) -> Step {
    let service = session.patient_info.service_category();

    if let Some(time) = extract::extract_time(text) {
        session.patient_info.preferred_time = Some(time.clone());
        session.flags.fallback_count = 0;

        if slots.is_available(service, &time, rng) {
            let reply = format!(
                "Perfect! {} Could I get your phone number for the confirmation? We'll send you a reminder text the day before.",
                lead(rng, &format!("{time} works great for your {} appointment.", service.label()))
            );
            return Step::to(ConversationState::CollectPhone, reply);
        }

        let alternative = scheduling::suggest_alternative(service, Some(time.as_str()), rng);
        session.patient_info.alternative_time = Some(alternative.to_string());
        let doctor = scheduling::pick_doctor(service, &session.flags.rejected_doctors, rng);
        session.flags.current_doctor = Some(doctor.name.to_string());
        let reply = format!(
            "{} {} does have availability on {alternative} though. Would that work for you instead?",
            lead(rng, &format!("I just checked the schedule, and unfortunately {time} is already booked for {}.", service.label())),
            doctor.name
        );
        return Step::to(ConversationState::ConfirmAlternativeTime, reply);
    }

    let lower = text.to_lowercase();
    let reply = if has_any_term(&lower, &["available", "schedule", "free"]) {
        let doctor = discussed_doctor(session, rng);
        format!(
            "{} is typically available on {}. {} What time would work best for you?",
            doctor.name,
            doctor.availability_phrase(),
            lead(rng, &format!("We could also check with other {} specialists if you have a specific day in mind.", service.label()))
        )
    } else {
        let reask = lead(rng, "I'd be happy to find a convenient time for you. Do you prefer mornings or afternoons? We have appointments available throughout the week, and even some Saturday morning slots for certain services.");
        fallback(session, reask)
    };
    Step::to(ConversationState::CollectTime, reply)
}

fn confirm_alternative_time(session: &mut Session, text: &str, rng: &mut dyn RngCore) -> Step {
    let service = session.patient_info.service_category();
    let Some(alternative) = session.patient_info.alternative_time.clone() else {
        // nothing was offered; ask for a time again
        return Step::to(
            ConversationState::CollectTime,
            lead(rng, "Let's find a time that works for you. When would you prefer to come in?"),
        );
    };

    if classify::is_affirmative(text) {
        session.patient_info.preferred_time = Some(alternative.clone());
        let reply = format!(
            "Wonderful! {} Could I get your phone number to send you a confirmation? We'll also send a reminder the day before your appointment.",
            lead(rng, &format!("I've got you down for {alternative}."))
        );
        return Step::to(ConversationState::CollectPhone, reply);
    }

    if classify::is_negative(text) {
        let next = scheduling::suggest_alternative(service, Some(alternative.as_str()), rng);
        session.patient_info.alternative_time = Some(next.to_string());
        let reply = format!(
            "No problem at all! {} How about {next}? That just opened up in our schedule. Would that work better for you?",
            lead(rng, "Let me check what else we have...")
        );
        return Step::to(ConversationState::ConfirmAlternativeTime, reply);
    }

    let lower = text.to_lowercase();
    if has_any_term(&lower, &["doctor", "who"]) {
        let doctor = discussed_doctor(session, rng);
        let reply = format!(
            "{} is excellent! {} {}",
            doctor.name,
            lead(rng, &format!("Patients consistently say that {}.", doctor.patients_say)),
            lead(rng, &format!("Would you like to proceed with the appointment at {alternative}?"))
        );
        return Step {
            fixed_tone: Some(VoiceTone::Confident),
            ..Step::to(ConversationState::ConfirmAlternativeTime, reply)
        };
    }

    let reply = format!(
        "{} Just to confirm, would {alternative} work for your {} appointment? We want to make sure we find a time that's convenient for you.",
        lead(rng, "I'm not quite sure if that works for you."),
        service.label()
    );
    Step::to(ConversationState::ConfirmAlternativeTime, reply)
}

fn collect_phone(session: &mut Session, text: &str, rng: &mut dyn RngCore) -> Step {
    let reask = match extract::extract_phone(text) {
        Some(phone) if extract::is_valid_uae_phone(&phone) => {
            let reply = format!(
                "Let me confirm that phone number - {}. Is that correct? {}",
                extract::format_uae_phone(&phone),
                lead(rng, "This is the number we'll use to send your appointment confirmation.")
            );
            session.patient_info.phone = Some(phone);
            session.flags.fallback_count = 0;
            return Step::to(ConversationState::ConfirmPhone, reply);
        }
        Some(_) => lead(rng, "That doesn't seem to be a valid UAE phone number. Could you please provide your phone number again? It should start with 05 or +971."),
        None => format!(
            "I'm sorry, {}",
            lead(rng, "I didn't quite catch your phone number. Could you please provide it again? We'll use it to send you a confirmation text and appointment reminder.")
        ),
    };
    Step::to(ConversationState::CollectPhone, fallback(session, reask))
}

fn ask_for(stage: ConversationState) -> &'static str {
    match stage {
        ConversationState::CollectName => "Could I get your name, please?",
        ConversationState::CollectService => {
            "What type of appointment would you like? We offer dental care, ENT services, dermatology, and general checkups."
        }
        ConversationState::CollectTime => "When would you prefer to come in?",
        _ => "Could I get your phone number for the confirmation?",
    }
}

fn confirm_phone(session: &mut Session, text: &str, rng: &mut dyn RngCore) -> Step {
    let formatted = session
        .patient_info
        .phone
        .as_deref()
        .map(extract::format_uae_phone)
        .unwrap_or_default();

    if classify::is_affirmative(text) {
        let Some(details) = session.patient_info.booking_details() else {
            let stage = session
                .patient_info
                .first_missing_stage()
                .unwrap_or(ConversationState::CollectPhone);
            tracing::warn!(session_id = %session.id, missing = stage.as_str(), "booking confirmed with details missing");
            let reply = format!(
                "I'm sorry, I'm missing a few details for your booking. {}",
                ask_for(stage)
            );
            return Step::to(stage, reply);
        };

        let doctor = discussed_doctor(session, rng);
        let reply = format!(
            "Perfect! {} You'll receive a text confirmation at {formatted} shortly, and a reminder the day before your appointment. Is there anything else I can help you with today? Any questions about preparing for your visit?",
            lead(rng, &format!(
                "I've booked your {} appointment with {} for {}.",
                details.service.label(),
                doctor.name,
                details.time
            ))
        );
        let appointment = Appointment::new(details, Some(doctor.name.to_string()));
        return Step {
            appointment: Some(appointment),
            ..Step::to(ConversationState::ConfirmComplete, reply)
        };
    }

    if classify::is_negative(text) {
        let reply = format!(
            "I apologize for getting that wrong. {}",
            lead(rng, "Could you please provide your phone number again? We want to make sure we have the correct number for your appointment confirmation.")
        );
        return Step::to(ConversationState::CollectPhone, reply);
    }

    let reply = format!(
        "{} Could you please confirm if {formatted} is the correct phone number for your appointment confirmation?",
        lead(rng, "I'm not sure if that's a yes or no.")
    );
    Step::to(ConversationState::ConfirmPhone, reply)
}

fn confirm_complete(session: &mut Session, text: &str, rng: &mut dyn RngCore) -> Step {
    let lower = text.to_lowercase();
    if classify::is_affirmative(text) || lower.contains("question") {
        let service = session.patient_info.service_category();
        return Step::to(
            ConversationState::ProvideInfo,
            lead(rng, clinic::preparation_advice(service)),
        );
    }

    if has_term(&lower, "parking") {
        let reply = format!(
            "{} I've made a note of your appointment, and we're looking forward to seeing you. Is there anything else you'd like to know before we end the call?",
            lead(rng, &format!("We have {}", clinic::CLINIC_PARKING))
        );
        return Step::to(ConversationState::ConfirmComplete, reply);
    }

    if has_any_term(&lower, &["insurance", "payment"]) {
        let reply = format!(
            "{} If you'd like, you can bring your insurance card to your appointment, and we can verify coverage for you. Is there anything else you need to know?",
            lead(rng, clinic::INSURANCE)
        );
        return Step::to(ConversationState::ConfirmComplete, reply);
    }

    let reply = format!(
        "Thank you for calling Noor Medical Clinic today! {} If you need to reschedule or have any questions before your visit, please don't hesitate to call us back. Have a wonderful day!",
        lead(rng, "We're looking forward to seeing you for your appointment.")
    );
    Step::to(ConversationState::EndCall, reply)
}

fn provide_info(session: &mut Session, text: &str, rng: &mut dyn RngCore) -> Step {
    session.notes = Some(text.trim().to_string());
    let reply = format!(
        "Thank you for sharing that information. {} We're looking forward to seeing you at Noor Medical Clinic! Is there anything else you'd like to know before we end the call?",
        lead(rng, "I've added a note to your appointment so the doctor will be prepared to discuss this with you.")
    );
    Step::to(ConversationState::EndCall, reply)
}

fn after_goodbye(session: &mut Session, text: &str, rng: &mut dyn RngCore) -> Step {
    let lower = text.to_lowercase();
    if has_any_term(&lower, &["appointment", "schedule", "book"]) {
        let reply = lead(rng, &format!(
            "I'd be happy to help you book an appointment. Could you please tell me what type of service you're looking for? {SERVICE_MENU}"
        ));
        return Step::to(ConversationState::CollectService, reply);
    }
    if has_any_term(&lower, &["doctor", "specialist"]) {
        let reply = lead(rng, "We have excellent doctors in all our departments. Could you tell me what type of specialist you'd like to see? We have dental, ENT, dermatology, and general practice doctors.");
        return Step::to(ConversationState::CollectService, reply);
    }
    let reask = format!(
        "I'm sorry, {}",
        lead(rng, "I didn't quite catch that. Could you please repeat what you said? I want to make sure I'm helping you correctly.")
    );
    Step::to(session.state, fallback(session, reask))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Service;
    use crate::services::scheduling::FixedSlotBook;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const OPEN: FixedSlotBook = FixedSlotBook { open: true };
    const BOOKED: FixedSlotBook = FixedSlotBook { open: false };

    fn turn(session: &mut Session, text: &str, slots: &dyn SlotBook, seed: u64) -> TurnOutcome {
        let mut rng = StdRng::seed_from_u64(seed);
        process_turn(session, text, slots, &mut rng)
    }

    fn at_time_stage() -> Session {
        let mut session = Session::new("t");
        session.state = ConversationState::CollectTime;
        session.patient_info.name = Some("Sarah Ahmed".to_string());
        session.patient_info.service = Some(Service::Dental);
        session
    }

    #[test]
    fn test_five_valid_turns_book_once() {
        let mut session = Session::new("t");
        let script = [
            ("My name is Sarah Ahmed", ConversationState::CollectService),
            ("I need a dental appointment", ConversationState::CollectTime),
            ("Monday at 10 AM", ConversationState::CollectPhone),
            ("0501234567", ConversationState::ConfirmPhone),
            ("Yes", ConversationState::ConfirmComplete),
        ];
        let mut booked = Vec::new();
        for (seed, (said, expected)) in script.into_iter().enumerate() {
            let outcome = turn(&mut session, said, &OPEN, seed as u64);
            assert_eq!(outcome.state, expected, "after {said:?}");
            booked.extend(outcome.appointment);
        }
        assert_eq!(booked.len(), 1);
        let appointment = &booked[0];
        assert_eq!(appointment.patient_name, "Sarah Ahmed");
        assert_eq!(appointment.service, Service::Dental);
        assert_eq!(appointment.scheduled_time, "monday at 10 AM");
        assert_eq!(appointment.phone_number, "0501234567");
        assert!(appointment.doctor.is_some());
    }

    #[test]
    fn test_booked_time_offers_alternative() {
        let mut session = at_time_stage();
        let outcome = turn(&mut session, "Tuesday at 3 pm", &BOOKED, 1);
        assert_eq!(outcome.state, ConversationState::ConfirmAlternativeTime);
        let alternative = session.patient_info.alternative_time.clone().unwrap();
        assert!(outcome.text.contains(&alternative));
        assert_eq!(session.patient_info.preferred_time.as_deref(), Some("tuesday at 3 PM"));
    }

    #[test]
    fn test_accepting_alternative_overwrites_preferred_time() {
        let mut session = at_time_stage();
        turn(&mut session, "Tuesday at 3 pm", &BOOKED, 1);
        let alternative = session.patient_info.alternative_time.clone().unwrap();
        let outcome = turn(&mut session, "Yes, that works", &BOOKED, 2);
        assert_eq!(outcome.state, ConversationState::CollectPhone);
        assert_eq!(session.patient_info.preferred_time, Some(alternative));
    }

    #[test]
    fn test_rejecting_alternative_offers_a_different_one() {
        for seed in 0..10 {
            let mut session = at_time_stage();
            turn(&mut session, "Tuesday at 3 pm", &BOOKED, seed);
            let first = session.patient_info.alternative_time.clone().unwrap();
            let outcome = turn(&mut session, "No, I can't make that", &BOOKED, seed + 100);
            assert_eq!(outcome.state, ConversationState::ConfirmAlternativeTime);
            let second = session.patient_info.alternative_time.clone().unwrap();
            assert_ne!(first, second);
            assert!(outcome.text.contains(&second));
        }
    }

    #[test]
    fn test_doctor_question_during_alternative_offer() {
        for seed in 0..20 {
            for question in ["Who is the doctor?", "Which doctor is that?", "who"] {
                let mut session = at_time_stage();
                turn(&mut session, "Tuesday at 3 pm", &BOOKED, seed);
                let alternative = session.patient_info.alternative_time.clone().unwrap();
                let doctor = session.flags.current_doctor.clone().unwrap();
                let outcome = turn(&mut session, question, &BOOKED, seed + 50);
                assert_eq!(outcome.state, ConversationState::ConfirmAlternativeTime);
                assert_eq!(outcome.tone, VoiceTone::Confident);
                assert!(outcome.text.starts_with(&format!("{doctor} is excellent!")));
                assert!(outcome.text.contains(&alternative));
            }
        }
    }

    #[test]
    fn test_yes_thank_you_confirms_phone() {
        let mut session = at_time_stage();
        session.patient_info.preferred_time = Some("monday at 10 AM".to_string());
        session.patient_info.phone = Some("0501234567".to_string());
        session.state = ConversationState::ConfirmPhone;
        let outcome = turn(&mut session, "Yes, thank you", &OPEN, 1);
        assert_eq!(outcome.state, ConversationState::ConfirmComplete);
        assert!(outcome.appointment.is_some());
    }

    #[test]
    fn test_humor_keeps_state_and_name_unset() {
        let mut session = Session::new("t");
        session.state = ConversationState::CollectName;
        let outcome = turn(&mut session, "Haha, my name is John", &OPEN, 4);
        assert_eq!(outcome.state, ConversationState::CollectName);
        assert_eq!(outcome.tone, VoiceTone::Amused);
        assert!(session.patient_info.name.is_none());
    }

    #[test]
    fn test_fallback_escalates_to_handoff() {
        let mut session = Session::new("t");
        session.state = ConversationState::CollectPhone;
        let first = turn(&mut session, "it is five five five", &OPEN, 1);
        let second = turn(&mut session, "it is five five five", &OPEN, 2);
        let third = turn(&mut session, "it is five five five", &OPEN, 3);
        assert!(first.text.contains("phone number"));
        assert!(!first.text.contains("rephrase"));
        assert!(second.text.to_lowercase().contains("rephrase it another way?"));
        assert!(third.text.contains("connect you to a staff member"));
        assert_eq!(third.state, ConversationState::CollectPhone);
    }

    #[test]
    fn test_successful_extraction_resets_fallbacks() {
        let mut session = Session::new("t");
        session.state = ConversationState::CollectPhone;
        turn(&mut session, "it is five five five", &OPEN, 1);
        turn(&mut session, "0501234567", &OPEN, 2);
        assert_eq!(session.flags.fallback_count, 0);
    }

    #[test]
    fn test_emotion_is_sticky_and_sets_tone() {
        let mut session = Session::new("t");
        let outcome = turn(&mut session, "I'm really nervous about this", &OPEN, 1);
        assert_eq!(session.flags.emotional_state, Emotion::Anxiety);
        assert_eq!(outcome.tone, VoiceTone::Reassuring);
        let outcome = turn(&mut session, "Layla", &OPEN, 2);
        assert_eq!(session.flags.emotional_state, Emotion::Anxiety);
        assert_eq!(outcome.tone, VoiceTone::Reassuring);
    }

    #[test]
    fn test_confirm_phone_negative_goes_back() {
        let mut session = at_time_stage();
        session.patient_info.preferred_time = Some("monday at 10 AM".to_string());
        session.patient_info.phone = Some("0501234567".to_string());
        session.state = ConversationState::ConfirmPhone;
        let outcome = turn(&mut session, "No", &OPEN, 1);
        assert_eq!(outcome.state, ConversationState::CollectPhone);
        assert!(outcome.appointment.is_none());
    }

    #[test]
    fn test_confirm_without_details_routes_to_missing_stage() {
        let mut session = Session::new("t");
        session.patient_info.name = Some("Sarah Ahmed".to_string());
        session.state = ConversationState::ConfirmPhone;
        let outcome = turn(&mut session, "Yes", &OPEN, 1);
        assert_eq!(outcome.state, ConversationState::CollectService);
        assert!(outcome.appointment.is_none());
    }

    #[test]
    fn test_wrap_up_flow() {
        let mut session = at_time_stage();
        session.state = ConversationState::ConfirmComplete;
        let outcome = turn(&mut session, "Yes please", &OPEN, 1);
        assert_eq!(outcome.state, ConversationState::ProvideInfo);
        assert!(outcome.text.contains("floss"));

        let outcome = turn(&mut session, "My gums bleed a little", &OPEN, 2);
        assert_eq!(outcome.state, ConversationState::EndCall);
        assert_eq!(session.notes.as_deref(), Some("My gums bleed a little"));
    }

    #[test]
    fn test_parking_and_insurance_after_booking() {
        let mut session = at_time_stage();
        session.state = ConversationState::ConfirmComplete;
        let outcome = turn(&mut session, "Is there parking?", &OPEN, 1);
        assert_eq!(outcome.state, ConversationState::ConfirmComplete);
        assert!(outcome.text.contains("I've made a note of your appointment"));

        let outcome = turn(&mut session, "Do you take insurance?", &OPEN, 2);
        assert_eq!(outcome.state, ConversationState::ConfirmComplete);
        assert!(outcome.text.contains("bring your insurance card"));
    }

    #[test]
    fn test_goodbye_when_nothing_else() {
        let mut session = at_time_stage();
        session.state = ConversationState::ConfirmComplete;
        let outcome = turn(&mut session, "Nope, that's all", &OPEN, 1);
        assert_eq!(outcome.state, ConversationState::EndCall);
        assert!(outcome.text.starts_with("Thank you for calling"));
    }

    #[test]
    fn test_after_goodbye_booking_restarts_service_collection() {
        let mut session = Session::new("t");
        session.state = ConversationState::EndCall;
        let outcome = turn(&mut session, "Actually I want to book another appointment", &OPEN, 1);
        assert_eq!(outcome.state, ConversationState::CollectService);
    }

    #[test]
    fn test_greeting_without_name_asks_for_it() {
        let mut session = Session::new("t");
        let outcome = turn(&mut session, "I'd like to book an appointment please", &OPEN, 1);
        assert_eq!(outcome.state, ConversationState::CollectName);
        assert!(outcome.text.contains("name"));
    }
}
