use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::emotion::Emotion;
use super::patient::PatientInfo;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    Greeting,
    CollectName,
    CollectService,
    CollectTime,
    ConfirmAlternativeTime,
    CollectPhone,
    ConfirmPhone,
    ConfirmComplete,
    ProvideInfo,
    EndCall,
}

impl ConversationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationState::Greeting => "greeting",
            ConversationState::CollectName => "collect_name",
            ConversationState::CollectService => "collect_service",
            ConversationState::CollectTime => "collect_time",
            ConversationState::ConfirmAlternativeTime => "confirm_alternative_time",
            ConversationState::CollectPhone => "collect_phone",
            ConversationState::ConfirmPhone => "confirm_phone",
            ConversationState::ConfirmComplete => "confirm_complete",
            ConversationState::ProvideInfo => "provide_info",
            ConversationState::EndCall => "end_call",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ConversationState::EndCall)
    }
}

impl std::fmt::Display for ConversationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    System,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub role: Role,
    pub text: String,
    pub timestamp: NaiveDateTime,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub interrupted: bool,
}

/// What the last reply was about. Used by the follow-up heuristics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    DoctorInfo,
    ClinicInfo,
    SmallTalk,
    Listening,
    Appointment,
}

/// Per-call bookkeeping that never reaches the appointment record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionFlags {
    pub interruption_count: u32,
    /// A barge-in is waiting to be acknowledged on the next turn.
    pub was_interrupted: bool,
    pub small_talk_count: u32,
    pub fallback_count: u32,
    pub last_topic: Option<Topic>,
    pub emotional_state: Emotion,
    pub current_doctor: Option<String>,
    pub rejected_doctors: BTreeSet<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub state: ConversationState,
    pub patient_info: PatientInfo,
    pub conversation: Vec<ConversationEntry>,
    pub flags: SessionFlags,
    /// Free-form note captured in `provide_info`.
    pub notes: Option<String>,
    pub started_at: NaiveDateTime,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            state: ConversationState::Greeting,
            patient_info: PatientInfo::default(),
            conversation: Vec::new(),
            flags: SessionFlags::default(),
            notes: None,
            started_at: chrono::Utc::now().naive_utc(),
        }
    }

    pub fn push_user(&mut self, text: &str, interrupted: bool) {
        self.conversation.push(ConversationEntry {
            role: Role::User,
            text: text.to_string(),
            timestamp: chrono::Utc::now().naive_utc(),
            interrupted,
        });
    }

    pub fn push_system(&mut self, text: &str) {
        self.conversation.push(ConversationEntry {
            role: Role::System,
            text: text.to_string(),
            timestamp: chrono::Utc::now().naive_utc(),
            interrupted: false,
        });
    }

    pub fn mark_interrupted(&mut self) {
        self.flags.interruption_count += 1;
        self.flags.was_interrupted = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_end_call_is_terminal() {
        assert!(ConversationState::EndCall.is_terminal());
        assert!(!ConversationState::ConfirmComplete.is_terminal());
        assert!(!ConversationState::ProvideInfo.is_terminal());
    }

    #[test]
    fn test_state_serializes_snake_case() {
        let json = serde_json::to_string(&ConversationState::ConfirmAlternativeTime).unwrap();
        assert_eq!(json, "\"confirm_alternative_time\"");
    }

    #[test]
    fn test_new_session_starts_in_greeting() {
        let session = Session::new("abc");
        assert_eq!(session.state, ConversationState::Greeting);
        assert!(session.conversation.is_empty());
        assert_eq!(session.flags.interruption_count, 0);
    }

    #[test]
    fn test_mark_interrupted_counts_and_queues() {
        let mut session = Session::new("abc");
        session.mark_interrupted();
        session.mark_interrupted();
        assert_eq!(session.flags.interruption_count, 2);
        assert!(session.flags.was_interrupted);
    }
}
