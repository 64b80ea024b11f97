pub mod booking;
pub mod conversation;
pub mod emotion;
pub mod patient;

pub use booking::Appointment;
pub use conversation::{
    ConversationEntry, ConversationState, Role, Session, SessionFlags, Topic,
};
pub use emotion::{Emotion, VoiceTone};
pub use patient::{BookingDetails, PatientInfo, Service};
