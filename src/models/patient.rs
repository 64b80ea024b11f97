use serde::{Deserialize, Serialize};

use super::conversation::ConversationState;

/// Clinic departments. Declaration order is also keyword lookup order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    Dental,
    Ent,
    Dermatology,
    General,
}

impl Service {
    pub const ALL: [Service; 4] = [
        Service::Dental,
        Service::Ent,
        Service::Dermatology,
        Service::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Dental => "dental",
            Service::Ent => "ent",
            Service::Dermatology => "dermatology",
            Service::General => "general",
        }
    }

    /// Spoken form, e.g. "ENT" rather than "ent".
    pub fn label(&self) -> &'static str {
        match self {
            Service::Ent => "ENT",
            other => other.as_str(),
        }
    }
}

impl std::fmt::Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PatientInfo {
    pub name: Option<String>,
    pub service: Option<Service>,
    pub preferred_time: Option<String>,
    pub phone: Option<String>,
    /// Last alternative offered; overwritten on every re-suggestion.
    pub alternative_time: Option<String>,
}

/// The four fields an appointment cannot be recorded without.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingDetails {
    pub name: String,
    pub service: Service,
    pub time: String,
    pub phone: String,
}

impl PatientInfo {
    /// Department used for doctor and slot lookups; general when nothing was said yet.
    pub fn service_category(&self) -> Service {
        self.service.unwrap_or(Service::General)
    }

    pub fn booking_details(&self) -> Option<BookingDetails> {
        Some(BookingDetails {
            name: self.name.clone()?,
            service: self.service?,
            time: self.preferred_time.clone()?,
            phone: self.phone.clone()?,
        })
    }

    /// The collection stage for the first field still missing.
    pub fn first_missing_stage(&self) -> Option<ConversationState> {
        if self.name.is_none() {
            Some(ConversationState::CollectName)
        } else if self.service.is_none() {
            Some(ConversationState::CollectService)
        } else if self.preferred_time.is_none() {
            Some(ConversationState::CollectTime)
        } else if self.phone.is_none() {
            Some(ConversationState::CollectPhone)
        } else {
            None
        }
    }
}
