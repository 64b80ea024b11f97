use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::patient::{BookingDetails, Service};

/// A finalized booking. Created once when the caller confirms their phone number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    pub id: String,
    pub patient_name: String,
    pub service: Service,
    pub scheduled_time: String,
    pub phone_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor: Option<String>,
    pub timestamp: NaiveDateTime,
}

impl Appointment {
    pub fn new(details: BookingDetails, doctor: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            patient_name: details.name,
            service: details.service,
            scheduled_time: details.time,
            phone_number: details.phone,
            doctor,
            timestamp: chrono::Utc::now().naive_utc(),
        }
    }
}
