use std::sync::Arc;

use crate::models::Appointment;
use crate::services::dialogue::clinic;
use crate::services::dialogue::extract::uae_e164;
use crate::state::AppState;

pub fn confirmation_message(appointment: &Appointment) -> String {
    format!(
        "Hello {}, your {} appointment at {} is confirmed for {}. Please arrive 15 minutes early. Call {} if you need to reschedule.",
        appointment.patient_name,
        appointment.service.label(),
        clinic::CLINIC_NAME,
        appointment.scheduled_time,
        clinic::CLINIC_PHONE
    )
}

/// Stores the booking, then copies it out to the sheet, the calendar and the
/// patient's phone. Collaborator failures are logged; the booking stands.
pub async fn record_appointment(state: &Arc<AppState>, appointment: Appointment) {
    {
        let mut appointments = state
            .appointments
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        appointments.push(appointment.clone());
    }

    tracing::info!(
        appointment_id = %appointment.id,
        patient = %appointment.patient_name,
        service = appointment.service.as_str(),
        time = %appointment.scheduled_time,
        "appointment recorded"
    );

    if let Err(e) = state.records.log_appointment(&appointment).await {
        tracing::warn!(error = %e, appointment_id = %appointment.id, "failed to log appointment");
    }

    match state.records.create_calendar_event(&appointment).await {
        Ok(event_id) => tracing::info!(appointment_id = %appointment.id, event_id = %event_id, "calendar event created"),
        Err(e) => tracing::warn!(error = %e, appointment_id = %appointment.id, "failed to create calendar event"),
    }

    match send_confirmation(state, &appointment).await {
        Ok(delivery_id) => tracing::info!(appointment_id = %appointment.id, delivery_id = %delivery_id, "confirmation SMS sent"),
        Err(e) => tracing::warn!(error = %e, appointment_id = %appointment.id, "failed to send confirmation SMS"),
    }
}

/// Texts the confirmation to the patient. Returns the delivery id.
pub async fn send_confirmation(state: &AppState, appointment: &Appointment) -> anyhow::Result<String> {
    let to = uae_e164(&appointment.phone_number);
    state
        .messaging
        .send_message(&to, &confirmation_message(appointment))
        .await
}

pub fn find_appointment(state: &AppState, id: &str) -> Option<Appointment> {
    state
        .appointments
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .iter()
        .find(|a| a.id == id)
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookingDetails, Service};

    #[test]
    fn test_confirmation_message() {
        let appointment = Appointment::new(
            BookingDetails {
                name: "Sarah Ahmed".to_string(),
                service: Service::Ent,
                time: "monday at 10 AM".to_string(),
                phone: "0501234567".to_string(),
            },
            None,
        );
        assert_eq!(
            confirmation_message(&appointment),
            "Hello Sarah Ahmed, your ENT appointment at Noor Medical Clinic is confirmed for monday at 10 AM. Please arrive 15 minutes early. Call 555-123-4567 if you need to reschedule."
        );
    }
}
