pub mod webhook;

use async_trait::async_trait;

use crate::models::Appointment;

/// Where finished bookings are copied to: a spreadsheet log and a calendar.
#[async_trait]
pub trait RecordKeeper: Send + Sync {
    async fn log_appointment(&self, appointment: &Appointment) -> anyhow::Result<()>;

    /// Returns the calendar event id.
    async fn create_calendar_event(&self, appointment: &Appointment) -> anyhow::Result<String>;
}

/// Logs instead of calling out. Used when mock services are enabled.
pub struct LogRecordKeeper;

#[async_trait]
impl RecordKeeper for LogRecordKeeper {
    async fn log_appointment(&self, appointment: &Appointment) -> anyhow::Result<()> {
        tracing::info!(
            appointment_id = %appointment.id,
            patient = %appointment.patient_name,
            service = appointment.service.as_str(),
            time = %appointment.scheduled_time,
            "mock: appointment logged to sheet"
        );
        Ok(())
    }

    async fn create_calendar_event(&self, appointment: &Appointment) -> anyhow::Result<String> {
        let event_id = format!("mock-event-{}", appointment.id);
        tracing::info!(appointment_id = %appointment.id, event_id = %event_id, "mock: calendar event created");
        Ok(event_id)
    }
}
