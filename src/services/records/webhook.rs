use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;

use super::RecordKeeper;
use crate::models::Appointment;

/// Posts appointments as JSON to a sheet webhook and a calendar webhook.
/// An empty URL disables that half.
pub struct WebhookRecordKeeper {
    sheets_url: String,
    calendar_url: String,
    client: reqwest::Client,
}

impl WebhookRecordKeeper {
    pub fn new(sheets_url: String, calendar_url: String) -> Self {
        Self {
            sheets_url,
            calendar_url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl RecordKeeper for WebhookRecordKeeper {
    async fn log_appointment(&self, appointment: &Appointment) -> anyhow::Result<()> {
        if self.sheets_url.is_empty() {
            tracing::debug!("sheet webhook not configured, skipping");
            return Ok(());
        }

        self.client
            .post(&self.sheets_url)
            .json(appointment)
            .send()
            .await
            .context("failed to call sheet webhook")?
            .error_for_status()
            .context("sheet webhook returned error")?;

        Ok(())
    }

    async fn create_calendar_event(&self, appointment: &Appointment) -> anyhow::Result<String> {
        if self.calendar_url.is_empty() {
            tracing::debug!("calendar webhook not configured, skipping");
            return Ok(appointment.id.clone());
        }

        let mut summary = format!("{} appointment: {}", appointment.service.label(), appointment.patient_name);
        if let Some(doctor) = &appointment.doctor {
            summary.push_str(&format!(" with {doctor}"));
        }
        let body = json!({
            "summary": summary,
            "when": appointment.scheduled_time,
            "phone": appointment.phone_number,
            "appointment_id": appointment.id,
        });

        let data: serde_json::Value = self
            .client
            .post(&self.calendar_url)
            .json(&body)
            .send()
            .await
            .context("failed to call calendar webhook")?
            .error_for_status()
            .context("calendar webhook returned error")?
            .json()
            .await
            .context("failed to parse calendar webhook response")?;

        Ok(data["id"]
            .as_str()
            .map(|s| s.to_string())
            .unwrap_or_else(|| appointment.id.clone()))
    }
}
