pub mod twilio;

use async_trait::async_trait;

#[async_trait]
pub trait MessagingProvider: Send + Sync {
    /// Sends an SMS and returns the provider's delivery id.
    async fn send_message(&self, to: &str, body: &str) -> anyhow::Result<String>;
}

/// Logs instead of sending. Used when mock services are enabled.
pub struct LogMessaging;

#[async_trait]
impl MessagingProvider for LogMessaging {
    async fn send_message(&self, to: &str, body: &str) -> anyhow::Result<String> {
        let id = format!("mock-{}", uuid::Uuid::new_v4());
        tracing::info!(to, body, delivery_id = %id, "mock SMS sent");
        Ok(id)
    }
}
