use std::env;

use crate::services::scheduling::AvailabilityMode;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    /// Log-only collaborators instead of the real APIs.
    pub use_mock_services: bool,
    /// Fixed seed for every session's random source.
    pub rng_seed: Option<u64>,
    pub availability_mode: AvailabilityMode,
    pub twilio_account_sid: String,
    pub twilio_auth_token: String,
    pub twilio_phone_number: String,
    pub elevenlabs_api_key: String,
    pub elevenlabs_voice_id: String,
    pub openai_api_key: String,
    pub sheets_webhook_url: String,
    pub calendar_webhook_url: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            use_mock_services: env::var("USE_MOCK_SERVICES")
                .map(|v| parse_flag(&v))
                .unwrap_or(true),
            rng_seed: env::var("RNG_SEED").ok().and_then(|v| v.trim().parse().ok()),
            availability_mode: env::var("AVAILABILITY_MODE")
                .ok()
                .and_then(|v| match v.parse() {
                    Ok(mode) => Some(mode),
                    Err(e) => {
                        tracing::warn!(error = %e, "ignoring AVAILABILITY_MODE");
                        None
                    }
                })
                .unwrap_or(AvailabilityMode::Random),
            twilio_account_sid: env::var("TWILIO_ACCOUNT_SID").unwrap_or_default(),
            twilio_auth_token: env::var("TWILIO_AUTH_TOKEN").unwrap_or_default(),
            twilio_phone_number: env::var("TWILIO_PHONE_NUMBER").unwrap_or_default(),
            elevenlabs_api_key: env::var("ELEVENLABS_API_KEY").unwrap_or_default(),
            elevenlabs_voice_id: env::var("ELEVENLABS_VOICE_ID").unwrap_or_default(),
            openai_api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
            sheets_webhook_url: env::var("SHEETS_WEBHOOK_URL").unwrap_or_default(),
            calendar_webhook_url: env::var("CALENDAR_WEBHOOK_URL").unwrap_or_default(),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
