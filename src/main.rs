use std::sync::{Arc, Mutex};

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use frontdesk::config::AppConfig;
use frontdesk::handlers;
use frontdesk::services::messaging::twilio::TwilioSmsProvider;
use frontdesk::services::messaging::{LogMessaging, MessagingProvider};
use frontdesk::services::records::webhook::WebhookRecordKeeper;
use frontdesk::services::records::{LogRecordKeeper, RecordKeeper};
use frontdesk::services::sessions::SessionStore;
use frontdesk::services::speech::elevenlabs::ElevenLabsSynthesizer;
use frontdesk::services::speech::whisper::WhisperTranscriber;
use frontdesk::services::speech::{SpeechSynthesizer, Transcriber};
use frontdesk::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let (messaging, records): (Box<dyn MessagingProvider>, Box<dyn RecordKeeper>) =
        if config.use_mock_services {
            tracing::info!("using mock SMS and record services");
            (Box::new(LogMessaging), Box::new(LogRecordKeeper))
        } else {
            anyhow::ensure!(
                !config.twilio_account_sid.is_empty(),
                "TWILIO_ACCOUNT_SID must be set when USE_MOCK_SERVICES=false"
            );
            tracing::info!("using Twilio SMS and webhook record services");
            (
                Box::new(TwilioSmsProvider::new(
                    config.twilio_account_sid.clone(),
                    config.twilio_auth_token.clone(),
                    config.twilio_phone_number.clone(),
                )),
                Box::new(WebhookRecordKeeper::new(
                    config.sheets_webhook_url.clone(),
                    config.calendar_webhook_url.clone(),
                )),
            )
        };

    let speech: Option<Box<dyn SpeechSynthesizer>> =
        if config.use_mock_services || config.elevenlabs_api_key.is_empty() {
            tracing::info!("speech synthesis disabled, replies are text only");
            None
        } else {
            tracing::info!(voice_id = %config.elevenlabs_voice_id, "using ElevenLabs speech synthesis");
            Some(Box::new(ElevenLabsSynthesizer::new(
                config.elevenlabs_api_key.clone(),
                config.elevenlabs_voice_id.clone(),
            )))
        };

    let transcriber: Option<Box<dyn Transcriber>> =
        if config.use_mock_services || config.openai_api_key.is_empty() {
            tracing::info!("audio transcription disabled, transcripts required");
            None
        } else {
            tracing::info!("using Whisper transcription");
            Some(Box::new(WhisperTranscriber::new(config.openai_api_key.clone())))
        };

    tracing::info!(mode = ?config.availability_mode, seeded = config.rng_seed.is_some(), "scheduling");

    let state = Arc::new(AppState {
        sessions: SessionStore::new(config.rng_seed),
        appointments: Mutex::new(Vec::new()),
        slots: config.availability_mode.slot_book(),
        config: config.clone(),
        messaging,
        records,
        speech,
        transcriber,
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/start-call", post(handlers::calls::start_call))
        .route("/api/process-speech", post(handlers::calls::process_speech))
        .route("/api/interrupt", post(handlers::calls::interrupt))
        .route("/api/end-call", post(handlers::calls::end_call))
        .route("/api/get-conversation", get(handlers::calls::get_conversation))
        .route("/api/get-appointments", get(handlers::calls::get_appointments))
        .route("/api/synthesize", post(handlers::calls::synthesize))
        .route(
            "/api/appointments/:id/confirmation",
            post(handlers::calls::resend_confirmation),
        )
        .route("/twilio/voice", post(handlers::voice::incoming_call))
        .route("/twilio/gather", post(handlers::voice::gather_speech))
        .route("/twilio/status", post(handlers::voice::call_status))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
