use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{Appointment, ConversationEntry, ConversationState, PatientInfo, VoiceTone};
use crate::services::booking;
use crate::services::conversation::{self, CallStart, SpeechReply};
use crate::state::AppState;

// POST /api/start-call
pub async fn start_call(State(state): State<Arc<AppState>>) -> Json<CallStart> {
    let session_id = uuid::Uuid::new_v4().to_string();
    Json(conversation::start_call(&state, &session_id).await)
}

// POST /api/process-speech
#[derive(Deserialize)]
pub struct SpeechRequest {
    pub session_id: String,
    pub transcript: Option<String>,
    /// Base64 recording, used when no transcript is given.
    pub audio: Option<String>,
    #[serde(default)]
    pub interrupted: bool,
}

pub async fn process_speech(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SpeechRequest>,
) -> Result<Json<SpeechReply>, AppError> {
    if state.sessions.get(&payload.session_id).is_none() {
        return Err(AppError::InvalidSession);
    }

    let transcript = match (payload.transcript, payload.audio) {
        (Some(text), _) if !text.trim().is_empty() => text.trim().to_string(),
        (_, Some(audio)) if !audio.trim().is_empty() => {
            match conversation::transcribe_audio(&state, &audio).await? {
                Some(text) => text,
                None => {
                    return conversation::missed_audio(&state, &payload.session_id)
                        .await
                        .map(Json)
                }
            }
        }
        _ => {
            return Err(AppError::BadRequest(
                "transcript or audio is required".to_string(),
            ))
        }
    };

    let reply = conversation::process_speech(
        &state,
        &payload.session_id,
        &transcript,
        payload.interrupted,
    )
    .await?;
    Ok(Json(reply))
}

#[derive(Deserialize)]
pub struct SessionRequest {
    pub session_id: String,
}

#[derive(Serialize)]
pub struct StatusResponse {
    status: &'static str,
    message: &'static str,
}

// POST /api/interrupt
pub async fn interrupt(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SessionRequest>,
) -> Result<Json<StatusResponse>, AppError> {
    conversation::register_interruption(&state, &payload.session_id).await?;
    Ok(Json(StatusResponse {
        status: "ok",
        message: "Interruption registered",
    }))
}

// POST /api/end-call
pub async fn end_call(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SessionRequest>,
) -> Result<Json<StatusResponse>, AppError> {
    conversation::end_call(&state, &payload.session_id)?;
    Ok(Json(StatusResponse {
        status: "ok",
        message: "Call ended",
    }))
}

// GET /api/get-conversation?session_id=
#[derive(Serialize)]
pub struct ConversationResponse {
    conversation: Vec<ConversationEntry>,
    patient_info: PatientInfo,
    state: ConversationState,
    notes: Option<String>,
}

pub async fn get_conversation(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SessionRequest>,
) -> Result<Json<ConversationResponse>, AppError> {
    let session = conversation::snapshot(&state, &params.session_id).await?;
    Ok(Json(ConversationResponse {
        conversation: session.conversation,
        patient_info: session.patient_info,
        state: session.state,
        notes: session.notes,
    }))
}

// GET /api/get-appointments
#[derive(Serialize)]
pub struct AppointmentsResponse {
    appointments: Vec<Appointment>,
}

pub async fn get_appointments(State(state): State<Arc<AppState>>) -> Json<AppointmentsResponse> {
    let appointments = state
        .appointments
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .clone();
    Json(AppointmentsResponse { appointments })
}

// POST /api/synthesize
#[derive(Deserialize)]
pub struct SynthesizeRequest {
    pub text: String,
    #[serde(default)]
    pub tone: VoiceTone,
}

#[derive(Serialize)]
pub struct SynthesizeResponse {
    audio: String,
}

pub async fn synthesize(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SynthesizeRequest>,
) -> Result<Json<SynthesizeResponse>, AppError> {
    if payload.text.trim().is_empty() {
        return Err(AppError::BadRequest("text is required".to_string()));
    }
    let synthesizer = state
        .speech
        .as_ref()
        .ok_or_else(|| AppError::BadRequest("speech synthesis is not configured".to_string()))?;

    let bytes = synthesizer
        .synthesize(&payload.text, payload.tone)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "speech synthesis failed");
            AppError::Speech(e.to_string())
        })?;

    Ok(Json(SynthesizeResponse {
        audio: base64::engine::general_purpose::STANDARD.encode(bytes),
    }))
}

// POST /api/appointments/:id/confirmation
#[derive(Serialize)]
pub struct ConfirmationResponse {
    delivery_id: String,
}

pub async fn resend_confirmation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ConfirmationResponse>, AppError> {
    let appointment = booking::find_appointment(&state, &id)
        .ok_or_else(|| AppError::BadRequest(format!("no appointment with id {id}")))?;

    let delivery_id = booking::send_confirmation(&state, &appointment)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, appointment_id = %id, "confirmation SMS failed");
            AppError::Messaging(e.to_string())
        })?;

    tracing::info!(appointment_id = %id, delivery_id = %delivery_id, "confirmation re-sent");
    Ok(Json(ConfirmationResponse { delivery_id }))
}
