use std::sync::Arc;

use base64::Engine;
use serde::Serialize;

use crate::errors::AppError;
use crate::models::{ConversationState, Session, VoiceTone};
use crate::services::booking;
use crate::services::dialogue::{self, TurnOutcome};
use crate::state::AppState;

pub const MISSED_AUDIO: &str = "I'm sorry, I didn't catch that. Could you please say it again?";

#[derive(Debug, Serialize)]
pub struct CallStart {
    pub session_id: String,
    pub text: String,
    pub next_state: ConversationState,
    pub audio: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SpeechReply {
    pub text: String,
    pub state: ConversationState,
    pub tone: VoiceTone,
    pub audio: Option<String>,
}

/// Opens a session under `session_id` and returns the spoken greeting.
pub async fn start_call(state: &Arc<AppState>, session_id: &str) -> CallStart {
    let text = open_session(state, session_id).await;
    let audio = synthesize_audio(state, &text, VoiceTone::Friendly).await;
    CallStart {
        session_id: session_id.to_string(),
        text,
        next_state: ConversationState::Greeting,
        audio,
    }
}

/// Creates the session and records its greeting without voicing it.
pub async fn open_session(state: &AppState, session_id: &str) -> String {
    let handle = state.sessions.create(session_id);
    let mut entry = handle.lock().await;
    let text = dialogue::greeting_text(&mut entry.rng);
    entry.session.push_system(&text);
    tracing::info!(session_id, "call started");
    text
}

/// Runs one turn and voices the reply.
pub async fn process_speech(
    state: &Arc<AppState>,
    session_id: &str,
    transcript: &str,
    interrupted: bool,
) -> Result<SpeechReply, AppError> {
    let outcome = run_turn(state, session_id, transcript, interrupted).await?;
    let audio = synthesize_audio(state, &outcome.text, outcome.tone).await;
    Ok(SpeechReply {
        text: outcome.text,
        state: outcome.state,
        tone: outcome.tone,
        audio,
    })
}

/// One turn without audio. The session stays locked from the user entry to
/// the system entry; the booking is recorded after the lock is released.
pub async fn run_turn(
    state: &Arc<AppState>,
    session_id: &str,
    transcript: &str,
    interrupted: bool,
) -> Result<TurnOutcome, AppError> {
    let handle = state
        .sessions
        .get(session_id)
        .ok_or(AppError::InvalidSession)?;

    let mut outcome = {
        let mut guard = handle.lock().await;
        let entry = &mut *guard;
        if interrupted {
            entry.session.mark_interrupted();
        }
        entry.session.push_user(transcript, interrupted);

        let previous = entry.session.state;
        let outcome = dialogue::process_turn(
            &mut entry.session,
            transcript,
            state.slots.as_ref(),
            &mut entry.rng,
        );
        entry.session.push_system(&outcome.text);

        tracing::info!(
            session_id,
            from = previous.as_str(),
            to = outcome.state.as_str(),
            "turn processed"
        );
        outcome
    };

    if let Some(appointment) = outcome.appointment.take() {
        booking::record_appointment(state, appointment).await;
    }

    Ok(outcome)
}

/// Audio arrived but could not be turned into text. The session is left as it was.
pub async fn missed_audio(state: &Arc<AppState>, session_id: &str) -> Result<SpeechReply, AppError> {
    let handle = state
        .sessions
        .get(session_id)
        .ok_or(AppError::InvalidSession)?;
    let current = handle.lock().await.session.state;
    let audio = synthesize_audio(state, MISSED_AUDIO, VoiceTone::Apologetic).await;
    Ok(SpeechReply {
        text: MISSED_AUDIO.to_string(),
        state: current,
        tone: VoiceTone::Apologetic,
        audio,
    })
}

/// Decodes base64 audio and transcribes it. `None` when no transcript could be had.
pub async fn transcribe_audio(state: &Arc<AppState>, audio: &str) -> Result<Option<String>, AppError> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(audio.trim())
        .map_err(|e| AppError::BadRequest(format!("audio is not valid base64: {e}")))?;

    let Some(transcriber) = state.transcriber.as_ref() else {
        tracing::warn!("audio received but no transcriber is configured");
        return Ok(None);
    };

    match transcriber.transcribe(bytes).await {
        Ok(text) if !text.trim().is_empty() => Ok(Some(text.trim().to_string())),
        Ok(_) => Ok(None),
        Err(e) => {
            tracing::warn!(error = %e, "transcription failed");
            Ok(None)
        }
    }
}

/// Records a barge-in reported outside of a speech request.
pub async fn register_interruption(state: &Arc<AppState>, session_id: &str) -> Result<(), AppError> {
    let handle = state
        .sessions
        .get(session_id)
        .ok_or(AppError::InvalidSession)?;
    let mut entry = handle.lock().await;
    entry.session.mark_interrupted();
    tracing::info!(
        session_id,
        count = entry.session.flags.interruption_count,
        "interruption registered"
    );
    Ok(())
}

pub fn end_call(state: &AppState, session_id: &str) -> Result<(), AppError> {
    state
        .sessions
        .remove(session_id)
        .ok_or(AppError::InvalidSession)?;
    tracing::info!(session_id, "call ended");
    Ok(())
}

pub async fn snapshot(state: &AppState, session_id: &str) -> Result<Session, AppError> {
    let handle = state
        .sessions
        .get(session_id)
        .ok_or(AppError::InvalidSession)?;
    let entry = handle.lock().await;
    Ok(entry.session.clone())
}

/// Base64 audio for `text`, or `None` when there is no synthesizer or it failed.
pub async fn synthesize_audio(state: &AppState, text: &str, tone: VoiceTone) -> Option<String> {
    let synthesizer = state.speech.as_ref()?;
    match synthesizer.synthesize(text, tone).await {
        Ok(bytes) => Some(base64::engine::general_purpose::STANDARD.encode(bytes)),
        Err(e) => {
            tracing::warn!(error = %e, tone = tone.as_str(), "speech synthesis failed");
            None
        }
    }
}
