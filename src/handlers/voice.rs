use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Form;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::services::conversation;
use crate::state::AppState;

const CALL_ERROR: &str = "I'm sorry, there was an error with your call. Please try again later.";
const SAY_VOICE: &str = "alice";

/// Twilio posts every webhook as a flat form. Kept as pairs so the signature
/// covers exactly what was sent.
type TwilioParams = Vec<(String, String)>;

fn param<'a>(params: &'a TwilioParams, key: &str) -> &'a str {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.trim())
        .unwrap_or("")
}

fn validate_twilio_signature(
    auth_token: &str,
    signature: &str,
    url: &str,
    params: &[(&str, &str)],
) -> bool {
    // URL followed by every key and value, keys sorted
    let mut data = url.to_string();
    let mut sorted_params = params.to_vec();
    sorted_params.sort_by(|a, b| a.0.cmp(b.0));
    for (key, value) in &sorted_params {
        data.push_str(key);
        data.push_str(value);
    }

    let mut mac = match Hmac::<Sha1>::new_from_slice(auth_token.as_bytes()) {
        Ok(m) => m,
        Err(_) => return false,
    };
    mac.update(data.as_bytes());
    let expected = base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes());

    expected == signature
}

/// Rejects the request unless it carries a valid `X-Twilio-Signature`.
/// Nothing is checked when no auth token is configured.
#[allow(clippy::result_large_err)]
fn verify_request(
    state: &AppState,
    headers: &HeaderMap,
    path: &str,
    params: &TwilioParams,
) -> Result<(), Response> {
    if state.config.twilio_auth_token.is_empty() {
        return Ok(());
    }

    let signature = headers
        .get("x-twilio-signature")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if signature.is_empty() {
        tracing::warn!(path, "missing X-Twilio-Signature header");
        return Err((StatusCode::FORBIDDEN, "Missing signature").into_response());
    }

    // Behind a proxy the public URL comes from the forwarded headers
    let proto = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("https");
    let host = headers
        .get("x-forwarded-host")
        .or_else(|| headers.get("host"))
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    let url = format!("{proto}://{host}{path}");

    let pairs: Vec<(&str, &str)> = params
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    if !validate_twilio_signature(&state.config.twilio_auth_token, signature, &url, &pairs) {
        tracing::warn!(path, "invalid Twilio signature");
        return Err((StatusCode::FORBIDDEN, "Invalid signature").into_response());
    }
    Ok(())
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn say(text: &str) -> String {
    format!(r#"<Say voice="{SAY_VOICE}">{}</Say>"#, escape_xml(text))
}

fn gather() -> &'static str {
    r#"<Gather input="speech" action="/twilio/gather" method="POST" speechTimeout="auto" language="en-US"/>"#
}

/// Speak, then listen for the next utterance.
pub fn say_and_gather(text: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><Response>{}{}</Response>"#,
        say(text),
        gather()
    )
}

/// Speak, pause, hang up.
pub fn say_and_hangup(text: &str, pause: bool) -> String {
    let pause = if pause { r#"<Pause length="1"/>"# } else { "" };
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><Response>{}{pause}<Hangup/></Response>"#,
        say(text)
    )
}

fn twiml_response(body: String) -> Response {
    ([(header::CONTENT_TYPE, "application/xml")], body).into_response()
}

// POST /twilio/voice
pub async fn incoming_call(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(params): Form<TwilioParams>,
) -> Response {
    if let Err(rejection) = verify_request(&state, &headers, "/twilio/voice", &params) {
        return rejection;
    }

    let call_sid = param(&params, "CallSid");
    if call_sid.is_empty() {
        tracing::warn!("voice webhook without CallSid");
        return twiml_response(say_and_hangup(CALL_ERROR, false));
    }

    tracing::info!(call_sid, from = param(&params, "From"), "incoming call");
    let greeting = conversation::open_session(&state, call_sid).await;
    twiml_response(say_and_gather(&greeting))
}

// POST /twilio/gather
pub async fn gather_speech(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(params): Form<TwilioParams>,
) -> Response {
    if let Err(rejection) = verify_request(&state, &headers, "/twilio/gather", &params) {
        return rejection;
    }

    let call_sid = param(&params, "CallSid");
    if state.sessions.get(call_sid).is_none() {
        tracing::error!(call_sid, "no session for call");
        return twiml_response(say_and_hangup(CALL_ERROR, false));
    }

    let speech = param(&params, "SpeechResult");
    if speech.is_empty() {
        return twiml_response(say_and_gather(conversation::MISSED_AUDIO));
    }

    tracing::info!(call_sid, speech, "speech input");
    match conversation::run_turn(&state, call_sid, speech, false).await {
        Ok(outcome) if outcome.state.is_terminal() => {
            twiml_response(say_and_hangup(&outcome.text, true))
        }
        Ok(outcome) => twiml_response(say_and_gather(&outcome.text)),
        Err(e) => {
            tracing::error!(error = %e, call_sid, "turn failed");
            twiml_response(say_and_hangup(CALL_ERROR, false))
        }
    }
}

// POST /twilio/status
pub async fn call_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(params): Form<TwilioParams>,
) -> Response {
    if let Err(rejection) = verify_request(&state, &headers, "/twilio/status", &params) {
        return rejection;
    }

    let call_sid = param(&params, "CallSid");
    let status = param(&params, "CallStatus");
    tracing::info!(call_sid, status, "call status");

    if matches!(status, "completed" | "busy" | "failed" | "no-answer" | "canceled")
        && state.sessions.remove(call_sid).is_some()
    {
        tracing::info!(call_sid, "session closed");
    }

    twiml_response("<Response></Response>".to_string())
}
