pub mod elevenlabs;
pub mod whisper;

use async_trait::async_trait;

use crate::models::VoiceTone;

/// Text to audio. Returns encoded audio bytes (mp3).
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, tone: VoiceTone) -> anyhow::Result<Vec<u8>>;
}

/// Audio to text.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio: Vec<u8>) -> anyhow::Result<String>;
}
