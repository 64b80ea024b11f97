use anyhow::Context;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use super::Transcriber;

const MODEL: &str = "whisper-1";

/// OpenAI audio transcription.
pub struct WhisperTranscriber {
    api_key: String,
    client: reqwest::Client,
}

impl WhisperTranscriber {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    async fn transcribe(&self, audio: Vec<u8>) -> anyhow::Result<String> {
        let part = Part::bytes(audio)
            .file_name("speech.webm")
            .mime_str("audio/webm")
            .context("invalid audio mime type")?;
        let form = Form::new().text("model", MODEL).part("file", part);

        let resp = self
            .client
            .post("https://api.openai.com/v1/audio/transcriptions")
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .context("failed to call OpenAI transcription API")?;

        let status = resp.status();
        let data: serde_json::Value = resp
            .json()
            .await
            .context("failed to parse transcription response")?;

        if !status.is_success() {
            anyhow::bail!("OpenAI transcription error ({}): {}", status, data);
        }

        data["text"]
            .as_str()
            .map(|s| s.trim().to_string())
            .ok_or_else(|| anyhow::anyhow!("missing text in transcription response"))
    }
}
