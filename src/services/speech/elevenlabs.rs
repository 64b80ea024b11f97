use std::sync::LazyLock;

use anyhow::Context;
use async_trait::async_trait;
use regex::Regex;
use serde_json::json;

use super::SpeechSynthesizer;
use crate::models::VoiceTone;

const MODEL_ID: &str = "eleven_monolingual_v1";

pub struct ElevenLabsSynthesizer {
    api_key: String,
    voice_id: String,
    client: reqwest::Client,
}

impl ElevenLabsSynthesizer {
    pub fn new(api_key: String, voice_id: String) -> Self {
        Self {
            api_key,
            voice_id,
            client: reqwest::Client::new(),
        }
    }
}

/// (stability, similarity_boost) per tone.
pub fn voice_settings(tone: VoiceTone) -> (f32, f32) {
    match tone {
        VoiceTone::Neutral => (0.5, 0.5),
        VoiceTone::Friendly => (0.4, 0.7),
        VoiceTone::Professional => (0.6, 0.4),
        VoiceTone::Reassuring => (0.3, 0.8),
        VoiceTone::Apologetic => (0.3, 0.7),
        VoiceTone::Confident => (0.7, 0.6),
        VoiceTone::Informative => (0.6, 0.5),
        VoiceTone::Attentive => (0.4, 0.6),
        VoiceTone::Efficient => (0.7, 0.4),
        VoiceTone::Amused => (0.3, 0.8),
        VoiceTone::Happy => (0.4, 0.8),
    }
}

static SPOKEN_FILLER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(um|uh|hmm|well|let me think|let me check)\b")
        .expect("filler pattern must compile")
});
static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.?!]").expect("punctuation pattern must compile"));

/// Break markup around fillers and after punctuation.
pub fn with_pauses(text: &str) -> String {
    let text = SPOKEN_FILLER.replace_all(text, r#"<break time="500ms"/>$1<break time="300ms"/>"#);
    let text = SENTENCE_END.replace_all(&text, r#"$0<break time="500ms"/>"#);
    text.replace(',', r#",<break time="300ms"/>"#)
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsSynthesizer {
    async fn synthesize(&self, text: &str, tone: VoiceTone) -> anyhow::Result<Vec<u8>> {
        let (stability, similarity_boost) = voice_settings(tone);
        let body = json!({
            "text": with_pauses(text),
            "model_id": MODEL_ID,
            "voice_settings": {
                "stability": stability,
                "similarity_boost": similarity_boost,
            },
        });

        let resp = self
            .client
            .post(format!(
                "https://api.elevenlabs.io/v1/text-to-speech/{}",
                self.voice_id
            ))
            .header("xi-api-key", &self.api_key)
            .header(reqwest::header::ACCEPT, "audio/mpeg")
            .json(&body)
            .send()
            .await
            .context("failed to call ElevenLabs API")?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            anyhow::bail!("ElevenLabs API error ({status}): {detail}");
        }

        let audio = resp
            .bytes()
            .await
            .context("failed to read ElevenLabs audio")?;
        Ok(audio.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_pauses_marks_fillers_and_punctuation() {
        let marked = with_pauses("Well, see you soon.");
        assert_eq!(
            marked,
            r#"<break time="500ms"/>Well<break time="300ms"/>,<break time="300ms"/> see you soon.<break time="500ms"/>"#
        );
    }

    #[test]
    fn test_with_pauses_leaves_words_containing_fillers() {
        let marked = with_pauses("Drink plenty of water");
        assert_eq!(marked, "Drink plenty of water");
        assert!(!with_pauses("Humid today").contains("break"));
    }

    #[test]
    fn test_voice_settings() {
        assert_eq!(voice_settings(VoiceTone::Reassuring), (0.3, 0.8));
        assert_eq!(voice_settings(VoiceTone::Efficient), (0.7, 0.4));
    }
}
