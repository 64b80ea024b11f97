use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Pain,
    Anxiety,
    Urgency,
    Confusion,
    Frustration,
    #[default]
    Neutral,
}

impl Emotion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Pain => "pain",
            Emotion::Anxiety => "anxiety",
            Emotion::Urgency => "urgency",
            Emotion::Confusion => "confusion",
            Emotion::Frustration => "frustration",
            Emotion::Neutral => "neutral",
        }
    }

    /// Voice used for a regular state-machine reply while the caller feels this way.
    pub fn reply_tone(&self) -> VoiceTone {
        match self {
            Emotion::Anxiety => VoiceTone::Reassuring,
            Emotion::Urgency => VoiceTone::Efficient,
            Emotion::Frustration => VoiceTone::Apologetic,
            _ => VoiceTone::Friendly,
        }
    }
}

/// Emotion tag handed to the speech synthesizer with the finished text.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VoiceTone {
    #[default]
    Neutral,
    Friendly,
    Professional,
    Reassuring,
    Apologetic,
    Confident,
    Informative,
    Attentive,
    Efficient,
    Amused,
    Happy,
}

impl VoiceTone {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoiceTone::Neutral => "neutral",
            VoiceTone::Friendly => "friendly",
            VoiceTone::Professional => "professional",
            VoiceTone::Reassuring => "reassuring",
            VoiceTone::Apologetic => "apologetic",
            VoiceTone::Confident => "confident",
            VoiceTone::Informative => "informative",
            VoiceTone::Attentive => "attentive",
            VoiceTone::Efficient => "efficient",
            VoiceTone::Amused => "amused",
            VoiceTone::Happy => "happy",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_tone_mapping() {
        assert_eq!(Emotion::Anxiety.reply_tone(), VoiceTone::Reassuring);
        assert_eq!(Emotion::Urgency.reply_tone(), VoiceTone::Efficient);
        assert_eq!(Emotion::Frustration.reply_tone(), VoiceTone::Apologetic);
        assert_eq!(Emotion::Pain.reply_tone(), VoiceTone::Friendly);
        assert_eq!(Emotion::Neutral.reply_tone(), VoiceTone::Friendly);
    }
}
