use serde::Serialize;

/// Voice identity and tuning sent with every synthesis call, so every line
/// the interviewer speaks sounds the same.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceProfile {
    pub voice_id: &'static str,
    pub model_id: &'static str,
    pub stability: f32,
    pub similarity_boost: f32,
    pub style: f32,
    pub use_speaker_boost: bool,
}

/// Default interviewer voice ("Rachel").
pub const INTERVIEWER_VOICE: VoiceProfile = VoiceProfile {
    voice_id: "21m00Tcm4TlvDq8ikWAM",
    model_id: "eleven_turbo_v2_5",
    stability: 0.5,
    similarity_boost: 0.75,
    style: 0.0,
    use_speaker_boost: true,
};

/// Body of `POST /v1/text-to-speech/{voice_id}`.
#[derive(Debug, Serialize)]
pub struct SynthesisRequest<'a> {
    pub text: &'a str,
    pub model_id: &'a str,
    pub voice_settings: VoiceSettings,
}

#[derive(Debug, Serialize)]
pub struct VoiceSettings {
    pub stability: f32,
    pub similarity_boost: f32,
    pub style: f32,
    pub use_speaker_boost: bool,
}

impl VoiceProfile {
    pub fn request<'a>(&'a self, text: &'a str) -> SynthesisRequest<'a> {
        SynthesisRequest {
            text,
            model_id: self.model_id,
            voice_settings: VoiceSettings {
                stability: self.stability,
                similarity_boost: self.similarity_boost,
                style: self.style,
                use_speaker_boost: self.use_speaker_boost,
            },
        }
    }
}
