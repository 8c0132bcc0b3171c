//! Text → speech through ElevenLabs.

use std::time::{Duration, Instant};

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;
use crate::media::voice::{VoiceProfile, INTERVIEWER_VOICE};
use crate::proxy::deadline::{with_deadline, DeadlineElapsed};
use crate::state::AppState;

pub const SPEECH_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub voice_id: Option<String>,
}

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("Text is required")]
    MissingText,

    #[error("ElevenLabs API key not configured")]
    MissingApiKey,

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Failed to generate speech")]
    Upstream { status: u16 },

    #[error("Request timeout")]
    Timeout(Duration),

    #[error("Failed to generate speech")]
    Transport(#[from] reqwest::Error),
}

impl From<DeadlineElapsed> for SpeechError {
    fn from(e: DeadlineElapsed) -> Self {
        SpeechError::Timeout(e.0)
    }
}

impl SpeechError {
    pub fn status(&self) -> StatusCode {
        match self {
            SpeechError::MissingText => StatusCode::BAD_REQUEST,
            SpeechError::Upstream { status } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            SpeechError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            SpeechError::MissingApiKey
            | SpeechError::InvalidBody(_)
            | SpeechError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for SpeechError {
    fn into_response(self) -> Response {
        match &self {
            SpeechError::Transport(e) => tracing::error!("Speech synthesis transport error: {e}"),
            SpeechError::MissingApiKey => tracing::error!("ELEVENLABS_API_KEY is not set"),
            other => tracing::warn!("Speech synthesis failed: {other}"),
        }

        let body = Json(json!({
            "success": false,
            "error": self.to_string(),
        }));
        (self.status(), body).into_response()
    }
}

/// ElevenLabs client. Holds the only copy of the synthesis credential.
#[derive(Clone)]
pub struct SpeechClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    default_voice_id: Option<String>,
    profile: VoiceProfile,
    timeout: Duration,
}

impl SpeechClient {
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().build()?,
            base_url: config.elevenlabs_base_url.trim_end_matches('/').to_string(),
            api_key: config.elevenlabs_api_key.clone(),
            default_voice_id: config.elevenlabs_voice_id.clone(),
            profile: INTERVIEWER_VOICE,
            timeout: config.upstream_timeout.unwrap_or(SPEECH_TIMEOUT),
        })
    }

    /// Request voice, then configured default, then the profile's own voice.
    pub fn resolve_voice<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        requested
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .or(self.default_voice_id.as_deref())
            .unwrap_or(self.profile.voice_id)
    }

    pub async fn synthesize(&self, text: &str, voice_id: Option<&str>) -> Result<Bytes, SpeechError> {
        let api_key = self.api_key.as_deref().ok_or(SpeechError::MissingApiKey)?;
        let voice = self.resolve_voice(voice_id);
        let url = format!("{}/v1/text-to-speech/{}", self.base_url, voice);

        info!(voice, chars = text.chars().count(), "Synthesizing speech");
        let started = Instant::now();

        let audio = with_deadline(self.timeout, self.request_audio(&url, api_key, text)).await?;

        info!(
            bytes = audio.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Speech synthesized"
        );
        Ok(audio)
    }

    async fn request_audio(&self, url: &str, api_key: &str, text: &str) -> Result<Bytes, SpeechError> {
        let response = self
            .client
            .post(url)
            .header("xi-api-key", api_key)
            .header(reqwest::header::ACCEPT, "audio/mpeg")
            .json(&self.profile.request(text))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "ElevenLabs rejected synthesis request");
            return Err(SpeechError::Upstream {
                status: status.as_u16(),
            });
        }

        Ok(response.bytes().await?)
    }
}

/// POST /api/speech
///
/// Returns raw `audio/mpeg` bytes on success.
pub async fn handle_speech(State(state): State<AppState>, body: Bytes) -> Result<Response, SpeechError> {
    let request: SpeechRequest =
        serde_json::from_slice(&body).map_err(|e| SpeechError::InvalidBody(e.to_string()))?;

    let text = request
        .text
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .ok_or(SpeechError::MissingText)?;

    let audio = state
        .speech
        .synthesize(text, request.voice_id.as_deref())
        .await?;

    Ok((
        [
            (header::CONTENT_TYPE, "audio/mpeg".to_string()),
            (header::CONTENT_LENGTH, audio.len().to_string()),
        ],
        audio,
    )
        .into_response())
}
