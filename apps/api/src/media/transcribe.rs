//! Speech → text through OpenAI Whisper.
//!
//! `AppState` holds an `Arc<dyn Transcriber>`; `WhisperTranscriber` is the
//! production backend.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use reqwest::{multipart, Client};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;
use crate::proxy::deadline::{with_deadline, DeadlineElapsed};
use crate::state::AppState;

pub const WHISPER_MODEL: &str = "whisper-1";
pub const TRANSCRIPTION_LANGUAGE: &str = "en";
pub const TRANSCRIBE_TIMEOUT: Duration = Duration::from_secs(60);
/// Whisper's own upload ceiling.
pub const MAX_AUDIO_BYTES: usize = 25 * 1024 * 1024;

// Browser recordings arrive as webm/opus blobs; Whisper picks the decoder from
// the file name, so every upload is re-wrapped under this name and type.
const CONTAINER_FILE_NAME: &str = "audio.webm";
const CONTAINER_MIME: &str = "audio/webm";

#[derive(Debug, Error)]
pub enum TranscribeError {
    #[error("No audio file provided")]
    MissingAudio,

    #[error("OpenAI API key not configured")]
    MissingApiKey,

    #[error("Invalid multipart form: {0}")]
    Multipart(String),

    #[error("OpenAI returned status {0}")]
    Upstream(u16),

    #[error("Transcription timed out after {0:?}")]
    Timeout(Duration),

    #[error("Transcription request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl From<DeadlineElapsed> for TranscribeError {
    fn from(e: DeadlineElapsed) -> Self {
        TranscribeError::Timeout(e.0)
    }
}

impl IntoResponse for TranscribeError {
    fn into_response(self) -> Response {
        if let TranscribeError::MissingAudio = self {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": self.to_string() })),
            )
                .into_response();
        }

        tracing::error!("Transcription failed: {self}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Transcription failed",
                "details": self.to_string(),
            })),
        )
            .into_response()
    }
}

/// An uploaded recording as received from the browser.
#[derive(Debug, Clone)]
pub struct AudioUpload {
    pub bytes: Bytes,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct TranscribeResponse {
    pub success: bool,
    pub transcript: String,
}

/// Swap transcription backends without touching the route.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio: AudioUpload) -> Result<String, TranscribeError>;
}

#[derive(Debug, Deserialize)]
struct WhisperResponse {
    text: String,
}

pub struct WhisperTranscriber {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl WhisperTranscriber {
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().build()?,
            base_url: config.openai_base_url.trim_end_matches('/').to_string(),
            api_key: config.openai_api_key.clone(),
            timeout: config.upstream_timeout.unwrap_or(TRANSCRIBE_TIMEOUT),
        })
    }

    async fn request_transcript(&self, api_key: &str, audio: Bytes) -> Result<String, TranscribeError> {
        let file = multipart::Part::bytes(audio.to_vec())
            .file_name(CONTAINER_FILE_NAME)
            .mime_str(CONTAINER_MIME)?;
        let form = multipart::Form::new()
            .part("file", file)
            .text("model", WHISPER_MODEL)
            .text("language", TRANSCRIPTION_LANGUAGE);

        let response = self
            .client
            .post(format!("{}/v1/audio/transcriptions", self.base_url))
            .bearer_auth(api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Whisper rejected transcription request");
            return Err(TranscribeError::Upstream(status.as_u16()));
        }

        let parsed: WhisperResponse = response.json().await?;
        Ok(parsed.text)
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    async fn transcribe(&self, audio: AudioUpload) -> Result<String, TranscribeError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(TranscribeError::MissingApiKey)?;

        info!(
            bytes = audio.bytes.len(),
            file_name = audio.file_name.as_deref().unwrap_or("-"),
            content_type = audio.content_type.as_deref().unwrap_or("-"),
            "Transcribing audio"
        );
        let started = Instant::now();

        let transcript =
            with_deadline(self.timeout, self.request_transcript(api_key, audio.bytes)).await?;

        info!(
            chars = transcript.chars().count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Transcription complete"
        );
        Ok(transcript)
    }
}

/// POST /api/transcribe (multipart, field `audio`)
pub async fn handle_transcribe(
    State(state): State<AppState>,
    form: Result<Multipart, MultipartRejection>,
) -> Result<Json<TranscribeResponse>, TranscribeError> {
    let mut form = form.map_err(|rejection| TranscribeError::Multipart(rejection.body_text()))?;
    let mut audio = None;

    while let Some(field) = form
        .next_field()
        .await
        .map_err(|e| TranscribeError::Multipart(e.to_string()))?
    {
        if field.name() != Some("audio") {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| TranscribeError::Multipart(e.to_string()))?;
        audio = Some(AudioUpload {
            bytes,
            file_name,
            content_type,
        });
    }

    let audio = audio
        .filter(|a| !a.bytes.is_empty())
        .ok_or(TranscribeError::MissingAudio)?;

    let transcript = state.transcriber.transcribe(audio).await?;

    Ok(Json(TranscribeResponse {
        success: true,
        transcript,
    }))
}
