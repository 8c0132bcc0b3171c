use std::sync::Arc;

use crate::config::Config;
use crate::media::speech::SpeechClient;
use crate::media::transcribe::{Transcriber, WhisperTranscriber};
use crate::proxy::BackendClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub backend: BackendClient,
    pub speech: SpeechClient,
    /// Pluggable transcription backend. Default: Whisper.
    pub transcriber: Arc<dyn Transcriber>,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(AppState {
            backend: BackendClient::new(&config.backend_url, config.upstream_timeout)?,
            speech: SpeechClient::from_config(config)?,
            transcriber: Arc::new(WhisperTranscriber::from_config(config)?),
        })
    }
}
