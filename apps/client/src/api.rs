//! Typed client of the proxy routes. The only way this crate reaches the
//! backend or any media service.

use bytes::Bytes;
use reqwest::{multipart, Client};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::session::{Difficulty, InterviewSession, Question, Transcript};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub resume_text: String,
    pub job_title: String,
    pub job_info: String,
    pub company_name: String,
    pub additional_info: String,
    pub selected_topics: Vec<String>,
}

impl CreateSessionRequest {
    pub fn from_session(session: &InterviewSession) -> Self {
        Self {
            resume_text: session.resume_text().to_string(),
            job_title: session.job_title().to_string(),
            job_info: session.job_info().to_string(),
            company_name: session.company_name().to_string(),
            additional_info: session.additional_info().to_string(),
            selected_topics: session.selected_topics().to_vec(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSessionResponse {
    #[serde(alias = "session_id", rename = "sessionId")]
    pub session_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionsResponse {
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalFeedbackPayload {
    pub session_id: String,
    pub question_id: Value,
    pub hints_used: u32,
    pub is_completed: bool,
    /// Seconds spent on the problem.
    pub time_taken: u64,
    pub user_code: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteCodeRequest {
    pub code: String,
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Error envelope written by the proxy (`error`, optional `details`).
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    details: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TranscribeBody {
    transcript: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct ProxyClient {
    client: Client,
    base_url: String,
}

impl ProxyClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        Ok(Self {
            client: Client::builder().timeout(config.request_timeout).build()?,
            base_url: config.proxy_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn create_session(
        &self,
        request: &CreateSessionRequest,
    ) -> Result<CreateSessionResponse, ClientError> {
        self.post_json("/api/create-session", request).await
    }

    pub async fn fetch_questions(&self, session_id: &str) -> Result<QuestionsResponse, ClientError> {
        self.post_json("/api/get-questions", &json!({ "sessionId": session_id }))
            .await
    }

    pub async fn submit_feedback(
        &self,
        session_id: &str,
        transcripts: &[Transcript],
    ) -> Result<Value, ClientError> {
        self.post_json(
            "/api/feedback",
            &json!({ "sessionId": session_id, "transcripts": transcripts }),
        )
        .await
    }

    pub async fn technical_question(
        &self,
        session_id: &str,
        difficulty: Difficulty,
    ) -> Result<Value, ClientError> {
        self.post_json(
            "/api/technical-question",
            &json!({ "sessionId": session_id, "difficulty": difficulty }),
        )
        .await
    }

    pub async fn execute_code(&self, request: &ExecuteCodeRequest) -> Result<Value, ClientError> {
        self.post_json("/api/execute-code", request).await
    }

    pub async fn request_hint(
        &self,
        session_id: &str,
        question_id: &Value,
        user_code: &str,
    ) -> Result<Value, ClientError> {
        self.post_json(
            "/api/hint",
            &json!({
                "sessionId": session_id,
                "questionId": question_id,
                "userCode": user_code,
            }),
        )
        .await
    }

    pub async fn technical_feedback(
        &self,
        payload: &TechnicalFeedbackPayload,
    ) -> Result<Value, ClientError> {
        self.post_json("/api/technical-feedback", payload).await
    }

    /// Uploads a recording as the `audio` form field.
    pub async fn transcribe(&self, audio: Vec<u8>, file_name: &str) -> Result<String, ClientError> {
        let part = multipart::Part::bytes(audio)
            .file_name(file_name.to_string())
            .mime_str("audio/webm")?;
        let form = multipart::Form::new().part("audio", part);

        let response = self
            .client
            .post(self.url("/api/transcribe"))
            .multipart(form)
            .send()
            .await?;

        let body: TranscribeBody = decode(response).await?;
        Ok(body.transcript)
    }

    /// Returns `audio/mpeg` bytes synthesized by the proxy.
    pub async fn synthesize(&self, text: &str, voice_id: Option<&str>) -> Result<Bytes, ClientError> {
        let response = self
            .client
            .post(self.url("/api/speech"))
            .json(&json!({ "text": text, "voiceId": voice_id }))
            .send()
            .await?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            return Err(api_error(status, &response.text().await.unwrap_or_default()));
        }
        Ok(response.bytes().await?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        debug!(path, "Calling proxy");
        let response = self.client.post(self.url(path)).json(body).send().await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status().as_u16();
    let text = response.text().await?;

    if !(200..300).contains(&status) {
        return Err(api_error(status, &text));
    }
    Ok(serde_json::from_str(&text)?)
}

fn api_error(status: u16, text: &str) -> ClientError {
    let (error, details) = match serde_json::from_str::<ErrorBody>(text) {
        Ok(body) => (body.error, body.details),
        Err(_) if text.trim().is_empty() => (format!("Request failed with status {status}"), None),
        Err(_) => (text.to_string(), None),
    };
    warn!(status, error = %error, "Proxy call failed");
    ClientError::Api {
        status,
        error,
        details,
    }
}
