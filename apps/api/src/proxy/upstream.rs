//! Backend client, the single point through which the proxy reaches the
//! interview backend.
//!
//! Every call gets a bounded wait (`Endpoint::default_timeout`, or the
//! configured override) and a `request_id` span for log correlation.
use std::time::{Duration, Instant};

use reqwest::{header::CONTENT_TYPE, Client};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::proxy::deadline::{with_deadline, DeadlineElapsed};
use crate::proxy::endpoint::Endpoint;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream did not respond within {0:?}")]
    Timeout(Duration),

    #[error("upstream returned status {status}")]
    Status { status: u16, body: String },

    #[error("upstream response was not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl From<DeadlineElapsed> for UpstreamError {
    fn from(e: DeadlineElapsed) -> Self {
        UpstreamError::Timeout(e.0)
    }
}

/// Successful upstream reply: status code plus the parsed JSON body, untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamReply {
    pub status: u16,
    pub body: Value,
}

#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
    timeout_override: Option<Duration>,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout_override: Option<Duration>) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_override,
        })
    }

    pub fn url_for(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.upstream_path())
    }

    pub fn timeout_for(&self, endpoint: Endpoint) -> Duration {
        self.timeout_override
            .unwrap_or_else(|| endpoint.default_timeout())
    }

    /// Forwards `body` unchanged to the endpoint's upstream path.
    pub async fn forward(&self, endpoint: Endpoint, body: &Value) -> Result<UpstreamReply, UpstreamError> {
        let url = self.url_for(endpoint);
        let limit = self.timeout_for(endpoint);
        let request_id = Uuid::new_v4();
        let span = info_span!("upstream", endpoint = endpoint.name(), %request_id);
        let payload = serde_json::to_vec(body)?;

        async move {
            info!(
                url = %url,
                bytes = payload.len(),
                timeout_secs = limit.as_secs(),
                "Forwarding request to backend"
            );

            let started = Instant::now();
            let result = with_deadline(limit, self.send(&url, payload)).await;
            let elapsed_ms = started.elapsed().as_millis() as u64;

            match &result {
                Ok(reply) => info!(status = reply.status, elapsed_ms, "Backend responded"),
                Err(UpstreamError::Status { status, body }) => warn!(
                    status,
                    elapsed_ms,
                    body_len = body.len(),
                    "Backend returned an error status"
                ),
                Err(e) => warn!(elapsed_ms, "Backend call failed: {e}"),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn send(&self, url: &str, payload: Vec<u8>) -> Result<UpstreamReply, UpstreamError> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await?;

        let status = response.status().as_u16();
        let text = response.text().await?;

        if !(200..300).contains(&status) {
            return Err(UpstreamError::Status { status, body: text });
        }

        let body: Value = serde_json::from_str(&text)?;
        Ok(UpstreamReply { status, body })
    }
}
