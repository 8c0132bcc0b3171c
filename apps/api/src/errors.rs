use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::proxy::upstream::UpstreamError;

pub const UNAVAILABLE_MESSAGE: &str = "Backend server is currently unavailable";
pub const UNAVAILABLE_HINT: &str = "The backend may be starting up. Please try again in a moment.";
pub const TIMEOUT_MESSAGE: &str = "Request timeout";
pub const UPSTREAM_FAILED_MESSAGE: &str = "Backend request failed";
pub const NO_DETAILS_FALLBACK: &str = "No error details provided";
pub const INTERNAL_MESSAGE: &str = "Internal server error";
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Error shape synthesized by the proxy itself, never by the upstream.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ErrorEnvelope {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub status: u16,
}

/// Application-level error type for the backend proxy routes.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    /// Client input error: a required field is missing.
    #[error("{0}")]
    Validation(String),

    /// Upstream answered 502/503, usually while it is restarting.
    #[error("upstream unavailable (status {0})")]
    Unavailable(u16),

    /// Upstream rejected the request; its status is passed through.
    #[error("upstream rejected request (status {status})")]
    Upstream { status: u16, details: String },

    #[error("upstream did not respond within {0:?}")]
    Timeout(Duration),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            AppError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        let status = self.status().as_u16();
        let (error, details) = match self {
            AppError::Validation(msg) => (msg.clone(), None),
            AppError::Unavailable(_) => (
                UNAVAILABLE_MESSAGE.to_string(),
                Some(UNAVAILABLE_HINT.to_string()),
            ),
            AppError::Upstream { details, .. } => {
                let details = if details.trim().is_empty() {
                    NO_DETAILS_FALLBACK.to_string()
                } else {
                    details.clone()
                };
                (UPSTREAM_FAILED_MESSAGE.to_string(), Some(details))
            }
            AppError::Timeout(limit) => (
                TIMEOUT_MESSAGE.to_string(),
                Some(format!(
                    "Backend did not respond within {}s",
                    limit.as_secs_f32()
                )),
            ),
            AppError::Internal(msg) => {
                let details = if msg.trim().is_empty() {
                    UNKNOWN_ERROR.to_string()
                } else {
                    msg.clone()
                };
                (INTERNAL_MESSAGE.to_string(), Some(details))
            }
        };

        ErrorEnvelope {
            error,
            details,
            status,
        }
    }
}

impl From<UpstreamError> for AppError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Timeout(limit) => AppError::Timeout(limit),
            UpstreamError::Status { status, .. } if status == 502 || status == 503 => {
                AppError::Unavailable(status)
            }
            UpstreamError::Status { status, body } => AppError::Upstream {
                status,
                details: body,
            },
            UpstreamError::Decode(e) => AppError::Internal(e.to_string()),
            UpstreamError::Transport(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Validation(msg) => tracing::warn!("Rejected request: {msg}"),
            AppError::Internal(msg) => tracing::error!("Internal error: {msg}"),
            other => tracing::warn!("Proxy error: {other}"),
        }

        (self.status(), Json(self.envelope())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_502_and_503_collapse_to_unavailable() {
        for status in [502, 503] {
            let err = AppError::from(UpstreamError::Status {
                status,
                body: "Bad Gateway".to_string(),
            });
            assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
            let envelope = err.envelope();
            assert_eq!(envelope.error, UNAVAILABLE_MESSAGE);
            assert_eq!(envelope.status, 503);
            assert_eq!(envelope.details.as_deref(), Some(UNAVAILABLE_HINT));
        }
    }

    #[test]
    fn test_other_statuses_pass_through_with_details() {
        let err = AppError::from(UpstreamError::Status {
            status: 422,
            body: "questionId must be an integer".to_string(),
        });
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let envelope = err.envelope();
        assert_eq!(envelope.status, 422);
        assert_eq!(
            envelope.details.as_deref(),
            Some("questionId must be an integer")
        );
    }

    #[test]
    fn test_empty_upstream_body_uses_fallback_details() {
        let err = AppError::from(UpstreamError::Status {
            status: 404,
            body: "  ".to_string(),
        });
        assert_eq!(err.envelope().details.as_deref(), Some(NO_DETAILS_FALLBACK));
    }

    #[test]
    fn test_timeout_maps_to_504() {
        let err = AppError::from(UpstreamError::Timeout(Duration::from_secs(30)));
        assert_eq!(err.status(), StatusCode::GATEWAY_TIMEOUT);
        let envelope = err.envelope();
        assert_eq!(envelope.error, TIMEOUT_MESSAGE);
        assert!(envelope.details.unwrap().contains("30"));
    }

    #[test]
    fn test_internal_without_message_reports_unknown_error() {
        let envelope = AppError::Internal(String::new()).envelope();
        assert_eq!(envelope.status, 500);
        assert_eq!(envelope.details.as_deref(), Some(UNKNOWN_ERROR));
    }

    #[test]
    fn test_validation_envelope_omits_details() {
        let envelope = AppError::Validation("Missing required field: sessionId".to_string())
            .envelope();
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["status"], 400);
        assert_eq!(json["error"], "Missing required field: sessionId");
        assert!(json.get("details").is_none());
    }
}
