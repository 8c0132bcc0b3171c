//! Axum route handlers for the backend proxy.
//!
//! Each handler performs the same three steps: existence checks on the
//! required fields, a forward through `BackendClient`, and a verbatim
//! pass-through of the upstream JSON. Failures become an `AppError`.

use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::proxy::endpoint::Endpoint;
use crate::state::AppState;

type ProxyResult = Result<(StatusCode, Json<Value>), AppError>;

/// POST /api/create-session
pub async fn handle_create_session(State(state): State<AppState>, body: Bytes) -> ProxyResult {
    forward(&state, Endpoint::CreateSession, &body).await
}

/// POST /api/get-questions
pub async fn handle_get_questions(State(state): State<AppState>, body: Bytes) -> ProxyResult {
    forward(&state, Endpoint::Questions, &body).await
}

/// POST /api/feedback
pub async fn handle_feedback(State(state): State<AppState>, body: Bytes) -> ProxyResult {
    forward(&state, Endpoint::Feedback, &body).await
}

/// POST /api/technical-question
pub async fn handle_technical_question(State(state): State<AppState>, body: Bytes) -> ProxyResult {
    forward(&state, Endpoint::TechnicalQuestion, &body).await
}

/// POST /api/execute-code
pub async fn handle_execute_code(State(state): State<AppState>, body: Bytes) -> ProxyResult {
    forward(&state, Endpoint::ExecuteCode, &body).await
}

/// POST /api/hint
pub async fn handle_hint(State(state): State<AppState>, body: Bytes) -> ProxyResult {
    forward(&state, Endpoint::Hint, &body).await
}

/// POST /api/technical-feedback
pub async fn handle_technical_feedback(State(state): State<AppState>, body: Bytes) -> ProxyResult {
    forward(&state, Endpoint::TechnicalFeedback, &body).await
}

async fn forward(state: &AppState, endpoint: Endpoint, raw: &[u8]) -> ProxyResult {
    let body: Value = serde_json::from_slice(raw)
        .map_err(|e| AppError::Internal(format!("Invalid JSON body: {e}")))?;

    require_fields(&body, endpoint.required_fields())?;
    log_request_summary(endpoint, &body, raw.len());

    let reply = state.backend.forward(endpoint, &body).await?;

    if let Some(count) = array_len(&reply.body, "questions") {
        info!(endpoint = endpoint.name(), count, "Questions received from backend");
    }

    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::OK);
    Ok((status, Json(reply.body)))
}

/// Existence check only: the field must be present and non-null.
fn require_fields(body: &Value, fields: &[&str]) -> Result<(), AppError> {
    for field in fields {
        match body.get(field) {
            None | Some(Value::Null) => {
                return Err(AppError::Validation(format!(
                    "Missing required field: {field}"
                )))
            }
            Some(_) => {}
        }
    }
    Ok(())
}

fn array_len(body: &Value, key: &str) -> Option<usize> {
    body.get(key).and_then(Value::as_array).map(Vec::len)
}

fn log_request_summary(endpoint: Endpoint, body: &Value, bytes: usize) {
    let session_id = body
        .get("sessionId")
        .and_then(Value::as_str)
        .unwrap_or("-");
    let question_id = body.get("questionId").map(|v| v.to_string());
    let code_len = body
        .get("userCode")
        .or_else(|| body.get("code"))
        .and_then(Value::as_str)
        .map(str::len);
    let resume_len = body
        .get("resumeText")
        .and_then(Value::as_str)
        .map(str::len);

    info!(
        endpoint = endpoint.name(),
        session_id,
        question_id = ?question_id,
        bytes,
        transcripts = ?array_len(body, "transcripts"),
        topics = ?array_len(body, "selectedTopics"),
        code_len = ?code_len,
        resume_len = ?resume_len,
        "Proxy request received"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::errors::{TIMEOUT_MESSAGE, UNAVAILABLE_MESSAGE, UPSTREAM_FAILED_MESSAGE};
    use crate::test_support::{post_json, spawn_silent_upstream, spawn_upstream, test_router};
    use axum::{routing::post, Router};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn scenario_request() -> Value {
        json!({
            "sessionId": "abc",
            "questionId": 1,
            "hintsUsed": 0,
            "isCompleted": true,
            "timeTaken": 45,
            "userCode": "print(1)"
        })
    }

    fn config_for(backend_url: &str) -> Config {
        Config {
            backend_url: backend_url.to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn test_require_fields_rejects_missing_and_null() {
        let body = json!({"sessionId": null});
        let err = require_fields(&body, &["sessionId"]).unwrap_err();
        assert_eq!(err.to_string(), "Missing required field: sessionId");

        let err = require_fields(&json!({}), &["questionId"]).unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_require_fields_accepts_falsy_values() {
        let body = json!({"questionId": 0, "transcripts": []});
        assert!(require_fields(&body, &["questionId", "transcripts"]).is_ok());
    }

    #[tokio::test]
    async fn test_healthy_upstream_body_is_returned_unchanged() {
        let upstream_body = json!({
            "score": 8,
            "feedback": "Clean solution",
            "nested": {"complexity": "O(1)", "tags": ["io"]}
        });
        let expected = upstream_body.clone();
        let upstream = Router::new().route(
            "/api/technical/feedback",
            post(move || {
                let body = upstream_body.clone();
                async move { Json(body) }
            }),
        );
        let base = spawn_upstream(upstream).await;

        let (status, body) = post_json(
            test_router(config_for(&base)),
            "/api/technical-feedback",
            &scenario_request(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, expected);
    }

    #[tokio::test]
    async fn test_feedback_route_passes_scenario_body_through() {
        let upstream = Router::new().route(
            "/api/feedback",
            post(|Json(body): Json<Value>| async move {
                Json(json!({ "received": body, "overallScore": 7 }))
            }),
        );
        let base = spawn_upstream(upstream).await;

        let (status, body) =
            post_json(test_router(config_for(&base)), "/api/feedback", &scenario_request()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["received"], scenario_request());
        assert_eq!(body["overallScore"], 7);
    }

    #[tokio::test]
    async fn test_payload_fields_are_left_to_the_backend() {
        let upstream = Router::new().route(
            "/api/technical/execute",
            post(|| async { (StatusCode::UNPROCESSABLE_ENTITY, "code is required") }),
        );
        let base = spawn_upstream(upstream).await;

        let (status, body) = post_json(
            test_router(config_for(&base)),
            "/api/execute-code",
            &json!({"language": "python"}),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["details"], "code is required");
    }

    #[tokio::test]
    async fn test_non_json_upstream_success_is_internal_error() {
        let upstream = Router::new().route(
            "/api/technical/hint",
            post(|| async { "<html>maintenance</html>" }),
        );
        let base = spawn_upstream(upstream).await;

        let (status, body) = post_json(
            test_router(config_for(&base)),
            "/api/hint",
            &json!({"sessionId": "abc", "questionId": 1}),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
        assert_eq!(body["status"], 500);
        assert!(!body["details"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upstream_created_status_is_preserved() {
        let upstream = Router::new().route(
            "/api/create-session",
            post(|| async { (StatusCode::CREATED, Json(json!({"sessionId": "s-1"}))) }),
        );
        let base = spawn_upstream(upstream).await;

        let (status, body) = post_json(
            test_router(config_for(&base)),
            "/api/create-session",
            &json!({"resumeText": "Ten years of Rust", "jobTitle": "Engineer"}),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["sessionId"], "s-1");
    }

    #[tokio::test]
    async fn test_upstream_503_becomes_unavailable_envelope() {
        let upstream = Router::new().route(
            "/api/technical/feedback",
            post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "restarting") }),
        );
        let base = spawn_upstream(upstream).await;

        let (status, body) = post_json(
            test_router(config_for(&base)),
            "/api/technical-feedback",
            &scenario_request(),
        )
        .await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], UNAVAILABLE_MESSAGE);
        assert_eq!(body["status"], 503);
    }

    #[tokio::test]
    async fn test_upstream_502_on_create_session_becomes_503() {
        let upstream = Router::new().route(
            "/api/create-session",
            post(|| async { StatusCode::BAD_GATEWAY }),
        );
        let base = spawn_upstream(upstream).await;

        let (status, body) = post_json(
            test_router(config_for(&base)),
            "/api/create-session",
            &json!({"resumeText": "r", "jobTitle": "t"}),
        )
        .await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("currently unavailable"));
    }

    #[tokio::test]
    async fn test_upstream_rejection_passes_status_and_details() {
        let upstream = Router::new().route(
            "/api/technical/hint",
            post(|| async { (StatusCode::NOT_FOUND, "Question 99 not found") }),
        );
        let base = spawn_upstream(upstream).await;

        let (status, body) = post_json(
            test_router(config_for(&base)),
            "/api/hint",
            &json!({"sessionId": "abc", "questionId": 99}),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], UPSTREAM_FAILED_MESSAGE);
        assert_eq!(body["details"], "Question 99 not found");
        assert_eq!(body["status"], 404);
    }

    #[tokio::test]
    async fn test_slow_upstream_times_out_and_connection_is_closed() {
        let (base, closed) = spawn_silent_upstream().await;
        let config = Config {
            upstream_timeout: Some(Duration::from_millis(200)),
            ..config_for(&base)
        };

        let (status, body) =
            post_json(test_router(config), "/api/technical-feedback", &scenario_request()).await;

        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(body["error"], TIMEOUT_MESSAGE);
        assert_eq!(body["status"], 504);

        tokio::time::timeout(Duration::from_secs(5), closed)
            .await
            .expect("upstream connection should be closed after the timeout")
            .expect("upstream task ended without reporting");
    }

    #[tokio::test]
    async fn test_missing_field_never_reaches_upstream() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let upstream = Router::new().route(
            "/api/get-questions",
            post(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Json(json!({})) }
            }),
        );
        let base = spawn_upstream(upstream).await;

        let (status, body) =
            post_json(test_router(config_for(&base)), "/api/get-questions", &json!({})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing required field: sessionId");
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_malformed_request_body_is_internal_error() {
        use crate::test_support::post_raw;

        let (status, body) = post_raw(
            test_router(config_for("http://127.0.0.1:1")),
            "/api/feedback",
            "application/json",
            b"{not json".to_vec(),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], 500);
        assert!(body["details"]
            .as_str()
            .unwrap()
            .starts_with("Invalid JSON body"));
    }
}
