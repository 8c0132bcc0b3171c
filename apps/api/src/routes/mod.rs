pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::media::{speech, transcribe};
use crate::proxy::{handlers, Endpoint};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Backend proxy
        .route(
            Endpoint::CreateSession.route(),
            post(handlers::handle_create_session),
        )
        .route(Endpoint::Questions.route(), post(handlers::handle_get_questions))
        .route(Endpoint::Feedback.route(), post(handlers::handle_feedback))
        .route(
            Endpoint::TechnicalQuestion.route(),
            post(handlers::handle_technical_question),
        )
        .route(
            Endpoint::ExecuteCode.route(),
            post(handlers::handle_execute_code),
        )
        .route(Endpoint::Hint.route(), post(handlers::handle_hint))
        .route(
            Endpoint::TechnicalFeedback.route(),
            post(handlers::handle_technical_feedback),
        )
        // Media adapter
        .route("/api/speech", post(speech::handle_speech))
        .route(
            "/api/transcribe",
            post(transcribe::handle_transcribe)
                .layer(DefaultBodyLimit::max(transcribe::MAX_AUDIO_BYTES)),
        )
        .with_state(state)
}
