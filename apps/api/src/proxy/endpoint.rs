use std::time::Duration;

/// The fixed set of backend operations the proxy forwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    CreateSession,
    Questions,
    Feedback,
    TechnicalQuestion,
    ExecuteCode,
    Hint,
    TechnicalFeedback,
}

impl Endpoint {
    pub const ALL: [Endpoint; 7] = [
        Endpoint::CreateSession,
        Endpoint::Questions,
        Endpoint::Feedback,
        Endpoint::TechnicalQuestion,
        Endpoint::ExecuteCode,
        Endpoint::Hint,
        Endpoint::TechnicalFeedback,
    ];

    /// Short name used in log fields.
    pub fn name(self) -> &'static str {
        match self {
            Endpoint::CreateSession => "create_session",
            Endpoint::Questions => "get_questions",
            Endpoint::Feedback => "feedback",
            Endpoint::TechnicalQuestion => "technical_question",
            Endpoint::ExecuteCode => "execute_code",
            Endpoint::Hint => "hint",
            Endpoint::TechnicalFeedback => "technical_feedback",
        }
    }

    /// Route exposed to the browser.
    pub fn route(self) -> &'static str {
        match self {
            Endpoint::CreateSession => "/api/create-session",
            Endpoint::Questions => "/api/get-questions",
            Endpoint::Feedback => "/api/feedback",
            Endpoint::TechnicalQuestion => "/api/technical-question",
            Endpoint::ExecuteCode => "/api/execute-code",
            Endpoint::Hint => "/api/hint",
            Endpoint::TechnicalFeedback => "/api/technical-feedback",
        }
    }

    /// Path appended to the configured backend base URL.
    pub fn upstream_path(self) -> &'static str {
        match self {
            Endpoint::CreateSession => "/api/create-session",
            Endpoint::Questions => "/api/get-questions",
            Endpoint::Feedback => "/api/feedback",
            Endpoint::TechnicalQuestion => "/api/technical/question",
            Endpoint::ExecuteCode => "/api/technical/execute",
            Endpoint::Hint => "/api/technical/hint",
            Endpoint::TechnicalFeedback => "/api/technical/feedback",
        }
    }

    /// Per-endpoint bound on the upstream wait. Session creation and question
    /// generation run an LLM pass on the backend, so they get more headroom.
    pub fn default_timeout(self) -> Duration {
        match self {
            Endpoint::CreateSession | Endpoint::Questions => Duration::from_secs(60),
            Endpoint::Feedback
            | Endpoint::TechnicalQuestion
            | Endpoint::ExecuteCode
            | Endpoint::Hint
            | Endpoint::TechnicalFeedback => Duration::from_secs(30),
        }
    }

    /// Identifier fields whose presence is checked before anything is
    /// forwarded. Payload fields are left for the backend to validate.
    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            Endpoint::CreateSession | Endpoint::ExecuteCode => &[],
            Endpoint::Questions | Endpoint::Feedback | Endpoint::TechnicalQuestion => {
                &["sessionId"]
            }
            Endpoint::Hint | Endpoint::TechnicalFeedback => &["sessionId", "questionId"],
        }
    }
}
