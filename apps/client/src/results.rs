//! Results pages read their data back from durable storage. Missing or
//! unreadable data always redirects to the page that produces it; there is
//! no placeholder feedback.

use serde_json::Value;
use tracing::warn;

use crate::api::TechnicalFeedbackPayload;
use crate::storage::{load_snapshot, ClientStorage, Snapshot, StorageKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Upload,
    Instructions,
    Interview,
    Technical,
    Feedback,
    TechnicalFeedback,
}

impl Page {
    pub fn path(self) -> &'static str {
        match self {
            Page::Upload => "/upload",
            Page::Instructions => "/instructions",
            Page::Interview => "/interview",
            Page::Technical => "/technical",
            Page::Feedback => "/feedback",
            Page::TechnicalFeedback => "/technical-feedback",
        }
    }
}

/// The page to send the user to instead of rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redirect(pub Page);

#[derive(Debug, Clone, PartialEq)]
pub struct TechnicalResults {
    pub payload: TechnicalFeedbackPayload,
    pub feedback: Value,
}

pub fn interview_results(storage: &dyn ClientStorage) -> Result<Snapshot<Value>, Redirect> {
    read_or_redirect(storage, StorageKey::InterviewFeedback, Page::Upload)
}

pub fn technical_results(storage: &dyn ClientStorage) -> Result<TechnicalResults, Redirect> {
    let payload: Snapshot<TechnicalFeedbackPayload> =
        read_or_redirect(storage, StorageKey::TechnicalFeedbackPayload, Page::Technical)?;
    let feedback: Snapshot<Value> =
        read_or_redirect(storage, StorageKey::TechnicalFeedback, Page::Technical)?;

    Ok(TechnicalResults {
        payload: payload.value,
        feedback: feedback.value,
    })
}

fn read_or_redirect<T: serde::de::DeserializeOwned>(
    storage: &dyn ClientStorage,
    key: StorageKey,
    fallback: Page,
) -> Result<Snapshot<T>, Redirect> {
    match load_snapshot(storage, key) {
        Ok(Some(snapshot)) => Ok(snapshot),
        Ok(None) => {
            warn!(key = key.as_str(), to = fallback.path(), "No stored results, redirecting");
            Err(Redirect(fallback))
        }
        Err(e) => {
            warn!(key = key.as_str(), to = fallback.path(), "Unreadable stored results: {e}");
            Err(Redirect(fallback))
        }
    }
}
