//! Page flow: each function is what one page does when the user acts.
//!
//! Calls that feed each other are awaited in order. Nothing retries; a
//! failed step returns its error and the user triggers it again.

use bytes::Bytes;
use serde_json::Value;
use tracing::info;

use crate::api::{CreateSessionRequest, ProxyClient, TechnicalFeedbackPayload};
use crate::error::ClientError;
use crate::session::{InterviewSession, Transcript};
use crate::storage::{save_snapshot, ClientStorage, StorageKey};

/// Spoken on the instructions page, synthesized through the proxy.
pub const INSTRUCTION_LINE: &str = "Welcome to your mock interview. \
    I will ask you a series of questions. Take a moment to think, \
    then press record and answer out loud. Press stop when you are done.";

/// Upload page check: every required text field plus a resume.
pub fn validate_upload(session: &InterviewSession) -> Result<(), ClientError> {
    let required = [
        ("job title", session.job_title()),
        ("job description", session.job_info()),
        ("company name", session.company_name()),
    ];
    let missing: Vec<&str> = required
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(label, _)| *label)
        .collect();

    if !missing.is_empty() {
        return Err(ClientError::Validation(format!(
            "Please fill in: {}",
            missing.join(", ")
        )));
    }
    if session.resume_text().trim().is_empty() {
        return Err(ClientError::Validation(
            "Please upload your resume".to_string(),
        ));
    }
    Ok(())
}

/// Create session, then fetch its questions. Returns the question count.
pub async fn start_interview(
    session: &mut InterviewSession,
    client: &ProxyClient,
) -> Result<usize, ClientError> {
    validate_upload(session)?;

    let created = client
        .create_session(&CreateSessionRequest::from_session(session))
        .await?;
    session.set_session_id(Some(created.session_id.clone()));
    info!(session_id = %created.session_id, "Interview session created");

    let questions = client.fetch_questions(&created.session_id).await?.questions;
    let count = questions.len();
    session.set_questions(questions);
    info!(session_id = %created.session_id, count, "Questions loaded");

    Ok(count)
}

/// Transcribes one recorded answer and stores it at the question's position.
pub async fn answer_question<'s>(
    session: &'s mut InterviewSession,
    client: &ProxyClient,
    index: usize,
    recording: Vec<u8>,
) -> Result<&'s Transcript, ClientError> {
    if index >= session.questions().len() {
        return Err(ClientError::Validation(format!(
            "There is no question {}",
            index + 1
        )));
    }
    if recording.is_empty() {
        return Err(ClientError::Validation(
            "Nothing was recorded for this answer".to_string(),
        ));
    }

    let file_name = format!("answer-{}.webm", index + 1);
    let answer = client.transcribe(recording, &file_name).await?;
    info!(index, chars = answer.chars().count(), "Answer transcribed");

    Ok(session.record_answer(index, answer)?)
}

/// Submits all transcripts and keeps the feedback for the results page.
pub async fn finish_interview(
    session: &InterviewSession,
    client: &ProxyClient,
    storage: &mut dyn ClientStorage,
) -> Result<Value, ClientError> {
    let session_id = require_session_id(session)?;
    if session.transcripts().is_empty() {
        return Err(ClientError::Validation(
            "Answer at least one question before finishing".to_string(),
        ));
    }

    let feedback = client
        .submit_feedback(session_id, session.transcripts())
        .await?;
    save_snapshot(storage, StorageKey::InterviewFeedback, &feedback)?;
    info!(
        session_id,
        answered = session.transcripts().len(),
        "Interview feedback stored"
    );

    Ok(feedback)
}

/// Fetches a coding question at the session's difficulty.
pub async fn load_technical_question(
    session: &InterviewSession,
    client: &ProxyClient,
) -> Result<Value, ClientError> {
    let session_id = require_session_id(session)?;
    client
        .technical_question(session_id, session.technical_difficulty())
        .await
}

/// Stores the submission, requests technical feedback, stores the result.
///
/// The payload is written first so the results page can show what was
/// submitted even if the feedback call fails.
pub async fn finish_technical(
    client: &ProxyClient,
    storage: &mut dyn ClientStorage,
    payload: &TechnicalFeedbackPayload,
) -> Result<Value, ClientError> {
    save_snapshot(storage, StorageKey::TechnicalFeedbackPayload, payload)?;

    let feedback = client.technical_feedback(payload).await?;
    save_snapshot(storage, StorageKey::TechnicalFeedback, &feedback)?;
    info!(
        session_id = %payload.session_id,
        hints_used = payload.hints_used,
        time_taken = payload.time_taken,
        "Technical feedback stored"
    );

    Ok(feedback)
}

/// Audio for the instructions page.
pub async fn instruction_audio(client: &ProxyClient) -> Result<Bytes, ClientError> {
    client.synthesize(INSTRUCTION_LINE, None).await
}

fn require_session_id(session: &InterviewSession) -> Result<&str, ClientError> {
    session
        .session_id()
        .ok_or_else(|| ClientError::Validation("No active interview session".to_string()))
}
