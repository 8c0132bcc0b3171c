//! Session state for one interview run.
//!
//! Built once at the composition root and passed by reference to whichever
//! page is active. The holder does no content validation; pages check their
//! own fields before moving on. It does keep `transcripts[i]` paired with
//! `questions[i]`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    #[serde(alias = "question")]
    pub text: String,
    #[serde(default, alias = "type", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("question {index} does not exist ({count} questions loaded)")]
    NoSuchQuestion { index: usize, count: usize },

    #[error("question {index} cannot be answered before question {expected}")]
    OutOfOrder { index: usize, expected: usize },
}

#[derive(Debug, Clone, Default)]
pub struct InterviewSession {
    session_id: Option<String>,
    resume_text: String,
    resume_file_name: Option<String>,
    job_title: String,
    job_info: String,
    company_name: String,
    additional_info: String,
    selected_topics: Vec<String>,
    questions: Vec<Question>,
    transcripts: Vec<Transcript>,
    technical_difficulty: Difficulty,
}

impl InterviewSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn set_session_id(&mut self, session_id: Option<String>) {
        self.session_id = session_id;
    }

    pub fn resume_text(&self) -> &str {
        &self.resume_text
    }

    pub fn set_resume_text(&mut self, text: impl Into<String>) {
        self.resume_text = text.into();
    }

    pub fn resume_file_name(&self) -> Option<&str> {
        self.resume_file_name.as_deref()
    }

    pub fn set_resume_file_name(&mut self, name: Option<String>) {
        self.resume_file_name = name;
    }

    pub fn job_title(&self) -> &str {
        &self.job_title
    }

    pub fn set_job_title(&mut self, title: impl Into<String>) {
        self.job_title = title.into();
    }

    pub fn job_info(&self) -> &str {
        &self.job_info
    }

    pub fn set_job_info(&mut self, info: impl Into<String>) {
        self.job_info = info.into();
    }

    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    pub fn set_company_name(&mut self, name: impl Into<String>) {
        self.company_name = name.into();
    }

    pub fn additional_info(&self) -> &str {
        &self.additional_info
    }

    pub fn set_additional_info(&mut self, info: impl Into<String>) {
        self.additional_info = info.into();
    }

    pub fn selected_topics(&self) -> &[String] {
        &self.selected_topics
    }

    pub fn set_selected_topics(&mut self, topics: Vec<String>) {
        self.selected_topics = topics;
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Replaces the question list. Existing transcripts belong to the old
    /// list, so they are dropped.
    pub fn set_questions(&mut self, questions: Vec<Question>) {
        self.questions = questions;
        self.transcripts.clear();
    }

    pub fn transcripts(&self) -> &[Transcript] {
        &self.transcripts
    }

    pub fn set_transcripts(&mut self, transcripts: Vec<Transcript>) {
        self.transcripts = transcripts;
    }

    pub fn technical_difficulty(&self) -> Difficulty {
        self.technical_difficulty
    }

    pub fn set_technical_difficulty(&mut self, difficulty: Difficulty) {
        self.technical_difficulty = difficulty;
    }

    /// Stores the answer for question `index`, overwriting a previous take.
    /// Answers must arrive in question order so positions stay aligned.
    pub fn record_answer(
        &mut self,
        index: usize,
        answer: impl Into<String>,
    ) -> Result<&Transcript, SessionError> {
        let question = self
            .questions
            .get(index)
            .ok_or(SessionError::NoSuchQuestion {
                index,
                count: self.questions.len(),
            })?;

        let transcript = Transcript {
            question: question.text.clone(),
            answer: answer.into(),
        };

        match index.cmp(&self.transcripts.len()) {
            std::cmp::Ordering::Less => self.transcripts[index] = transcript,
            std::cmp::Ordering::Equal => self.transcripts.push(transcript),
            std::cmp::Ordering::Greater => {
                return Err(SessionError::OutOfOrder {
                    index,
                    expected: self.transcripts.len(),
                })
            }
        }

        Ok(&self.transcripts[index])
    }

    /// Index of the first unanswered question, if any remain.
    pub fn next_unanswered(&self) -> Option<usize> {
        let answered = self.transcripts.len();
        (answered < self.questions.len()).then_some(answered)
    }

    pub fn is_complete(&self) -> bool {
        !self.questions.is_empty() && self.transcripts.len() == self.questions.len()
    }

    /// Questions paired with their transcripts, by position.
    pub fn qa_pairs(&self) -> impl Iterator<Item = (&Question, &Transcript)> {
        self.questions.iter().zip(self.transcripts.iter())
    }

    /// Clears everything for a fresh run.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
