//! Resume upload: PDF text extraction is delegated to `pdf-extract`.

use tracing::info;

use crate::error::ClientError;
use crate::session::InterviewSession;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeUpload {
    pub file_name: String,
    pub text: String,
}

impl ResumeUpload {
    /// Stores the extracted text and file name on the session.
    pub fn apply_to(self, session: &mut InterviewSession) {
        session.set_resume_text(self.text);
        session.set_resume_file_name(Some(self.file_name));
    }
}

pub fn is_pdf_name(file_name: &str) -> bool {
    file_name.to_ascii_lowercase().ends_with(".pdf")
}

/// Extracts the plain text of an uploaded PDF resume.
pub fn extract_resume(file_name: &str, bytes: &[u8]) -> Result<ResumeUpload, ClientError> {
    if !is_pdf_name(file_name) {
        return Err(ClientError::Validation(
            "Please upload your resume as a PDF".to_string(),
        ));
    }
    if bytes.is_empty() {
        return Err(ClientError::Resume(format!("{file_name} is empty")));
    }

    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| ClientError::Resume(format!("Could not read {file_name}: {e}")))?;
    let text = text.trim().to_string();

    if text.is_empty() {
        return Err(ClientError::Resume(format!(
            "{file_name} contains no extractable text"
        )));
    }

    info!(file_name, chars = text.chars().count(), "Resume text extracted");
    Ok(ResumeUpload {
        file_name: file_name.to_string(),
        text,
    })
}
