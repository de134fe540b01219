//! Response types for the HTTP shell

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::session::{AskOutcome, DocumentSummary, Session, Transcript};

/// Session overview
#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Most recently loaded document, if any
    pub document: Option<DocumentSummary>,
    /// Whether questions can be answered
    pub has_context: bool,
    pub transcript_len: usize,
}

impl From<&Session> for SessionInfo {
    fn from(session: &Session) -> Self {
        Self {
            session_id: session.id(),
            created_at: session.created_at(),
            document: session.document().cloned(),
            has_context: session.context().is_some(),
            transcript_len: session.transcript().len(),
        }
    }
}

/// Result of loading a document into a session
#[derive(Debug, Clone, Serialize)]
pub struct DocumentResponse {
    pub session_id: Uuid,
    pub document: DocumentSummary,
    pub has_context: bool,
    /// Guidance when the document produced no usable text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Outcome of a question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryStatus {
    Answered,
    MissingDocument,
    MissingInput,
}

/// Response to a question
#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    pub status: QueryStatus,
    pub question: String,
    /// Answer text, present when `status` is `answered`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    /// User guidance for guarded outcomes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub transcript_len: usize,
    pub processing_time_ms: u64,
}

impl QueryResponse {
    pub fn from_outcome(
        question: impl Into<String>,
        outcome: AskOutcome,
        transcript_len: usize,
        processing_time_ms: u64,
    ) -> Self {
        let message = outcome.guidance().map(str::to_string);
        let (status, answer) = match outcome {
            AskOutcome::Answered(entry) => (QueryStatus::Answered, Some(entry.answer().to_string())),
            AskOutcome::MissingDocument => (QueryStatus::MissingDocument, None),
            AskOutcome::MissingInput => (QueryStatus::MissingInput, None),
        };

        Self {
            status,
            question: question.into(),
            answer,
            message,
            transcript_len,
            processing_time_ms,
        }
    }
}

/// Full transcript of a session, in insertion order
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptResponse {
    pub session_id: Uuid,
    pub count: usize,
    pub entries: Transcript,
}

impl From<&Session> for TranscriptResponse {
    fn from(session: &Session) -> Self {
        Self {
            session_id: session.id(),
            count: session.transcript().len(),
            entries: session.transcript().clone(),
        }
    }
}
