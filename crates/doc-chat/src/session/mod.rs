//! Per-user chat session: the active document context plus its transcript

mod transcript;

pub use transcript::{Transcript, TranscriptEntry};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::Result;
use crate::generation::ContextQueryClient;
use crate::ingestion::{Context, ExtractedDocument, FileParser};
use crate::types::{DocumentFormat, DocumentPayload};

/// Shown when a question arrives before any document was extracted
pub const MISSING_DOCUMENT_MESSAGE: &str =
    "Please upload a file to extract text before asking questions.";
/// Shown when the question or the credential is blank
pub const MISSING_INPUT_MESSAGE: &str = "Please enter a question and an API key.";

/// Result of asking a question within a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AskOutcome {
    /// The service answered; the entry was appended to the transcript
    Answered(TranscriptEntry),
    /// No document context is active. Nothing was sent.
    MissingDocument,
    /// Question or credential was blank. Nothing was sent.
    MissingInput,
}

impl AskOutcome {
    /// User guidance for the outcomes that did not reach the service
    pub fn guidance(&self) -> Option<&'static str> {
        match self {
            AskOutcome::Answered(_) => None,
            AskOutcome::MissingDocument => Some(MISSING_DOCUMENT_MESSAGE),
            AskOutcome::MissingInput => Some(MISSING_INPUT_MESSAGE),
        }
    }
}

/// Summary of the most recently loaded document
#[derive(Debug, Clone, Serialize)]
pub struct DocumentSummary {
    pub filename: Option<String>,
    pub format: DocumentFormat,
    pub content_hash: String,
    pub page_count: Option<u32>,
    /// Characters in the active context (0 when the document had no text)
    pub context_chars: usize,
    pub loaded_at: DateTime<Utc>,
}

/// Isolated chat session.
///
/// Holds at most one context; loading a new document replaces it entirely.
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    created_at: DateTime<Utc>,
    document: Option<DocumentSummary>,
    context: Option<Context>,
    transcript: Transcript,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            document: None,
            context: None,
            transcript: Transcript::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn context(&self) -> Option<&Context> {
        self.context.as_ref()
    }

    pub fn document(&self) -> Option<&DocumentSummary> {
        self.document.as_ref()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Extract a document and make its normalized text the active context.
    ///
    /// On failure the previous context and transcript are left untouched.
    pub fn load_document(&mut self, parser: &FileParser, payload: DocumentPayload) -> Result<&DocumentSummary> {
        let extracted = parser.extract(payload)?;
        Ok(self.apply_extracted(extracted))
    }

    /// Replace the active context with an already extracted document
    pub fn apply_extracted(&mut self, extracted: ExtractedDocument) -> &DocumentSummary {
        let context = Context::from_extracted(&extracted.text);

        if context.is_none() {
            tracing::warn!(
                "{} contained no text; session {} has no active context",
                extracted.filename.as_deref().unwrap_or("upload"),
                self.id
            );
        }

        let summary = DocumentSummary {
            filename: extracted.filename,
            format: extracted.format,
            content_hash: extracted.content_hash,
            page_count: extracted.page_count,
            context_chars: context.as_ref().map(Context::char_count).unwrap_or(0),
            loaded_at: Utc::now(),
        };

        self.context = context;
        self.document.insert(summary)
    }

    /// Ask a question against the active context.
    ///
    /// Only a successful answer (including the "No response" placeholder) is
    /// recorded; service failures propagate and leave the transcript unchanged.
    pub async fn ask(
        &mut self,
        question: &str,
        client: &ContextQueryClient,
        credential: &str,
    ) -> Result<AskOutcome> {
        if question.trim().is_empty() || credential.trim().is_empty() {
            return Ok(AskOutcome::MissingInput);
        }

        let Some(context) = self.context.as_ref() else {
            return Ok(AskOutcome::MissingDocument);
        };

        let answer = client.ask(question, context, credential).await?;
        let entry = self.transcript.append(question, answer.text).clone();

        Ok(AskOutcome::Answered(entry))
    }
}
