//! doc-chat: ask questions about a single uploaded document and export the conversation
//!
//! A document (PDF, CSV, DOCX or XLSX) is flattened to plain text, lowercased,
//! and used as the only context for questions sent to the Gemini API. Every
//! answered question is appended to a per-session transcript, which can be
//! downloaded as PDF, DOCX, CSV or XLSX.

pub mod config;
pub mod error;
pub mod export;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod server;
pub mod session;
pub mod types;

pub use config::DocChatConfig;
pub use error::{Error, QueryError, QueryErrorKind, Result};
pub use export::{export, ExportArtifact, ExportFormat};
pub use generation::{Answer, ContextQueryClient};
pub use ingestion::{Context, ExtractedDocument, FileParser};
pub use session::{AskOutcome, Session, Transcript, TranscriptEntry};
pub use types::{DocumentFormat, DocumentPayload};
