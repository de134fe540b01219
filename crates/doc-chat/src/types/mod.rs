//! Core types for document chat

pub mod document;
pub mod query;
pub mod response;

pub use document::{DocumentFormat, DocumentPayload};
pub use query::{QueryRequest, TranscriptQuery, TranscriptView};
pub use response::{DocumentResponse, QueryResponse, QueryStatus, SessionInfo, TranscriptResponse};
