//! Request types for the HTTP shell

use serde::{Deserialize, Serialize};

/// Question asked within a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The question to answer
    #[serde(default)]
    pub question: String,
    /// Credential for the answering service; falls back to the configured key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl QueryRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Credential to use: the request's own key if non-blank, else `fallback`.
    ///
    /// Returns an empty string when neither is available.
    pub fn credential<'a>(&'a self, fallback: Option<&'a str>) -> &'a str {
        self.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .or(fallback)
            .unwrap_or("")
    }
}

/// How a transcript is returned
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptView {
    #[default]
    Json,
    Markdown,
}

/// Query string of `GET /api/sessions/:id/transcript`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranscriptQuery {
    #[serde(default)]
    pub format: TranscriptView,
}
