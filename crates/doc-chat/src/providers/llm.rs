//! LLM provider trait: the transport seam to the answering service

use async_trait::async_trait;

use crate::error::Result;

/// Raw reply from the answering service, before any interpretation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceReply {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub body: String,
}

impl ServiceReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// A 200 reply with the given body
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for sending a composed prompt to an answering service
///
/// Implementations:
/// - `GeminiClient`: Google Generative Language API (`generateContent`)
///
/// Implementations perform exactly one request per call: no retries and no
/// caching. Transport failures are errors; every HTTP response, whatever its
/// status, is returned as a `ServiceReply`.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send one prompt, authenticated with the caller's credential
    async fn generate(&self, prompt: &str, credential: &str) -> Result<ServiceReply>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
