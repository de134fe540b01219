//! Provider abstractions for the answering service
//!
//! The trait keeps transport separate from response interpretation, so the
//! query client can be exercised without a network.

pub mod gemini;
pub mod llm;

pub use gemini::GeminiClient;
pub use llm::{LlmProvider, ServiceReply};
