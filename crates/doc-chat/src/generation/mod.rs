//! Answer generation against the active document context

mod client;
mod prompt;

pub use client::{Answer, ContextQueryClient, NO_RESPONSE_PLACEHOLDER};
pub use prompt::{PromptBuilder, GROUNDING_INSTRUCTION};
