//! Context-scoped query client and answering-service response mapping

use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;

use super::prompt::PromptBuilder;
use crate::error::{QueryError, Result};
use crate::ingestion::Context;
use crate::providers::{LlmProvider, ServiceReply};

/// Answer text used when a successful reply carries no candidate text
pub const NO_RESPONSE_PLACEHOLDER: &str = "No response";

/// Answer produced for one question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub text: String,
    /// True when `text` is the placeholder for a reply without content
    pub placeholder: bool,
}

impl Answer {
    fn placeholder() -> Self {
        Self {
            text: NO_RESPONSE_PLACEHOLDER.to_string(),
            placeholder: true,
        }
    }
}

// Every level is optional: a missing field at any depth means "no answer".
#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Sends one grounded prompt per question and maps the reply to an answer.
///
/// No retries, no caching: identical questions always issue a fresh request.
#[derive(Clone)]
pub struct ContextQueryClient {
    provider: Arc<dyn LlmProvider>,
}

impl ContextQueryClient {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &dyn LlmProvider {
        self.provider.as_ref()
    }

    /// Ask `question` against `context`, authenticating with `credential`
    pub async fn ask(&self, question: &str, context: &Context, credential: &str) -> Result<Answer> {
        let start = Instant::now();
        let prompt = PromptBuilder::build_context_prompt(context.as_str(), question);

        tracing::info!(
            "Query via {} ({}): \"{}\"",
            self.provider.name(),
            self.provider.model(),
            question
        );

        let reply = self.provider.generate(&prompt, credential).await?;
        let answer = interpret_reply(reply)?;

        tracing::info!(
            "Query completed in {}ms ({} chars)",
            start.elapsed().as_millis(),
            answer.text.len()
        );

        Ok(answer)
    }
}

/// Map a raw service reply to an answer or a query error.
///
/// - 429: quota exceeded, static message
/// - other non-2xx: service error carrying the raw body
/// - 2xx with a body that is not JSON: service error carrying the raw body
/// - 2xx JSON without `candidates[0].content.parts[0].text`: placeholder answer
pub fn interpret_reply(reply: ServiceReply) -> Result<Answer> {
    if reply.status == 429 {
        tracing::warn!("Answering service quota exceeded");
        return Err(QueryError::quota_exceeded().into());
    }

    if !reply.is_success() {
        tracing::warn!("Answering service failed with HTTP {}", reply.status);
        return Err(QueryError::service(reply.body).into());
    }

    let value: serde_json::Value = match serde_json::from_str(&reply.body) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Answering service returned a non-JSON body: {}", e);
            return Err(QueryError::service(reply.body).into());
        }
    };

    match first_candidate_text(value) {
        Some(text) => Ok(Answer {
            text,
            placeholder: false,
        }),
        None => {
            tracing::warn!("Reply had no candidate text, answering \"{}\"", NO_RESPONSE_PLACEHOLDER);
            Ok(Answer::placeholder())
        }
    }
}

fn first_candidate_text(value: serde_json::Value) -> Option<String> {
    let response: GenerateResponse = serde_json::from_value(value).ok()?;
    response
        .candidates
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .next()?
        .text
}
