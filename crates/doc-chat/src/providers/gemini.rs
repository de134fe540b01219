//! Gemini client for the Generative Language `generateContent` endpoint

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use crate::config::LlmConfig;
use crate::error::Result;
use crate::providers::llm::{LlmProvider, ServiceReply};

/// Gemini client authenticated with an API key passed per request
pub struct GeminiClient {
    client: Client,
    endpoint: String,
    model: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

impl GeminiClient {
    /// Create a new Gemini client.
    ///
    /// Without `timeout_secs` the transport default applies.
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: format!(
                "{}/models/{}:generateContent",
                config.base_url.trim_end_matches('/'),
                config.model
            ),
            model: config.model.clone(),
        })
    }

    /// Get the API endpoint URL (without the credential)
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl LlmProvider for GeminiClient {
    async fn generate(&self, prompt: &str, credential: &str) -> Result<ServiceReply> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", credential)])
            .json(&request)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        tracing::debug!("{} replied with HTTP {} ({} bytes)", self.model, status, body.len());

        Ok(ServiceReply { status, body })
    }

    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_from_config() {
        let config = LlmConfig {
            base_url: "http://localhost:9000/v1beta/".to_string(),
            model: "gemini-test".to_string(),
            ..LlmConfig::default()
        };
        let client = GeminiClient::new(&config).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:9000/v1beta/models/gemini-test:generateContent");
        assert_eq!(client.model(), "gemini-test");
    }

    #[test]
    fn test_request_body_shape() {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: "hello" }],
            }],
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"contents": [{"parts": [{"text": "hello"}]}]})
        );
    }
}
