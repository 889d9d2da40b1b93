mod client;
pub(crate) mod types;

use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::traits::TextGenerator;
use client::GeminiClient;
use types::GenerateContentRequest;

// =============================================================================
// Gemini Agent
// =============================================================================

/// Gemini text backend. Cheap to clone; the underlying HTTP client is shared.
#[derive(Clone)]
pub struct Gemini {
    client: Arc<GeminiClient>,
    model: String,
}

impl Gemini {
    pub fn new(api_key: impl AsRef<str>, model: impl Into<String>) -> Self {
        Self {
            client: Arc::new(GeminiClient::new(api_key.as_ref())),
            model: model.into(),
        }
    }

    pub fn from_env(model: impl Into<String>) -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| anyhow!("GEMINI_API_KEY environment variable not set"))?;
        Ok(Self::new(api_key, model))
    }

    /// Point the client at a different endpoint (tests, proxies).
    pub fn with_base_url(self, api_key: impl AsRef<str>, url: &str) -> Self {
        Self {
            client: Arc::new(GeminiClient::new(api_key.as_ref()).with_base_url(url)),
            model: self.model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextGenerator for Gemini {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateContentRequest::from_prompt(prompt);
        let text = self.client.generate_content(&self.model, &request).await?;
        Ok(text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn generate_returns_first_candidate_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-1.5-flash:generateContent")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"candidates":[{"content":{"role":"model","parts":[{"text":" Finance "}]}}]}"#,
            )
            .create_async()
            .await;

        let agent =
            Gemini::new("test-key", "gemini-1.5-flash").with_base_url("test-key", &server.url());
        let reply = agent.generate("classify this").await.unwrap();

        assert_eq!(reply, "Finance");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn generate_surfaces_api_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/models/gemini-1.5-flash:generateContent")
            .with_status(429)
            .with_body(r#"{"error":{"message":"quota"}}"#)
            .create_async()
            .await;

        let agent =
            Gemini::new("test-key", "gemini-1.5-flash").with_base_url("test-key", &server.url());
        let err = agent.generate("hello").await.unwrap_err();

        assert!(err.to_string().contains("Gemini API error"));
    }

    #[tokio::test]
    async fn empty_candidates_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/models/gemini-1.5-flash:generateContent")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"candidates":[]}"#)
            .create_async()
            .await;

        let agent =
            Gemini::new("test-key", "gemini-1.5-flash").with_base_url("test-key", &server.url());
        assert!(agent.generate("hello").await.is_err());
    }
}
