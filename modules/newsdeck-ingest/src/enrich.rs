//! AI enrichment over the generative backend.
//!
//! Four stateless operations, one backend call each, no internal retry. A
//! backend failure never reaches the caller: each operation logs the reason
//! and returns its documented fallback, so the pipeline proceeds with
//! degraded rather than missing metadata.

use std::sync::Arc;

use ai_client::{Message, MessageRole, TextGenerator};
use tracing::warn;

use newsdeck_common::{ImpactLevel, Sector};

/// Fallback when executive-summary generation fails.
pub const SUMMARY_UNAVAILABLE: &str = "Summary generation unavailable.";

/// Fallback for the conversational summarize operation.
pub const PLAIN_SUMMARY_UNAVAILABLE: &str = "Summary unavailable.";

/// Fallback chat reply.
pub const CHAT_UNAVAILABLE: &str =
    "I apologize, but I'm having trouble processing your request right now.";

#[derive(Clone)]
pub struct EnrichmentClient {
    agent: Arc<dyn TextGenerator>,
}

impl EnrichmentClient {
    pub fn new(agent: Arc<dyn TextGenerator>) -> Self {
        Self { agent }
    }

    /// Classify a news item into one sector. Fallback: General.
    pub async fn classify_sector(&self, title: &str, summary: Option<&str>) -> Sector {
        let prompt = format!(
            "Classify the following news into EXACTLY ONE of these sectors: \
             Health, Engineering, Finance, Education, Legal, General.\n\n\
             Title: {title}\n\
             Summary: {}\n\n\
             Return only the sector name.",
            summary.unwrap_or("")
        );

        match self.agent.generate(&prompt).await {
            // Lenient parse: an off-script label also lands on General.
            Ok(reply) => reply.parse().unwrap_or(Sector::General),
            Err(e) => {
                warn!(error = %e, "Sector classification failed, falling back to General");
                Sector::General
            }
        }
    }

    /// Three-bullet executive summary (TL;DR) of the given text.
    pub async fn executive_summary(&self, text: &str) -> String {
        let prompt = format!(
            "Provide a concise executive summary (TL;DR) of the following text \
             in exactly 3 bullet points:\n\n{text}"
        );

        match self.agent.generate(&prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "Executive summary failed");
                SUMMARY_UNAVAILABLE.to_string()
            }
        }
    }

    /// Detect whether an item is breaking news. Fallback: Medium.
    pub async fn detect_impact(&self, title: &str, summary: &str) -> ImpactLevel {
        let prompt = format!(
            "Detect if this news is 'Breaking News' or 'Normal'. \
             Title: {title}. Summary: {summary}. Return only the label."
        );

        match self.agent.generate(&prompt).await {
            Ok(reply) if reply.contains("Breaking") => ImpactLevel::High,
            Ok(_) => ImpactLevel::Medium,
            Err(e) => {
                warn!(error = %e, "Impact detection failed, falling back to Medium");
                ImpactLevel::Medium
            }
        }
    }

    /// Conversational 2-3 sentence summary for caller-supplied text.
    pub async fn summarize(&self, text: &str) -> String {
        let prompt = format!(
            "Provide a clear, concise summary of the following text in 2-3 \
             sentences:\n\n{text}\n\nBe conversational and helpful."
        );

        match self.agent.generate(&prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "Summarize failed");
                PLAIN_SUMMARY_UNAVAILABLE.to_string()
            }
        }
    }

    /// Chat over prior turns plus free-text context, reconstructed as a
    /// single linear prompt with turn order preserved.
    pub async fn chat(&self, history: &[Message], message: &str, context: &str) -> String {
        let prompt = build_chat_prompt(history, message, context);

        match self.agent.generate(&prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "Chat failed");
                CHAT_UNAVAILABLE.to_string()
            }
        }
    }
}

fn build_chat_prompt(history: &[Message], message: &str, context: &str) -> String {
    let mut parts = vec![format!(
        "You are an expert AI news assistant. {context} Keep answers concise \
         and relevant to the article discussed."
    )];

    for turn in history {
        let role = match turn.role {
            MessageRole::User => "user",
            MessageRole::Assistant => "model",
        };
        parts.push(format!("{role}: {}", turn.content));
    }

    parts.push(format!("user: {message}"));
    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FailingGenerator, ScriptedGenerator};

    fn client_with(agent: impl TextGenerator + 'static) -> EnrichmentClient {
        EnrichmentClient::new(Arc::new(agent))
    }

    #[tokio::test]
    async fn classify_parses_model_reply() {
        let agent = ScriptedGenerator::new().on("Classify", "Finance");
        let sector = client_with(agent).classify_sector("Fed cuts rates", None).await;
        assert_eq!(sector, Sector::Finance);
    }

    #[tokio::test]
    async fn classify_falls_back_to_general_on_error() {
        let sector = client_with(FailingGenerator)
            .classify_sector("Fed cuts rates", Some("markets"))
            .await;
        assert_eq!(sector, Sector::General);
    }

    #[tokio::test]
    async fn off_script_label_lands_on_general() {
        let agent = ScriptedGenerator::new().on("Classify", "Sports");
        let sector = client_with(agent).classify_sector("Cup final tonight", None).await;
        assert_eq!(sector, Sector::General);
    }

    #[tokio::test]
    async fn impact_maps_breaking_marker_to_high() {
        let agent = ScriptedGenerator::new().on("Detect", "Breaking News");
        let impact = client_with(agent).detect_impact("Major outage", "").await;
        assert_eq!(impact, ImpactLevel::High);
    }

    #[tokio::test]
    async fn impact_falls_back_to_medium_on_error() {
        let impact = client_with(FailingGenerator).detect_impact("Major outage", "").await;
        assert_eq!(impact, ImpactLevel::Medium);
    }

    #[tokio::test]
    async fn summary_falls_back_to_fixed_string() {
        let summary = client_with(FailingGenerator).executive_summary("long text").await;
        assert_eq!(summary, SUMMARY_UNAVAILABLE);
    }

    #[tokio::test]
    async fn chat_falls_back_to_apology() {
        let reply = client_with(FailingGenerator)
            .chat(&[], "what happened?", "")
            .await;
        assert_eq!(reply, CHAT_UNAVAILABLE);
    }

    #[test]
    fn chat_prompt_preserves_turn_order() {
        let history = vec![
            Message::user("what is this article about?"),
            Message::assistant("It covers the GPT-5 launch."),
            Message::user("who announced it?"),
        ];

        let prompt = build_chat_prompt(&history, "when?", "Article: GPT-5 launch.");

        let user_1 = prompt.find("user: what is this article about?").unwrap();
        let model = prompt.find("model: It covers the GPT-5 launch.").unwrap();
        let user_2 = prompt.find("user: who announced it?").unwrap();
        let last = prompt.find("user: when?").unwrap();
        assert!(user_1 < model && model < user_2 && user_2 < last);
        assert!(prompt.contains("Article: GPT-5 launch."));
    }
}
