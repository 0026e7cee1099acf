//! Assistant reply flow and the language model client

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::{info, instrument, warn};

use super::format::to_html;
use super::history::ConversationHistory;
use crate::config::AppConfig;
use crate::credentials::{ApiKey, Credentials};
use crate::models::ChatMessage;
use crate::upstream::UpstreamClient;
use crate::{Result, TravelHubError};

pub const SYSTEM_PROMPT: &str = "You are Atlas, a friendly and knowledgeable travel planner. \
Help travellers choose destinations, plan itineraries, find places to stay and eat, \
and get practical tips on transport, budgets, seasons and local customs.

Formatting rules:
- Start sections with a short markdown heading (# Heading).
- Use bullet points (- item) for lists of places, tips or steps.
- Highlight names of places and key facts with **bold**.
- Keep answers concise: a few short paragraphs or lists, no tables and no code blocks.

Always reply in the same language the traveller writes in.";

pub const SIGNATURE: &str = "Atlas, your travel assistant";

/// Served when the model cannot be reached or answers with garbage
pub fn fallback_html() -> String {
    format!(
        "<p>I'm sorry, I couldn't reach my travel knowledge right now. \
Please try again in a moment.</p><p><em>{SIGNATURE}</em></p>"
    )
}

/// Chat completion seam, implemented by [`OpenAiChat`] and test doubles
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;
}

/// OpenAI-compatible `/chat/completions` client
pub struct OpenAiChat {
    client: Arc<UpstreamClient>,
    credentials: Credentials,
    endpoint: String,
    model: String,
    timeout: Duration,
}

impl OpenAiChat {
    pub fn new(client: Arc<UpstreamClient>, credentials: Credentials, config: &AppConfig) -> Self {
        Self {
            client,
            credentials,
            endpoint: format!(
                "{}/chat/completions",
                config.upstream.llm_base_url.trim_end_matches('/')
            ),
            model: config.upstream.llm_model.clone(),
            timeout: Duration::from_secs(config.timeouts.chat_seconds),
        }
    }
}

#[async_trait]
impl LanguageModel for OpenAiChat {
    #[instrument(skip(self, messages), fields(model = %self.model, turns = messages.len()))]
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let api_key = self.credentials.require(ApiKey::OpenAi)?;
        let headers = [("Authorization", format!("Bearer {api_key}"))];
        let body = json!({
            "model": self.model,
            "messages": messages,
            "temperature": 0.7,
        });

        let response = self
            .client
            .post_json("llm", &self.endpoint, &headers, &body, self.timeout)
            .await?;

        response
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|content| !content.is_empty())
            .map(str::to_string)
            .ok_or_else(|| TravelHubError::parse("Language model returned no message content"))
    }
}

pub struct Assistant {
    model: Arc<dyn LanguageModel>,
}

impl Assistant {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Answer a message in the context of `history`, returning HTML.
    ///
    /// A missing API key is an error. Every other model failure is answered
    /// with the fallback HTML and only the user turn is recorded.
    pub async fn reply(&self, history: &mut ConversationHistory, message: &str) -> Result<String> {
        let message = message.trim();
        if message.is_empty() {
            return Err(TravelHubError::validation("Message is required"));
        }

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(SYSTEM_PROMPT));
        messages.extend(history.window().cloned());
        messages.push(ChatMessage::user(message));

        match self.model.complete(&messages).await {
            Ok(answer) => {
                info!("Assistant answered with {} characters", answer.len());
                history.push(ChatMessage::user(message));
                history.push(ChatMessage::assistant(answer.clone()));
                Ok(to_html(&answer))
            }
            Err(e @ TravelHubError::MissingCredential { .. }) => Err(e),
            Err(e) => {
                warn!("Assistant reply failed, serving fallback: {}", e);
                history.push(ChatMessage::user(message));
                Ok(fallback_html())
            }
        }
    }
}
