//! Chat-completions client used by the taste profile, analysis,
//! recommendation and recipe endpoints.
//!
//! The [`LlmClient`] trait is what handlers depend on; [`GatewayClient`]
//! talks to an OpenAI-compatible gateway over HTTP.

#[cfg(test)]
pub mod fake;
mod gateway;

pub use gateway::GatewayClient;

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM request failed: {0}")]
    RequestFailed(String),

    #[error("LLM API returned error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse LLM response: {0}")]
    Parse(String),

    #[error("Rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("LLM credits exhausted")]
    PaymentRequired,

    #[error("{0} is not configured")]
    NotConfigured(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One piece of a multi-part user message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn image(url: impl Into<String>) -> Self {
        Self::ImageUrl {
            image_url: ImageUrl { url: url.into() },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: MessageContent::Text(content.into()),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text(content.into()),
        }
    }

    pub fn user_parts(parts: Vec<ContentPart>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Parts(parts),
        }
    }
}

/// A function tool the model is forced to call. `parameters` is a JSON schema.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: serde_json::Value,
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Plain completion; returns the assistant text.
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, LlmError>;

    /// Forces a call to `tool` and returns its parsed arguments.
    async fn call_tool(
        &self,
        messages: Vec<ChatMessage>,
        tool: &ToolSpec,
    ) -> Result<serde_json::Value, LlmError>;
}

/// Returns the body of the first ```json fenced block, or the trimmed text.
pub fn extract_json_block(text: &str) -> &str {
    lazy_static! {
        static ref FENCE_RE: Regex = Regex::new(r"```json\s*([\s\S]*?)\s*```").unwrap();
    }
    FENCE_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or_else(|| text.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_json_block_prefers_fenced_body() {
        let text = "Here you go:\n```json\n{\"recipes\": []}\n```\nEnjoy!";
        assert_eq!(extract_json_block(text), "{\"recipes\": []}");
    }

    #[test]
    fn extract_json_block_falls_back_to_trimmed_text() {
        assert_eq!(extract_json_block("  {\"a\":1}\n"), "{\"a\":1}");
    }

    #[test]
    fn multipart_message_serializes_openai_shape() {
        let msg = ChatMessage::user_parts(vec![
            ContentPart::text("look"),
            ContentPart::image("data:image/jpeg;base64,AAAA"),
        ]);
        let v = serde_json::to_value(&msg).unwrap();
        assert_eq!(v["role"], "user");
        assert_eq!(v["content"][0]["type"], "text");
        assert_eq!(v["content"][1]["type"], "image_url");
        assert_eq!(v["content"][1]["image_url"]["url"], "data:image/jpeg;base64,AAAA");
    }

    #[test]
    fn text_message_serializes_as_string() {
        let v = serde_json::to_value(ChatMessage::system("be nice")).unwrap();
        assert_eq!(v["role"], "system");
        assert_eq!(v["content"], "be nice");
    }
}
