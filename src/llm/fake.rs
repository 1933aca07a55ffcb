//! Scripted LLM client for handler tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{ChatMessage, LlmClient, LlmError, ToolSpec};

#[derive(Default)]
pub struct FakeLlm {
    text: Option<String>,
    tools: HashMap<&'static str, serde_json::Value>,
    rate_limited: bool,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl FakeLlm {
    pub fn with_text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            ..Self::default()
        }
    }

    pub fn with_tool(name: &'static str, args: serde_json::Value) -> Self {
        let mut fake = Self::default();
        fake.tools.insert(name, args);
        fake
    }

    pub fn rate_limited() -> Self {
        Self {
            rate_limited: true,
            ..Self::default()
        }
    }

    /// Messages of every call made so far.
    pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, messages: Vec<ChatMessage>) -> Result<(), LlmError> {
        self.calls.lock().unwrap().push(messages);
        if self.rate_limited {
            return Err(LlmError::RateLimited {
                retry_after_secs: None,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl LlmClient for FakeLlm {
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, LlmError> {
        self.record(messages)?;
        self.text
            .clone()
            .ok_or_else(|| LlmError::Parse("no scripted text".into()))
    }

    async fn call_tool(
        &self,
        messages: Vec<ChatMessage>,
        tool: &ToolSpec,
    ) -> Result<serde_json::Value, LlmError> {
        self.record(messages)?;
        self.tools
            .get(tool.name)
            .cloned()
            .ok_or_else(|| LlmError::Parse(format!("no scripted tool {}", tool.name)))
    }
}
