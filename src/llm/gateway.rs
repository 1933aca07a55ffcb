use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error, instrument, warn};

use super::{ChatMessage, LlmClient, LlmError, ToolSpec};
use crate::config::LlmConfig;

/// OpenAI-compatible `/chat/completions` client.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    api_key: Option<String>,
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl GatewayClient {
    pub fn new(cfg: &LlmConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;
        Ok(Self {
            api_key: cfg.api_key.clone(),
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            model: cfg.model.clone(),
            client,
        })
    }

    async fn send(&self, body: &CompletionRequest<'_>) -> Result<CompletionResponse, LlmError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(LlmError::NotConfigured("LLM_API_KEY"))?;

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| LlmError::RequestFailed(e.to_string()))?;

        let status = response.status().as_u16();
        if status == 429 {
            let retry_after_secs = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            warn!(?retry_after_secs, "llm gateway rate limited");
            return Err(LlmError::RateLimited { retry_after_secs });
        }
        if status == 402 {
            warn!("llm gateway requires payment");
            return Err(LlmError::PaymentRequired);
        }

        let text = response
            .text()
            .await
            .map_err(|e| LlmError::RequestFailed(e.to_string()))?;

        if !(200..300).contains(&status) {
            error!(status, body = %text, "llm gateway error");
            return Err(LlmError::Api {
                status,
                message: text,
            });
        }

        serde_json::from_str(&text).map_err(|e| LlmError::Parse(e.to_string()))
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<ToolCall>,
}

#[derive(Debug, Deserialize)]
struct ToolCall {
    function: FunctionCall,
}

#[derive(Debug, Deserialize)]
struct FunctionCall {
    name: String,
    arguments: String,
}

#[async_trait]
impl LlmClient for GatewayClient {
    #[instrument(skip(self, messages), fields(model = %self.model))]
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, LlmError> {
        let body = CompletionRequest {
            model: &self.model,
            messages: &messages,
            tools: None,
            tool_choice: None,
        };
        let response = self.send(&body).await?;
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| LlmError::Parse("no content in response".into()))?;
        debug!(len = content.len(), "llm completion received");
        Ok(content)
    }

    #[instrument(skip(self, messages, tool), fields(model = %self.model, tool = tool.name))]
    async fn call_tool(
        &self,
        messages: Vec<ChatMessage>,
        tool: &ToolSpec,
    ) -> Result<serde_json::Value, LlmError> {
        let body = CompletionRequest {
            model: &self.model,
            messages: &messages,
            tools: Some(json!([{
                "type": "function",
                "function": {
                    "name": tool.name,
                    "description": tool.description,
                    "parameters": tool.parameters,
                }
            }])),
            tool_choice: Some(json!({ "type": "function", "function": { "name": tool.name } })),
        };
        let response = self.send(&body).await?;
        let call = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.tool_calls.into_iter().next())
            .ok_or_else(|| LlmError::Parse("no tool call in response".into()))?;

        if call.function.name != tool.name {
            return Err(LlmError::Parse(format!(
                "unexpected tool call {}",
                call.function.name
            )));
        }

        debug!("llm tool call received");
        serde_json::from_str(&call.function.arguments).map_err(|e| LlmError::Parse(e.to_string()))
    }
}
