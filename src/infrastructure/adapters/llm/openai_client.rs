//! OpenAI-compatible Client - 调用 chat completions 接口
//!
//! 实现 LlmEnginePort trait，适用于 OpenAI 以及兼容其协议的服务
//!
//! API:
//! POST {base_url}/chat/completions
//! Request: {"model": "...", "messages": [{"role": "...", "content": "..."}]}
//! Response: {"model": "...", "choices": [{"message": {"content": "..."}}], "usage": {...}}

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::{
    CompletionRequest, CompletionResponse, LlmEnginePort, LlmError,
};

/// 请求体
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// 响应体（只解析需要的字段）
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: Option<u32>,
    completion_tokens: Option<u32>,
}

/// OpenAI 客户端配置
#[derive(Debug, Clone)]
pub struct OpenAiClientConfig {
    /// API 基础 URL，例如 https://api.openai.com/v1
    pub base_url: String,
    pub api_key: Option<String>,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for OpenAiClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            timeout_secs: 60,
        }
    }
}

impl OpenAiClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|k| !k.trim().is_empty());
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// OpenAI 兼容客户端
pub struct OpenAiClient {
    client: Client,
    config: OpenAiClientConfig,
}

impl OpenAiClient {
    pub fn new(config: OpenAiClientConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn models_url(&self) -> String {
        format!("{}/models", self.config.base_url.trim_end_matches('/'))
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }
}

fn map_send_error(e: reqwest::Error) -> LlmError {
    if e.is_timeout() {
        LlmError::Timeout
    } else if e.is_connect() {
        LlmError::NetworkError(format!("Cannot connect to LLM service: {}", e))
    } else {
        LlmError::NetworkError(e.to_string())
    }
}

#[async_trait]
impl LlmEnginePort for OpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = ChatCompletionRequest {
            model: &request.model,
            messages: request
                .messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        tracing::debug!(
            url = %self.completions_url(),
            model = %request.model,
            messages = body.messages.len(),
            "Sending chat completion request"
        );

        let response = self
            .authorized(self.client.post(self.completions_url()))
            .json(&body)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| LlmError::InvalidResponse("response has no content".to_string()))?;

        let usage = parsed.usage;
        Ok(CompletionResponse {
            content,
            model: parsed.model.unwrap_or(request.model),
            prompt_tokens: usage.as_ref().and_then(|u| u.prompt_tokens),
            completion_tokens: usage.as_ref().and_then(|u| u.completion_tokens),
        })
    }

    async fn health_check(&self) -> bool {
        match self
            .authorized(self.client.get(self.models_url()))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::ChatMessage;

    #[test]
    fn test_request_serialization_skips_unset_fields() {
        let messages = [ChatMessage::system("be brief"), ChatMessage::user("hi")];
        let body = ChatCompletionRequest {
            model: "gpt-4o-mini",
            messages: messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            temperature: None,
            max_tokens: Some(10),
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hi");
        assert_eq!(json["max_tokens"], 10);
        assert!(json.get("temperature").is_none());
    }

    #[test]
    fn test_response_parsing_tolerates_missing_usage() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"ok"}}]}"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(raw).unwrap();
        assert!(parsed.usage.is_none());
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("ok"));
    }

    #[test]
    fn test_completions_url_trims_trailing_slash() {
        let client =
            OpenAiClient::new(OpenAiClientConfig::new("http://localhost:11434/v1/")).unwrap();
        assert_eq!(
            client.completions_url(),
            "http://localhost:11434/v1/chat/completions"
        );
    }

    #[tokio::test]
    async fn test_unreachable_service_is_network_error() {
        let client = OpenAiClient::new(
            OpenAiClientConfig::new("http://127.0.0.1:1").with_timeout(2),
        )
        .unwrap();
        let result = client
            .complete(CompletionRequest {
                model: "m".into(),
                messages: vec![ChatMessage::user("hi")],
                temperature: None,
                max_tokens: None,
            })
            .await;
        assert!(matches!(
            result,
            Err(LlmError::NetworkError(_)) | Err(LlmError::Timeout)
        ));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_unhealthy() {
        let client = OpenAiClient::new(
            OpenAiClientConfig::new("http://127.0.0.1:1/v1/").with_timeout(2),
        )
        .unwrap();
        assert_eq!(client.models_url(), "http://127.0.0.1:1/v1/models");
        assert!(!client.health_check().await);
    }
}
