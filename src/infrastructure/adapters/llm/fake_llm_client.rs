//! Fake LLM Client - 本地运行与测试使用的 LLM 客户端
//!
//! 不访问网络，根据最后一条用户消息生成固定格式的级别建议

use async_trait::async_trait;

use crate::application::ports::{
    CompletionRequest, CompletionResponse, LlmEnginePort, LlmError,
};
use crate::domain::conversation::MessageRole;

/// Fake LLM 行为
#[derive(Debug, Clone, Default)]
enum FakeBehavior {
    /// 为三个级别生成建议
    #[default]
    Levels,
    /// 原样返回给定文本
    Reply(String),
    /// 始终返回服务错误
    Fail,
}

/// Fake LLM Client
#[derive(Debug, Clone, Default)]
pub struct FakeLlmClient {
    behavior: FakeBehavior,
}

impl FakeLlmClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// 始终返回指定文本
    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self {
            behavior: FakeBehavior::Reply(reply.into()),
        }
    }

    /// 始终失败
    pub fn failing() -> Self {
        Self {
            behavior: FakeBehavior::Fail,
        }
    }
}

fn levels_reply(subject: &str) -> String {
    serde_json::json!({
        "levels": [
            {
                "level": "beginner",
                "title": format!("{} fundamentals", subject),
                "description": "Core vocabulary and first hands-on exercises.",
            },
            {
                "level": "intermediate",
                "title": format!("Practical {}", subject),
                "description": "Build small projects and learn the common patterns.",
            },
            {
                "level": "advanced",
                "title": format!("{} in depth", subject),
                "description": "Internals, trade-offs and production concerns.",
            },
        ]
    })
    .to_string()
}

#[async_trait]
impl LlmEnginePort for FakeLlmClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let content = match &self.behavior {
            FakeBehavior::Levels => {
                let subject = request
                    .messages
                    .iter()
                    .rev()
                    .find(|m| m.role == MessageRole::User)
                    .map(|m| {
                        m.content
                            .strip_prefix("My learning goal:")
                            .unwrap_or(&m.content)
                            .trim()
                            .to_string()
                    })
                    .unwrap_or_else(|| "the topic".to_string());
                levels_reply(&subject)
            }
            FakeBehavior::Reply(reply) => reply.clone(),
            FakeBehavior::Fail => {
                return Err(LlmError::ServiceError("fake LLM failure".to_string()));
            }
        };

        tracing::debug!(model = %request.model, "FakeLlmClient completion");

        Ok(CompletionResponse {
            content,
            model: request.model,
            prompt_tokens: None,
            completion_tokens: None,
        })
    }

    async fn health_check(&self) -> bool {
        !matches!(self.behavior, FakeBehavior::Fail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::ChatMessage;
    use crate::domain::conversation::parse_level_options;
    use crate::domain::course::LearningLevel;

    fn request(goal: &str) -> CompletionRequest {
        CompletionRequest {
            model: "fake".into(),
            messages: vec![
                ChatMessage::system("prompt"),
                ChatMessage::user(format!("My learning goal: {}", goal)),
            ],
            temperature: None,
            max_tokens: None,
        }
    }

    #[tokio::test]
    async fn test_default_reply_parses_as_level_options() {
        let response = FakeLlmClient::new().complete(request("Rust")).await.unwrap();
        let options = parse_level_options(&response.content).unwrap();
        assert_eq!(options.len(), 3);
        assert_eq!(options[0].level, LearningLevel::Beginner);
        assert_eq!(options[0].title, "Rust fundamentals");
    }

    #[tokio::test]
    async fn test_failing_client() {
        let result = FakeLlmClient::failing().complete(request("Rust")).await;
        assert!(matches!(result, Err(LlmError::ServiceError(_))));
        assert!(!FakeLlmClient::failing().health_check().await);
        assert!(FakeLlmClient::new().health_check().await);
    }
}
