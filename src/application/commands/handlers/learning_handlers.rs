//! Learning Command Handlers
//!
//! 学习目标 → LLM 级别建议 的完整流程:
//! 1. 校验学习目标，解析模型
//! 2. 创建对话并记录用户消息
//! 3. 调用 LLM，解析级别建议
//! 4. 记录助手回复
//!
//! LLM 失败时对话与用户消息保留，错误以外部服务错误返回

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::commands::ProposeLearningLevels;
use crate::application::error::ApplicationError;
use crate::application::ports::{
    ChatMessage, CompletionRequest, ConversationRecord, ConversationRepositoryPort,
    LlmEnginePort, LlmModelRepositoryPort, MessageRecord,
};
use crate::domain::conversation::{
    level_options_prompt, level_options_user_message, parse_level_options, LevelOption,
    MessageRole,
};
use crate::domain::course::LearningGoal;
use crate::domain::Title;

const CONVERSATION_TITLE_CHARS: usize = 80;

/// 级别建议结果
#[derive(Debug, Clone)]
pub struct LearningLevelsResponse {
    pub conversation: ConversationRecord,
    pub messages: Vec<MessageRecord>,
    pub options: Vec<LevelOption>,
    /// 实际使用的模型名称
    pub model: String,
}

/// ProposeLearningLevels Handler
pub struct ProposeLearningLevelsHandler {
    conversation_repo: Arc<dyn ConversationRepositoryPort>,
    model_repo: Arc<dyn LlmModelRepositoryPort>,
    llm_engine: Arc<dyn LlmEnginePort>,
    default_model: String,
}

impl ProposeLearningLevelsHandler {
    pub fn new(
        conversation_repo: Arc<dyn ConversationRepositoryPort>,
        model_repo: Arc<dyn LlmModelRepositoryPort>,
        llm_engine: Arc<dyn LlmEnginePort>,
        default_model: impl Into<String>,
    ) -> Self {
        Self {
            conversation_repo,
            model_repo,
            llm_engine,
            default_model: default_model.into(),
        }
    }

    pub async fn handle(
        &self,
        command: ProposeLearningLevels,
    ) -> Result<LearningLevelsResponse, ApplicationError> {
        let goal = LearningGoal::parse("goal", &command.goal)?;

        // 显式指定的模型必须已登记且启用
        let requested = command
            .model
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty());
        let (model_name, model_id) = match requested {
            Some(name) => {
                let model = self
                    .model_repo
                    .find_by_name(name)
                    .await?
                    .filter(|m| m.is_active)
                    .ok_or_else(|| {
                        ApplicationError::validation("model", format!("unknown model: {}", name))
                    })?;
                (model.name, Some(model.id))
            }
            None => {
                let id = self
                    .model_repo
                    .find_by_name(&self.default_model)
                    .await?
                    .map(|m| m.id);
                (self.default_model.clone(), id)
            }
        };

        let now = Utc::now();
        let conversation = ConversationRecord {
            id: Uuid::new_v4(),
            user_id: command.user_id,
            title: Title::derive_from(goal.as_str(), CONVERSATION_TITLE_CHARS).into_inner(),
            llm_model_id: model_id,
            created_at: now,
            updated_at: now,
        };
        self.conversation_repo.save(&conversation).await?;

        let user_message = MessageRecord {
            id: Uuid::new_v4(),
            conversation_id: conversation.id,
            role: MessageRole::User,
            content: goal.as_str().to_string(),
            created_at: Utc::now(),
        };
        self.conversation_repo.append_message(&user_message).await?;

        tracing::info!(
            conversation_id = %conversation.id,
            model = %model_name,
            "Requesting learning level options"
        );

        let request = CompletionRequest {
            model: model_name.clone(),
            messages: vec![
                ChatMessage::system(level_options_prompt()),
                ChatMessage::user(level_options_user_message(&goal)),
            ],
            temperature: Some(0.4),
            max_tokens: Some(800),
        };

        let completion = self.llm_engine.complete(request).await.map_err(|e| {
            tracing::error!(
                conversation_id = %conversation.id,
                error = %e,
                "LLM completion failed"
            );
            ApplicationError::from(e)
        })?;

        let options = parse_level_options(&completion.content)?;

        let assistant_message = MessageRecord {
            id: Uuid::new_v4(),
            conversation_id: conversation.id,
            role: MessageRole::Assistant,
            content: completion.content,
            created_at: Utc::now(),
        };
        self.conversation_repo
            .append_message(&assistant_message)
            .await?;

        tracing::info!(
            conversation_id = %conversation.id,
            options = options.len(),
            prompt_tokens = ?completion.prompt_tokens,
            completion_tokens = ?completion.completion_tokens,
            "Learning level options proposed"
        );

        Ok(LearningLevelsResponse {
            conversation,
            messages: vec![user_message, assistant_message],
            options,
            model: model_name,
        })
    }
}
