//! LLM Model Command Handlers

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::commands::{CreateLlmModel, EnsureLlmModel};
use crate::application::error::ApplicationError;
use crate::application::ports::{LlmModelRecord, LlmModelRepositoryPort};
use crate::domain::optional_text;

const MAX_MODEL_NAME_CHARS: usize = 100;

fn validate_name(field: &str, raw: &str) -> Result<String, ApplicationError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ApplicationError::validation(field, "must not be empty"));
    }
    if name.chars().count() > MAX_MODEL_NAME_CHARS {
        return Err(ApplicationError::validation(
            field,
            format!("must be at most {} characters", MAX_MODEL_NAME_CHARS),
        ));
    }
    Ok(name.to_string())
}

// ============================================================================
// EnsureLlmModel
// ============================================================================

/// EnsureLlmModel Handler
pub struct EnsureLlmModelHandler {
    model_repo: Arc<dyn LlmModelRepositoryPort>,
}

impl EnsureLlmModelHandler {
    pub fn new(model_repo: Arc<dyn LlmModelRepositoryPort>) -> Self {
        Self { model_repo }
    }

    pub async fn handle(&self, command: EnsureLlmModel) -> Result<LlmModelRecord, ApplicationError> {
        let name = validate_name("name", &command.name)?;
        if let Some(existing) = self.model_repo.find_by_name(&name).await? {
            return Ok(existing);
        }

        let model = LlmModelRecord {
            id: Uuid::new_v4(),
            name,
            provider: command.provider,
            description: Some("Default model".to_string()),
            is_active: true,
            created_at: Utc::now(),
        };
        self.model_repo.save(&model).await?;

        tracing::info!(model = %model.name, provider = %model.provider, "Default LLM model registered");

        Ok(model)
    }
}

// ============================================================================
// CreateLlmModel
// ============================================================================

/// CreateLlmModel Handler
pub struct CreateLlmModelHandler {
    model_repo: Arc<dyn LlmModelRepositoryPort>,
}

impl CreateLlmModelHandler {
    pub fn new(model_repo: Arc<dyn LlmModelRepositoryPort>) -> Self {
        Self { model_repo }
    }

    pub async fn handle(&self, command: CreateLlmModel) -> Result<LlmModelRecord, ApplicationError> {
        let name = validate_name("name", &command.name)?;
        let provider = validate_name("provider", &command.provider)?;
        let description = optional_text("description", command.description.as_deref(), 500)?;

        let model = LlmModelRecord {
            id: Uuid::new_v4(),
            name,
            provider,
            description,
            is_active: true,
            created_at: Utc::now(),
        };

        // name 唯一，重复时由数据库约束报告冲突
        self.model_repo.save(&model).await?;

        tracing::info!(model_id = %model.id, model = %model.name, "LLM model created");

        Ok(model)
    }
}
