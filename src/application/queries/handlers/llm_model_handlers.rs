//! LLM Model Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{LlmModelRecord, LlmModelRepositoryPort};
use crate::application::queries::ListLlmModels;

/// ListLlmModels Handler
pub struct ListLlmModelsHandler {
    model_repo: Arc<dyn LlmModelRepositoryPort>,
}

impl ListLlmModelsHandler {
    pub fn new(model_repo: Arc<dyn LlmModelRepositoryPort>) -> Self {
        Self { model_repo }
    }

    pub async fn handle(&self, _query: ListLlmModels) -> Result<Vec<LlmModelRecord>, ApplicationError> {
        Ok(self.model_repo.find_active().await?)
    }
}
