//! LLM Model HTTP Handlers

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::application::{CreateLlmModel, ListLlmModels};
use crate::infrastructure::http::dto::{CreateLlmModelRequest, LlmModelResponse};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::ApiJson;
use crate::infrastructure::http::state::AppState;

/// 列出启用的模型
#[utoipa::path(
    get,
    path = "/api/models",
    tag = "models",
    security(("bearer" = [])),
    responses((status = 200, description = "Active models", body = [LlmModelResponse]))
)]
pub async fn list_models(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<LlmModelResponse>>, ApiError> {
    let models = state.list_models_handler.handle(ListLlmModels).await?;
    Ok(Json(models.into_iter().map(Into::into).collect()))
}

/// 登记新模型
#[utoipa::path(
    post,
    path = "/api/models",
    tag = "models",
    security(("bearer" = [])),
    request_body = CreateLlmModelRequest,
    responses(
        (status = 201, description = "Model registered", body = LlmModelResponse),
        (status = 400, description = "Invalid request data", body = ErrorBody),
        (status = 409, description = "Model name already exists", body = ErrorBody)
    )
)]
pub async fn create_model(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateLlmModelRequest>,
) -> Result<(StatusCode, Json<LlmModelResponse>), ApiError> {
    let model = state
        .create_llm_model_handler
        .handle(CreateLlmModel {
            name: req.name,
            provider: req.provider,
            description: req.description,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(model.into())))
}
