//! Learning HTTP Handlers

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::application::ProposeLearningLevels;
use crate::infrastructure::http::dto::{LearningLevelsResponseDto, ProposeLevelsRequest};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::{ApiJson, CurrentUser};
use crate::infrastructure::http::state::AppState;

/// 提交学习目标，获取 LLM 建议的学习级别
///
/// 同时创建一个记录本次交互的对话
#[utoipa::path(
    post,
    path = "/api/learning/levels",
    tag = "learning",
    security(("bearer" = [])),
    request_body = ProposeLevelsRequest,
    responses(
        (status = 201, description = "Level options proposed", body = LearningLevelsResponseDto),
        (status = 400, description = "Invalid request data", body = ErrorBody),
        (status = 502, description = "LLM failed or returned malformed output", body = ErrorBody)
    )
)]
pub async fn propose_levels(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiJson(req): ApiJson<ProposeLevelsRequest>,
) -> Result<(StatusCode, Json<LearningLevelsResponseDto>), ApiError> {
    let response = state
        .propose_levels_handler
        .handle(ProposeLearningLevels {
            user_id: user.user_id,
            goal: req.goal,
            model: req.model,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(response.into())))
}
