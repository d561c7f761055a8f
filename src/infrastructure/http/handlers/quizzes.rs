//! Quiz HTTP Handlers

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::{
    DeleteQuiz, GetQuiz, ListQuizAttempts, ResponseInput, SubmitQuizAttempt,
};
use crate::infrastructure::http::dto::{AttemptResponse, QuizDetailResponse, SubmitAttemptRequest};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::{ApiJson, ApiPath, CurrentUser};
use crate::infrastructure::http::state::AppState;

/// 获取测验（题目不含答案）
#[utoipa::path(
    get,
    path = "/api/quizzes/{id}",
    tag = "quizzes",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Quiz id")),
    responses(
        (status = 200, description = "Quiz with questions", body = QuizDetailResponse),
        (status = 403, description = "Owned by another user", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn get_quiz(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<QuizDetailResponse>, ApiError> {
    let detail = state
        .get_quiz_handler
        .handle(GetQuiz {
            user_id: user.user_id,
            quiz_id: id,
        })
        .await?;
    Ok(Json(detail.into()))
}

/// 删除测验
#[utoipa::path(
    delete,
    path = "/api/quizzes/{id}",
    tag = "quizzes",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Quiz id")),
    responses(
        (status = 204, description = "Quiz deleted"),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn delete_quiz(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state
        .delete_quiz_handler
        .handle(DeleteQuiz {
            user_id: user.user_id,
            quiz_id: id,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// 当前用户在该测验上的作答记录
#[utoipa::path(
    get,
    path = "/api/quizzes/{id}/attempts",
    tag = "quizzes",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Quiz id")),
    responses(
        (status = 200, description = "Attempts, newest first", body = [AttemptResponse]),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn list_attempts(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Vec<AttemptResponse>>, ApiError> {
    let attempts = state
        .list_attempts_handler
        .handle(ListQuizAttempts {
            user_id: user.user_id,
            quiz_id: id,
        })
        .await?;
    Ok(Json(attempts.into_iter().map(Into::into).collect()))
}

/// 提交作答并评分
#[utoipa::path(
    post,
    path = "/api/quizzes/{id}/attempts",
    tag = "quizzes",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Quiz id")),
    request_body = SubmitAttemptRequest,
    responses(
        (status = 201, description = "Attempt scored", body = AttemptResponse),
        (status = 400, description = "Unknown or duplicate question, option out of range", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn submit_attempt(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<SubmitAttemptRequest>,
) -> Result<(StatusCode, Json<AttemptResponse>), ApiError> {
    let responses = req
        .responses
        .into_iter()
        .map(|r| ResponseInput {
            question_id: r.question_id,
            selected_option: r.selected_option,
        })
        .collect();

    let detail = state
        .submit_attempt_handler
        .handle(SubmitQuizAttempt {
            user_id: user.user_id,
            quiz_id: id,
            responses,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(detail.into())))
}
