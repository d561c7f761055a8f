//! Chapter HTTP Handlers

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::{
    CreateQuiz, DeleteChapter, GetChapter, ListQuizzes, QuestionInput, UpdateChapter,
};
use crate::infrastructure::http::dto::{
    ChapterResponse, CreateQuizRequest, QuizDetailResponse, QuizResponse, UpdateChapterRequest,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::{ApiJson, ApiPath, CurrentUser};
use crate::infrastructure::http::state::AppState;

/// 获取章节
#[utoipa::path(
    get,
    path = "/api/chapters/{id}",
    tag = "chapters",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Chapter id")),
    responses(
        (status = 200, description = "Chapter", body = ChapterResponse),
        (status = 403, description = "Owned by another user", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn get_chapter(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ChapterResponse>, ApiError> {
    let chapter = state
        .get_chapter_handler
        .handle(GetChapter {
            user_id: user.user_id,
            chapter_id: id,
        })
        .await?;
    Ok(Json(chapter.into()))
}

/// 更新章节
#[utoipa::path(
    put,
    path = "/api/chapters/{id}",
    tag = "chapters",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Chapter id")),
    request_body = UpdateChapterRequest,
    responses(
        (status = 200, description = "Chapter updated", body = ChapterResponse),
        (status = 400, description = "Invalid request data", body = ErrorBody),
        (status = 409, description = "Position already taken", body = ErrorBody)
    )
)]
pub async fn update_chapter(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateChapterRequest>,
) -> Result<Json<ChapterResponse>, ApiError> {
    let chapter = state
        .update_chapter_handler
        .handle(UpdateChapter {
            user_id: user.user_id,
            chapter_id: id,
            title: req.title,
            content: req.content,
            position: req.position,
        })
        .await?;
    Ok(Json(chapter.into()))
}

/// 删除章节
#[utoipa::path(
    delete,
    path = "/api/chapters/{id}",
    tag = "chapters",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Chapter id")),
    responses(
        (status = 204, description = "Chapter deleted"),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn delete_chapter(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state
        .delete_chapter_handler
        .handle(DeleteChapter {
            user_id: user.user_id,
            chapter_id: id,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// 列出章节下的测验
#[utoipa::path(
    get,
    path = "/api/chapters/{id}/quizzes",
    tag = "chapters",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Chapter id")),
    responses(
        (status = 200, description = "Quizzes", body = [QuizResponse]),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn list_quizzes(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Vec<QuizResponse>>, ApiError> {
    let quizzes = state
        .list_quizzes_handler
        .handle(ListQuizzes {
            user_id: user.user_id,
            chapter_id: id,
        })
        .await?;
    Ok(Json(quizzes.into_iter().map(Into::into).collect()))
}

/// 创建测验（测验与题目在同一事务中写入）
#[utoipa::path(
    post,
    path = "/api/chapters/{id}/quizzes",
    tag = "chapters",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Chapter id")),
    request_body = CreateQuizRequest,
    responses(
        (status = 201, description = "Quiz created", body = QuizDetailResponse),
        (status = 400, description = "Invalid request data", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn create_quiz(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<CreateQuizRequest>,
) -> Result<(StatusCode, Json<QuizDetailResponse>), ApiError> {
    let questions = req
        .questions
        .into_iter()
        .map(|q| QuestionInput {
            prompt: q.prompt,
            options: q.options,
            correct_option: q.correct_option,
            explanation: q.explanation,
        })
        .collect();

    let detail = state
        .create_quiz_handler
        .handle(CreateQuiz {
            user_id: user.user_id,
            chapter_id: id,
            title: req.title,
            questions,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(detail.into())))
}
