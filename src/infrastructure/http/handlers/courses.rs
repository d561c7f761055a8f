//! Course HTTP Handlers

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::{
    CreateChapter, CreateCourse, DeleteCourse, GetCourse, ListCourses, UpdateCourse,
};
use crate::infrastructure::http::dto::{
    ChapterResponse, CourseDetailResponse, CourseResponse, CreateChapterRequest,
    CreateCourseRequest, UpdateCourseRequest,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::{ApiJson, ApiPath, CurrentUser};
use crate::infrastructure::http::state::AppState;

/// 列出当前用户的课程
#[utoipa::path(
    get,
    path = "/api/courses",
    tag = "courses",
    security(("bearer" = [])),
    responses((status = 200, description = "Courses, newest first", body = [CourseResponse]))
)]
pub async fn list_courses(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<CourseResponse>>, ApiError> {
    let courses = state
        .list_courses_handler
        .handle(ListCourses {
            user_id: user.user_id,
        })
        .await?;
    Ok(Json(courses.into_iter().map(Into::into).collect()))
}

/// 创建课程
#[utoipa::path(
    post,
    path = "/api/courses",
    tag = "courses",
    security(("bearer" = [])),
    request_body = CreateCourseRequest,
    responses(
        (status = 201, description = "Course created", body = CourseResponse),
        (status = 400, description = "Invalid request data", body = ErrorBody),
        (status = 403, description = "Linked conversation owned by another user", body = ErrorBody)
    )
)]
pub async fn create_course(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiJson(req): ApiJson<CreateCourseRequest>,
) -> Result<(StatusCode, Json<CourseResponse>), ApiError> {
    let course = state
        .create_course_handler
        .handle(CreateCourse {
            user_id: user.user_id,
            conversation_id: req.conversation_id,
            title: req.title,
            description: req.description,
            learning_goal: req.learning_goal,
            level: req.level,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(course.into())))
}

/// 获取课程及章节
#[utoipa::path(
    get,
    path = "/api/courses/{id}",
    tag = "courses",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Course id")),
    responses(
        (status = 200, description = "Course with chapters", body = CourseDetailResponse),
        (status = 403, description = "Owned by another user", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn get_course(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<CourseDetailResponse>, ApiError> {
    let detail = state
        .get_course_handler
        .handle(GetCourse {
            user_id: user.user_id,
            course_id: id,
        })
        .await?;
    Ok(Json(detail.into()))
}

/// 更新课程
#[utoipa::path(
    put,
    path = "/api/courses/{id}",
    tag = "courses",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Course id")),
    request_body = UpdateCourseRequest,
    responses(
        (status = 200, description = "Course updated", body = CourseResponse),
        (status = 400, description = "Invalid request data", body = ErrorBody),
        (status = 403, description = "Owned by another user", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn update_course(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateCourseRequest>,
) -> Result<Json<CourseResponse>, ApiError> {
    let course = state
        .update_course_handler
        .handle(UpdateCourse {
            user_id: user.user_id,
            course_id: id,
            title: req.title,
            description: req.description,
            level: req.level,
        })
        .await?;
    Ok(Json(course.into()))
}

/// 删除课程（章节、测验一并删除）
#[utoipa::path(
    delete,
    path = "/api/courses/{id}",
    tag = "courses",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Course id")),
    responses(
        (status = 204, description = "Course deleted"),
        (status = 403, description = "Owned by another user", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn delete_course(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state
        .delete_course_handler
        .handle(DeleteCourse {
            user_id: user.user_id,
            course_id: id,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// 列出课程章节（按 position 排序）
#[utoipa::path(
    get,
    path = "/api/courses/{id}/chapters",
    tag = "courses",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Course id")),
    responses(
        (status = 200, description = "Chapters ordered by position", body = [ChapterResponse]),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn list_chapters(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Vec<ChapterResponse>>, ApiError> {
    let detail = state
        .get_course_handler
        .handle(GetCourse {
            user_id: user.user_id,
            course_id: id,
        })
        .await?;
    Ok(Json(detail.chapters.into_iter().map(Into::into).collect()))
}

/// 创建章节
#[utoipa::path(
    post,
    path = "/api/courses/{id}/chapters",
    tag = "courses",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Course id")),
    request_body = CreateChapterRequest,
    responses(
        (status = 201, description = "Chapter created", body = ChapterResponse),
        (status = 400, description = "Invalid request data", body = ErrorBody),
        (status = 409, description = "Position already taken", body = ErrorBody)
    )
)]
pub async fn create_chapter(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<CreateChapterRequest>,
) -> Result<(StatusCode, Json<ChapterResponse>), ApiError> {
    let chapter = state
        .create_chapter_handler
        .handle(CreateChapter {
            user_id: user.user_id,
            course_id: id,
            title: req.title,
            content: req.content,
            position: req.position,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(chapter.into())))
}
