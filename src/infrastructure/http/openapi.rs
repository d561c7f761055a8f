//! OpenAPI 文档
//!
//! Swagger UI: /api/docs，文档 JSON: /api/docs/openapi.json

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use super::dto;
use super::error::ErrorBody;
use super::handlers;

#[derive(OpenApi)]
#[openapi(
    info(title = "Coursely API", description = "Course generation service"),
    paths(
        handlers::ping,
        handlers::get_me,
        handlers::update_me,
        handlers::list_models,
        handlers::create_model,
        handlers::propose_levels,
        handlers::list_conversations,
        handlers::create_conversation,
        handlers::get_conversation,
        handlers::rename_conversation,
        handlers::delete_conversation,
        handlers::list_messages,
        handlers::add_message,
        handlers::list_courses,
        handlers::create_course,
        handlers::get_course,
        handlers::update_course,
        handlers::delete_course,
        handlers::list_chapters,
        handlers::create_chapter,
        handlers::get_chapter,
        handlers::update_chapter,
        handlers::delete_chapter,
        handlers::list_quizzes,
        handlers::create_quiz,
        handlers::get_quiz,
        handlers::delete_quiz,
        handlers::list_attempts,
        handlers::submit_attempt,
        handlers::graphql_handler,
    ),
    components(
        schemas(
            ErrorBody,
            handlers::PingResponse,
            handlers::GraphqlRequestDoc,
            handlers::GraphqlResponseDoc,
            dto::UpdateProfileRequest,
            dto::UserResponse,
            dto::CreateLlmModelRequest,
            dto::LlmModelResponse,
            dto::CreateConversationRequest,
            dto::RenameConversationRequest,
            dto::AddMessageRequest,
            dto::ConversationResponse,
            dto::MessageResponse,
            dto::ConversationDetailResponse,
            dto::ProposeLevelsRequest,
            dto::LevelOptionResponse,
            dto::LearningLevelsResponseDto,
            dto::CreateCourseRequest,
            dto::UpdateCourseRequest,
            dto::CourseResponse,
            dto::CourseDetailResponse,
            dto::CreateChapterRequest,
            dto::UpdateChapterRequest,
            dto::ChapterResponse,
            dto::QuestionRequest,
            dto::CreateQuizRequest,
            dto::AttemptAnswerRequest,
            dto::SubmitAttemptRequest,
            dto::QuizResponse,
            dto::QuestionResponse,
            dto::QuizDetailResponse,
            dto::AttemptAnswerResponse,
            dto::AttemptResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "system", description = "Health check"),
        (name = "users", description = "Current user profile"),
        (name = "models", description = "LLM models"),
        (name = "learning", description = "Learning goal intake"),
        (name = "conversations", description = "Conversations and messages"),
        (name = "courses", description = "Courses"),
        (name = "chapters", description = "Chapters"),
        (name = "quizzes", description = "Quizzes and attempts"),
        (name = "graphql", description = "GraphQL endpoint")
    )
)]
pub struct ApiDoc;

/// 注册 bearer 认证方案
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
