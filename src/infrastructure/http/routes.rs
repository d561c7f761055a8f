//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping                        GET               健康检查（公开）
//! - /api/users/me                    GET, PUT          当前用户资料
//! - /api/models                      GET, POST         LLM 模型
//! - /api/learning/levels             POST              提交学习目标，获取学习级别建议
//! - /api/conversations               GET, POST         对话
//! - /api/conversations/:id           GET, PUT, DELETE
//! - /api/conversations/:id/messages  GET, POST
//! - /api/courses                     GET, POST         课程
//! - /api/courses/:id                 GET, PUT, DELETE
//! - /api/courses/:id/chapters        GET, POST
//! - /api/chapters/:id                GET, PUT, DELETE  章节
//! - /api/chapters/:id/quizzes        GET, POST
//! - /api/quizzes/:id                 GET, DELETE       测验
//! - /api/quizzes/:id/attempts        GET, POST
//! - /api/graphql                     POST              GraphQL
//!
//! 除 /api/ping 外均需认证；未匹配的路由返回 404 统一错误体

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::error::fallback_not_found;
use super::handlers;
use super::middleware::require_auth;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .nest("/api", api_routes(state))
        .fallback(fallback_not_found)
}

/// API 路由
fn api_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .merge(protected_routes(state))
        .route("/ping", get(handlers::ping))
}

/// 需要认证的路由
fn protected_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .nest("/users", user_routes())
        .nest("/models", model_routes())
        .route("/learning/levels", post(handlers::propose_levels))
        .nest("/conversations", conversation_routes())
        .nest("/courses", course_routes())
        .nest("/chapters", chapter_routes())
        .nest("/quizzes", quiz_routes())
        .route("/graphql", post(handlers::graphql_handler))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

/// User 路由
fn user_routes() -> Router<Arc<AppState>> {
    Router::new().route("/me", get(handlers::get_me).put(handlers::update_me))
}

/// LLM Model 路由
fn model_routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(handlers::list_models).post(handlers::create_model))
}

/// Conversation 路由
fn conversation_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/",
            get(handlers::list_conversations).post(handlers::create_conversation),
        )
        .route(
            "/:id",
            get(handlers::get_conversation)
                .put(handlers::rename_conversation)
                .delete(handlers::delete_conversation),
        )
        .route(
            "/:id/messages",
            get(handlers::list_messages).post(handlers::add_message),
        )
}

/// Course 路由
fn course_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::list_courses).post(handlers::create_course))
        .route(
            "/:id",
            get(handlers::get_course)
                .put(handlers::update_course)
                .delete(handlers::delete_course),
        )
        .route(
            "/:id/chapters",
            get(handlers::list_chapters).post(handlers::create_chapter),
        )
}

/// Chapter 路由
fn chapter_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/:id",
            get(handlers::get_chapter)
                .put(handlers::update_chapter)
                .delete(handlers::delete_chapter),
        )
        .route(
            "/:id/quizzes",
            get(handlers::list_quizzes).post(handlers::create_quiz),
        )
}

/// Quiz 路由
fn quiz_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/:id", get(handlers::get_quiz).delete(handlers::delete_quiz))
        .route(
            "/:id/attempts",
            get(handlers::list_attempts).post(handlers::submit_attempt),
        )
}
