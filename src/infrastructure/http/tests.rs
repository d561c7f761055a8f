//! Router 级集成测试：内存 SQLite + Fake LLM + Dev 认证

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tower::util::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use uuid::Uuid;

use super::error::handle_panic;
use super::{build_router, AppState, Ports};
use crate::application::LlmEnginePort;
use crate::infrastructure::adapters::{DevVerifier, FakeLlmClient};
use crate::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, DatabaseConfig, SqliteConversationRepository,
    SqliteCourseRepository, SqliteLlmModelRepository, SqliteQuizRepository, SqliteUserRepository,
};

async fn test_app_with(llm_engine: Arc<dyn LlmEnginePort>) -> Router {
    let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
    run_migrations(&pool).await.unwrap();

    let ports = Ports {
        user_repo: Arc::new(SqliteUserRepository::new(pool.clone())),
        model_repo: Arc::new(SqliteLlmModelRepository::new(pool.clone())),
        conversation_repo: Arc::new(SqliteConversationRepository::new(pool.clone())),
        course_repo: Arc::new(SqliteCourseRepository::new(pool.clone())),
        quiz_repo: Arc::new(SqliteQuizRepository::new(pool)),
        llm_engine,
        auth_verifier: Arc::new(DevVerifier::new()),
    };
    build_router(Arc::new(AppState::new(ports, "fake-model")))
}

async fn test_app() -> Router {
    test_app_with(Arc::new(FakeLlmClient::new())).await
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    user: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {user}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_course(app: &Router, user: &str, title: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/courses",
        Some(user),
        Some(json!({
            "title": title,
            "learning_goal": "Learn the Rust programming language",
            "level": "beginner"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

#[tokio::test]
async fn test_ping_is_public() {
    let app = test_app().await;
    let (status, body) = send(&app, Method::GET, "/api/ping", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["llm"], "up");
}

#[tokio::test]
async fn test_ping_reports_llm_down() {
    let app = test_app_with(Arc::new(FakeLlmClient::failing())).await;
    let (status, body) = send(&app, Method::GET, "/api/ping", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["llm"], "down");
}

#[tokio::test]
async fn test_wrong_method_renders_envelope() {
    let app = test_app().await;
    let (status, body) = send(&app, Method::POST, "/api/ping", None, None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["message"], "Method not allowed");
    assert_eq!(body["details"]["reason"], "POST is not supported on /api/ping");

    let (status, body) = send(&app, Method::PATCH, "/api/courses", Some("alice"), None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["message"], "Method not allowed");
}

#[tokio::test]
async fn test_wrong_method_keeps_allow_header() {
    let app = test_app().await;
    let request = Request::builder()
        .method(Method::DELETE)
        .uri("/api/ping")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    let allow = response.headers().get(header::ALLOW).unwrap().to_str().unwrap();
    assert!(allow.contains("GET"));
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = test_app().await;
    let (status, body) = send(&app, Method::GET, "/api/docs/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/courses"].is_object());
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = test_app().await;
    let (status, body) = send(&app, Method::GET, "/api/courses", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Unauthorized");
    assert!(body["details"]["reason"].is_string());
}

#[tokio::test]
async fn test_rejected_token_is_unauthorized() {
    let app = test_app().await;
    let (status, _) = send(&app, Method::GET, "/api/users/me", Some("not a valid id!"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_route_is_not_found_envelope() {
    let app = test_app().await;
    let (status, body) = send(&app, Method::GET, "/api/nothing-here", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Resource not found");
}

#[tokio::test]
async fn test_first_request_creates_user() {
    let app = test_app().await;
    let (status, body) = send(&app, Method::GET, "/api/users/me", Some("alice"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "alice");
    assert!(body["email"].is_null());
}

#[tokio::test]
async fn test_course_create_and_get_passes_value_through() {
    let app = test_app().await;
    let course = create_course(&app, "alice", "Rust from scratch").await;
    assert_eq!(course["title"], "Rust from scratch");
    assert_eq!(course["level"], "beginner");
    assert!(course.get("message").is_none());

    let id = course["id"].as_str().unwrap();
    let (status, detail) = send(&app, Method::GET, &format!("/api/courses/{id}"), Some("alice"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["id"], course["id"]);
    assert_eq!(detail["chapters"], json!([]));
}

#[tokio::test]
async fn test_other_users_course_is_forbidden() {
    let app = test_app().await;
    let course = create_course(&app, "alice", "Private course").await;
    let id = course["id"].as_str().unwrap();

    let (status, body) = send(&app, Method::GET, &format!("/api/courses/{id}"), Some("bob"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Forbidden");

    let (status, _) = send(&app, Method::DELETE, &format!("/api/courses/{id}"), Some("bob"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_missing_course_is_not_found() {
    let app = test_app().await;
    let uri = format!("/api/courses/{}", Uuid::new_v4());
    let (status, body) = send(&app, Method::GET, &uri, Some("alice"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Resource not found");
}

#[tokio::test]
async fn test_malformed_body_lists_issues() {
    let app = test_app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/courses",
        Some("alice"),
        Some(json!({ "title": 5, "learning_goal": "Learn Rust", "level": "beginner" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid request data");
    let issues = body["details"].as_array().unwrap();
    assert!(!issues.is_empty());
    assert_eq!(issues[0]["field"], "title");
}

#[tokio::test]
async fn test_missing_field_names_the_field() {
    let app = test_app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/courses",
        Some("alice"),
        Some(json!({ "learning_goal": "Learn the Rust programming language", "level": "beginner" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid request data");
    assert_eq!(body["details"][0]["field"], "title");
}

#[tokio::test]
async fn test_domain_validation_is_bad_request() {
    let app = test_app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/courses",
        Some("alice"),
        Some(json!({ "title": "Rust", "learning_goal": "Learn Rust", "level": "wizard" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "level");
}

#[tokio::test]
async fn test_invalid_uuid_in_path_is_bad_request() {
    let app = test_app().await;
    let (status, body) = send(&app, Method::GET, "/api/courses/not-a-uuid", Some("alice"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "path");
}

#[tokio::test]
async fn test_duplicate_email_is_conflict() {
    let app = test_app().await;
    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/users/me",
        Some("alice"),
        Some(json!({ "email": "shared@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/users/me",
        Some("bob"),
        Some(json!({ "email": "shared@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "A record with this value already exists");
    assert_eq!(body["details"]["code"], "UNIQUE_VIOLATION");
}

#[tokio::test]
async fn test_duplicate_chapter_position_is_conflict() {
    let app = test_app().await;
    let course = create_course(&app, "alice", "Chapters").await;
    let uri = format!("/api/courses/{}/chapters", course["id"].as_str().unwrap());

    let chapter = json!({ "title": "Intro", "content": "Hello", "position": 1 });
    let (status, _) = send(&app, Method::POST, &uri, Some("alice"), Some(chapter.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, Method::POST, &uri, Some("alice"), Some(chapter)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["details"]["code"], "UNIQUE_VIOLATION");
}

#[tokio::test]
async fn test_learning_levels_flow() {
    let app = test_app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/learning/levels",
        Some("alice"),
        Some(json!({ "goal": "Learn Rust for backend services" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["options"].as_array().unwrap().len(), 3);
    assert_eq!(body["options"][0]["level"], "beginner");
    assert_eq!(body["messages"].as_array().unwrap().len(), 2);
    assert_eq!(body["model"], "fake-model");

    let id = body["conversation"]["id"].as_str().unwrap();
    let (status, conversation) = send(
        &app,
        Method::GET,
        &format!("/api/conversations/{id}"),
        Some("alice"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let messages = conversation["messages"].as_array().unwrap();
    assert_eq!(messages[0]["role"], "user");
    assert_eq!(messages[1]["role"], "assistant");
}

#[tokio::test]
async fn test_llm_failure_is_bad_gateway() {
    let app = test_app_with(Arc::new(FakeLlmClient::failing())).await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/learning/levels",
        Some("alice"),
        Some(json!({ "goal": "Learn Rust for backend services" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["message"], "Upstream service error");

    // 对话与用户消息保留
    let (_, conversations) = send(&app, Method::GET, "/api/conversations", Some("alice"), None).await;
    assert_eq!(conversations.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_malformed_llm_output_is_bad_gateway() {
    let app = test_app_with(Arc::new(FakeLlmClient::with_reply("I cannot help with that"))).await;
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/learning/levels",
        Some("alice"),
        Some(json!({ "goal": "Learn Rust for backend services" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_quiz_attempt_is_scored() {
    let app = test_app().await;
    let course = create_course(&app, "alice", "Quizzes").await;
    let (status, chapter) = send(
        &app,
        Method::POST,
        &format!("/api/courses/{}/chapters", course["id"].as_str().unwrap()),
        Some("alice"),
        Some(json!({ "title": "Basics", "content": "Numbers and capitals" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(chapter["position"], 0);

    let (status, quiz) = send(
        &app,
        Method::POST,
        &format!("/api/chapters/{}/quizzes", chapter["id"].as_str().unwrap()),
        Some("alice"),
        Some(json!({
            "title": "Warm-up",
            "questions": [
                { "prompt": "2 + 2?", "options": ["3", "4"], "correct_option": 1 },
                { "prompt": "Capital of France?", "options": ["Paris", "Rome", "Berlin"], "correct_option": 0 }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{quiz}");
    let questions = quiz["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 2);
    assert!(questions[0].get("correct_option").is_none());

    let quiz_id = quiz["id"].as_str().unwrap();
    let attempts_uri = format!("/api/quizzes/{quiz_id}/attempts");
    let (status, attempt) = send(
        &app,
        Method::POST,
        &attempts_uri,
        Some("alice"),
        Some(json!({
            "responses": [
                { "question_id": questions[0]["id"], "selected_option": 1 },
                { "question_id": questions[1]["id"], "selected_option": 2 }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{attempt}");
    assert_eq!(attempt["score"], 1);
    assert_eq!(attempt["total"], 2);
    assert_eq!(attempt["percentage"], 50.0);

    let (status, body) = send(
        &app,
        Method::POST,
        &attempts_uri,
        Some("alice"),
        Some(json!({
            "responses": [
                { "question_id": questions[0]["id"], "selected_option": 1 },
                { "question_id": questions[0]["id"], "selected_option": 0 }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    let (status, attempts) = send(&app, Method::GET, &attempts_uri, Some("alice"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(attempts.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_returns_no_content() {
    let app = test_app().await;
    let course = create_course(&app, "alice", "Short lived").await;
    let uri = format!("/api/courses/{}", course["id"].as_str().unwrap());

    let (status, body) = send(&app, Method::DELETE, &uri, Some("alice"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, _) = send(&app, Method::GET, &uri, Some("alice"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_graphql_mutation_and_query() {
    let app = test_app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/graphql",
        Some("alice"),
        Some(json!({
            "query": r#"mutation {
                createCourse(input: { title: "GraphQL course", learningGoal: "Learn the GraphQL API", level: "intermediate" }) {
                    id title level
                }
            }"#
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("errors").is_none(), "{body}");
    assert_eq!(body["data"]["createCourse"]["level"], "intermediate");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/graphql",
        Some("alice"),
        Some(json!({ "query": "{ me { id } courses { title } }" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["me"]["id"], "alice");
    assert_eq!(body["data"]["courses"][0]["title"], "GraphQL course");

    // REST 也能看到同一门课程
    let (_, courses) = send(&app, Method::GET, "/api/courses", Some("alice"), None).await;
    assert_eq!(courses.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_graphql_errors_use_normalized_table() {
    let app = test_app().await;
    let query = format!(
        r#"{{ course(id: "{}") {{ course {{ id }} }} }}"#,
        Uuid::new_v4()
    );
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/graphql",
        Some("alice"),
        Some(json!({ "query": query })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let error = &body["errors"][0];
    assert_eq!(error["message"], "Resource not found");
    assert_eq!(error["extensions"]["status"], 404);
    assert_eq!(error["extensions"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_graphql_requires_token() {
    let app = test_app().await;
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/graphql",
        None,
        Some(json!({ "query": "{ me { id } }" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

async fn boom() -> &'static str {
    panic!("database handle poisoned")
}

#[tokio::test]
async fn test_panic_renders_internal_error() {
    let app = Router::new()
        .route("/boom", get(boom))
        .layer(CatchPanicLayer::custom(handle_panic));

    let response = app
        .oneshot(Request::builder().uri("/boom").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({ "message": "Internal server error", "details": null }));
}
