//! HTTP Error Handling - 统一错误响应
//!
//! 所有错误都经过 `ApiError::normalize` 得到固定的状态码与消息，
//! 响应体统一为 `{"message": ..., "details": ...}`

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::any::Any;
use utoipa::ToSchema;

use crate::application::{ApplicationError, ConstraintKind, ConstraintViolation, FieldIssue};

/// 统一错误响应格式
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ErrorBody {
    pub message: String,
    #[schema(value_type = Option<Object>)]
    pub details: Value,
}

/// 错误消息定义
pub mod messages {
    pub const VALIDATION: &str = "Invalid request data";
    pub const UNIQUE_VIOLATION: &str = "A record with this value already exists";
    pub const FOREIGN_KEY_VIOLATION: &str = "Referenced record does not exist";
    pub const NOT_NULL_VIOLATION: &str = "A required value is missing";
    pub const CHECK_VIOLATION: &str = "A value is outside the allowed range";
    pub const INVALID_DATA: &str = "Invalid data for database operation";
    pub const UNAUTHORIZED: &str = "Unauthorized";
    pub const FORBIDDEN: &str = "Forbidden";
    pub const NOT_FOUND: &str = "Resource not found";
    pub const METHOD_NOT_ALLOWED: &str = "Method not allowed";
    pub const UPSTREAM: &str = "Upstream service error";
    pub const INTERNAL: &str = "Internal server error";
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    /// 请求数据校验失败
    Validation(Vec<FieldIssue>),
    /// 已识别的数据库约束错误
    Constraint(ConstraintViolation),
    /// 数据在写入数据库前被拒绝
    InvalidData(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    /// 路由存在但不支持该方法
    MethodNotAllowed(String),
    /// LLM 等上游服务失败
    Upstream(String),
    /// 未识别的错误
    Internal(String),
}

/// 归一化后的错误
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedError {
    pub status: StatusCode,
    /// 稳定的错误码，GraphQL extensions 中使用
    pub code: &'static str,
    pub message: &'static str,
    pub details: Value,
}

impl NormalizedError {
    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            message: self.message.to_string(),
            details: self.details.clone(),
        }
    }
}

impl ApiError {
    /// 错误种类 → (状态码, 错误码, 消息, details)
    pub fn normalize(&self) -> NormalizedError {
        let (status, code, message, details) = match self {
            ApiError::Validation(issues) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                messages::VALIDATION,
                json!(issues),
            ),
            ApiError::Constraint(violation) => {
                let (status, message) = match violation.kind {
                    ConstraintKind::Unique => (StatusCode::CONFLICT, messages::UNIQUE_VIOLATION),
                    ConstraintKind::ForeignKey => {
                        (StatusCode::BAD_REQUEST, messages::FOREIGN_KEY_VIOLATION)
                    }
                    ConstraintKind::NotNull => {
                        (StatusCode::BAD_REQUEST, messages::NOT_NULL_VIOLATION)
                    }
                    ConstraintKind::Check => (StatusCode::BAD_REQUEST, messages::CHECK_VIOLATION),
                };
                (
                    status,
                    violation.kind.code(),
                    message,
                    json!({ "code": violation.kind.code(), "reason": violation.message }),
                )
            }
            ApiError::InvalidData(reason) => (
                StatusCode::BAD_REQUEST,
                "INVALID_DATA",
                messages::INVALID_DATA,
                json!({ "reason": reason }),
            ),
            ApiError::Unauthorized(reason) => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                messages::UNAUTHORIZED,
                json!({ "reason": reason }),
            ),
            ApiError::Forbidden(reason) => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                messages::FORBIDDEN,
                json!({ "reason": reason }),
            ),
            ApiError::NotFound(reason) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                messages::NOT_FOUND,
                json!({ "reason": reason }),
            ),
            ApiError::MethodNotAllowed(reason) => (
                StatusCode::METHOD_NOT_ALLOWED,
                "METHOD_NOT_ALLOWED",
                messages::METHOD_NOT_ALLOWED,
                json!({ "reason": reason }),
            ),
            ApiError::Upstream(reason) => (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_ERROR",
                messages::UPSTREAM,
                json!({ "reason": reason }),
            ),
            ApiError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                messages::INTERNAL,
                Value::Null,
            ),
        };

        NormalizedError {
            status,
            code,
            message,
            details,
        }
    }

    /// 原始错误信息，仅用于日志
    fn cause(&self) -> String {
        match self {
            ApiError::Validation(issues) => issues
                .iter()
                .map(|i| format!("{}: {}", i.field, i.message))
                .collect::<Vec<_>>()
                .join("; "),
            ApiError::Constraint(violation) => violation.to_string(),
            ApiError::InvalidData(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::MethodNotAllowed(msg)
            | ApiError::Upstream(msg)
            | ApiError::Internal(msg) => msg.clone(),
        }
    }
}

impl ApiError {
    /// 归一化并记录日志：4xx 记 warn，5xx 记 error（含原始原因）
    pub fn report(&self) -> NormalizedError {
        let normalized = self.normalize();
        let cause = self.cause();

        if normalized.status.is_server_error() {
            tracing::error!(
                status = normalized.status.as_u16(),
                code = normalized.code,
                error = %cause,
                "Request failed"
            );
        } else {
            tracing::warn!(
                status = normalized.status.as_u16(),
                code = normalized.code,
                error = %cause,
                "Request rejected"
            );
        }

        normalized
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let normalized = self.report();
        (normalized.status, Json(normalized.body())).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(e: ApplicationError) -> Self {
        match e {
            ApplicationError::NotFound(msg) => ApiError::NotFound(msg),
            ApplicationError::Validation(issues) => ApiError::Validation(issues),
            ApplicationError::Constraint(violation) => ApiError::Constraint(violation),
            ApplicationError::InvalidData(msg) => ApiError::InvalidData(msg),
            ApplicationError::Forbidden(msg) => ApiError::Forbidden(msg),
            ApplicationError::Unauthorized(msg) => ApiError::Unauthorized(msg),
            ApplicationError::ExternalServiceError(msg) => ApiError::Upstream(msg),
            ApplicationError::RepositoryError(msg) => ApiError::Internal(msg),
            ApplicationError::InternalError(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let issue = match &rejection {
            JsonRejection::JsonDataError(_) => json_data_issue(&rejection.body_text()),
            JsonRejection::JsonSyntaxError(_) => {
                FieldIssue::new("body", "request body is not valid JSON")
            }
            JsonRejection::MissingJsonContentType(_) => {
                FieldIssue::new("body", "expected `Content-Type: application/json`")
            }
            _ => FieldIssue::new("body", rejection.body_text()),
        };
        ApiError::Validation(vec![issue])
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Validation(vec![FieldIssue::new("path", rejection.body_text())])
    }
}

/// 从 axum 的反序列化错误文本中拆出字段路径
///
/// 文本形如 `Failed to deserialize the JSON body into the target type: title: invalid type ...`，
/// 缺失字段时形如 `... target type: missing field `title` at line 1 column 2`
fn json_data_issue(text: &str) -> FieldIssue {
    let detail = text
        .split_once("target type: ")
        .map(|(_, rest)| rest)
        .unwrap_or(text);

    let (path, message) = match detail.split_once(": ") {
        Some((".", message)) => (None, message),
        Some((path, message)) if !path.is_empty() && !path.contains(' ') => (Some(path), message),
        _ => (None, detail),
    };

    match (path, missing_field(message)) {
        (Some(path), Some(name)) => FieldIssue::new(format!("{}.{}", path, name), message),
        (Some(path), None) => FieldIssue::new(path, message),
        (None, Some(name)) => FieldIssue::new(name, message),
        (None, None) => FieldIssue::new("body", message),
    }
}

/// serde 的 "missing field `name`" 中的字段名
fn missing_field(message: &str) -> Option<&str> {
    message
        .strip_prefix("missing field `")?
        .split_once('`')
        .map(|(name, _)| name)
}

/// 未匹配路由
pub async fn fallback_not_found(uri: axum::http::Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}

/// CatchPanicLayer 回调：panic 同样渲染为 500 统一错误体
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    ApiError::Internal(format!("handler panicked: {}", detail)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn violation(kind: ConstraintKind) -> ApiError {
        ApiError::Constraint(ConstraintViolation::new(kind, "constraint failed"))
    }

    #[test]
    fn test_status_and_message_table() {
        let cases = [
            (
                ApiError::Validation(vec![FieldIssue::new("title", "required")]),
                400,
                messages::VALIDATION,
            ),
            (violation(ConstraintKind::Unique), 409, messages::UNIQUE_VIOLATION),
            (violation(ConstraintKind::ForeignKey), 400, messages::FOREIGN_KEY_VIOLATION),
            (violation(ConstraintKind::NotNull), 400, messages::NOT_NULL_VIOLATION),
            (violation(ConstraintKind::Check), 400, messages::CHECK_VIOLATION),
            (ApiError::InvalidData("bad".into()), 400, messages::INVALID_DATA),
            (ApiError::Unauthorized("no token".into()), 401, messages::UNAUTHORIZED),
            (ApiError::Forbidden("not yours".into()), 403, messages::FORBIDDEN),
            (ApiError::NotFound("gone".into()), 404, messages::NOT_FOUND),
            (
                ApiError::MethodNotAllowed("PATCH /api/courses".into()),
                405,
                messages::METHOD_NOT_ALLOWED,
            ),
            (ApiError::Upstream("llm down".into()), 502, messages::UPSTREAM),
            (ApiError::Internal("disk full".into()), 500, messages::INTERNAL),
        ];

        for (error, status, message) in cases {
            let normalized = error.normalize();
            assert_eq!(normalized.status.as_u16(), status, "{error:?}");
            assert_eq!(normalized.message, message, "{error:?}");
        }
    }

    #[test]
    fn test_constraint_details_carry_code() {
        let normalized = violation(ConstraintKind::Unique).normalize();
        assert_eq!(
            normalized.details,
            json!({ "code": "UNIQUE_VIOLATION", "reason": "constraint failed" })
        );
    }

    #[tokio::test]
    async fn test_internal_error_does_not_leak_cause() {
        let response = ApiError::Internal("password=hunter2".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(
            body,
            json!({ "message": "Internal server error", "details": null })
        );
    }

    #[tokio::test]
    async fn test_validation_details_list_field_issues() {
        let response =
            ApiError::Validation(vec![FieldIssue::new("goal", "too short")]).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(
            body["details"],
            json!([{ "field": "goal", "message": "too short" }])
        );
    }

    #[test]
    fn test_application_errors_map_to_api_errors() {
        let upstream: ApiError = ApplicationError::ExternalServiceError("timeout".into()).into();
        assert_eq!(upstream.normalize().status, StatusCode::BAD_GATEWAY);

        let repo: ApiError = ApplicationError::RepositoryError("disk I/O".into()).into();
        assert_eq!(repo.normalize().status, StatusCode::INTERNAL_SERVER_ERROR);

        let forbidden: ApiError = ApplicationError::forbidden("Course", "c1").into();
        assert_eq!(forbidden.normalize().status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_panic_renders_internal_envelope() {
        let response = handle_panic(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["message"], "Internal server error");
    }

    #[test]
    fn test_json_data_issue_extracts_field_path() {
        let issue = json_data_issue(
            "Failed to deserialize the JSON body into the target type: title: invalid type: integer `3`, expected a string at line 1 column 11",
        );
        assert_eq!(issue.field, "title");
        assert!(issue.message.starts_with("invalid type"));

        let issue = json_data_issue(
            "Failed to deserialize the JSON body into the target type: missing field `title` at line 1 column 2",
        );
        assert_eq!(issue.field, "title");
        assert!(issue.message.contains("missing field"));

        let issue = json_data_issue(
            "Failed to deserialize the JSON body into the target type: questions[0]: missing field `prompt` at line 1 column 40",
        );
        assert_eq!(issue.field, "questions[0].prompt");

        let issue = json_data_issue(
            "Failed to deserialize the JSON body into the target type: invalid type: map, expected a sequence at line 1 column 1",
        );
        assert_eq!(issue.field, "body");
    }
}
