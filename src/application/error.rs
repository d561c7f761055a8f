//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use serde::Serialize;
use thiserror::Error;

use crate::application::ports::{ConstraintViolation, LlmError, RepositoryError};
use crate::domain::DomainError;

/// 单个字段的校验问题
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 资源未找到
    #[error("{0}")]
    NotFound(String),

    /// 请求数据校验失败
    #[error("Validation error: {}", format_issues(.0))]
    Validation(Vec<FieldIssue>),

    /// 数据库约束冲突
    #[error("Constraint violation: {0}")]
    Constraint(ConstraintViolation),

    /// 数据在写入数据库前被拒绝
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// 资源不属于当前用户
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// 未认证
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 外部服务错误
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// 仓储错误
    #[error("Repository error: {0}")]
    RepositoryError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

fn format_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|i| format!("{}: {}", i.field, i.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ApplicationError {
    /// 创建 NotFound 错误
    pub fn not_found(resource_type: &'static str, id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{} not found: {}", resource_type, id))
    }

    /// 创建单字段校验错误
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(vec![FieldIssue::new(field, message)])
    }

    /// 创建越权访问错误
    pub fn forbidden(resource_type: &'static str, id: impl std::fmt::Display) -> Self {
        Self::Forbidden(format!(
            "{} {} belongs to another user",
            resource_type, id
        ))
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}

impl From<DomainError> for ApplicationError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidField { field, reason } => {
                Self::Validation(vec![FieldIssue::new(field, reason)])
            }
            DomainError::MalformedLevelOptions(msg) => {
                Self::ExternalServiceError(format!("LLM returned malformed level options: {}", msg))
            }
        }
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(msg) => Self::NotFound(msg),
            RepositoryError::Constraint(violation) => Self::Constraint(violation),
            RepositoryError::InvalidData(msg) => Self::InvalidData(msg),
            other => Self::RepositoryError(other.to_string()),
        }
    }
}

impl From<LlmError> for ApplicationError {
    fn from(err: LlmError) -> Self {
        Self::ExternalServiceError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::ConstraintKind;

    #[test]
    fn test_repository_errors_keep_their_category() {
        let err: ApplicationError = RepositoryError::Constraint(ConstraintViolation::new(
            ConstraintKind::Unique,
            "UNIQUE constraint failed: users.email",
        ))
        .into();
        assert!(matches!(err, ApplicationError::Constraint(ref v) if v.kind == ConstraintKind::Unique));

        let err: ApplicationError = RepositoryError::NotFound("Course x".into()).into();
        assert!(matches!(err, ApplicationError::NotFound(_)));

        let err: ApplicationError = RepositoryError::DatabaseError("disk I/O error".into()).into();
        assert!(matches!(err, ApplicationError::RepositoryError(_)));
    }

    #[test]
    fn test_domain_error_becomes_field_issue() {
        let err: ApplicationError = DomainError::invalid("title", "must not be empty").into();
        match err {
            ApplicationError::Validation(issues) => {
                assert_eq!(issues, vec![FieldIssue::new("title", "must not be empty")]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
