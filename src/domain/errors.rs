//! Domain Errors

use thiserror::Error;

/// 领域校验错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// 字段值不满足约束
    #[error("{field}: {reason}")]
    InvalidField { field: String, reason: String },

    /// LLM 返回的学习级别选项无法解析
    #[error("Malformed level options: {0}")]
    MalformedLevelOptions(String),
}

impl DomainError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
