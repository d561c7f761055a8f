//! Shared Value Objects

use serde::{Deserialize, Serialize};

use super::DomainError;

pub const MAX_TITLE_CHARS: usize = 200;

/// 标题（课程、章节、测验、会话共用）
///
/// 去除首尾空白后长度在 1..=200 字符之间
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title(String);

impl Title {
    pub fn parse(field: &str, raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::invalid(field, "must not be empty"));
        }
        if trimmed.chars().count() > MAX_TITLE_CHARS {
            return Err(DomainError::invalid(
                field,
                format!("must be at most {} characters", MAX_TITLE_CHARS),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// 从任意文本派生标题，超长时截断并追加省略号
    pub fn derive_from(text: &str, max_chars: usize) -> Self {
        let trimmed = text.trim();
        let max_chars = max_chars.clamp(1, MAX_TITLE_CHARS);
        if trimmed.is_empty() {
            return Self("Untitled".to_string());
        }
        if trimmed.chars().count() <= max_chars {
            return Self(trimmed.to_string());
        }
        let cut: String = trimmed.chars().take(max_chars - 1).collect();
        Self(format!("{}…", cut.trim_end()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Title {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 可选的长文本描述，空白串视为 None
pub fn optional_text(
    field: &str,
    raw: Option<&str>,
    max_chars: usize,
) -> Result<Option<String>, DomainError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > max_chars {
        return Err(DomainError::invalid(
            field,
            format!("must be at most {} characters", max_chars),
        ));
    }
    Ok(Some(trimmed.to_string()))
}
