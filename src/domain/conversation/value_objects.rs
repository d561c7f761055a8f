//! Conversation Context - Value Objects

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// 消息角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
            MessageRole::System => "system",
        }
    }

    pub fn parse(field: &str, raw: &str) -> Result<Self, DomainError> {
        raw.trim()
            .parse()
            .map_err(|_| DomainError::invalid(field, "must be one of: user, assistant, system"))
    }
}

impl std::str::FromStr for MessageRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            "system" => Ok(MessageRole::System),
            _ => Err(DomainError::invalid("role", format!("unknown role: {}", s))),
        }
    }
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 消息正文
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContent(String);

impl MessageContent {
    pub const MAX_CHARS: usize = 20_000;

    pub fn parse(field: &str, raw: &str) -> Result<Self, DomainError> {
        if raw.trim().is_empty() {
            return Err(DomainError::invalid(field, "must not be empty"));
        }
        if raw.chars().count() > Self::MAX_CHARS {
            return Err(DomainError::invalid(
                field,
                format!("must be at most {} characters", Self::MAX_CHARS),
            ));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!(
            MessageRole::parse("role", "assistant").unwrap(),
            MessageRole::Assistant
        );
        assert!(MessageRole::parse("role", "tool").is_err());
    }

    #[test]
    fn test_content_keeps_inner_whitespace() {
        let content = MessageContent::parse("content", "  line one\nline two ").unwrap();
        assert_eq!(content.as_str(), "  line one\nline two ");
        assert!(MessageContent::parse("content", "\n\t ").is_err());
    }
}
