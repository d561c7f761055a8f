//! Course Context - Value Objects

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// 学习目标
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningGoal(String);

impl LearningGoal {
    pub const MIN_CHARS: usize = 3;
    pub const MAX_CHARS: usize = 2000;

    pub fn parse(field: &str, raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        let len = trimmed.chars().count();
        if len < Self::MIN_CHARS {
            return Err(DomainError::invalid(
                field,
                format!("must be at least {} characters", Self::MIN_CHARS),
            ));
        }
        if len > Self::MAX_CHARS {
            return Err(DomainError::invalid(
                field,
                format!("must be at most {} characters", Self::MAX_CHARS),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LearningGoal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 学习级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LearningLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl LearningLevel {
    pub const ALL: [LearningLevel; 4] = [
        LearningLevel::Beginner,
        LearningLevel::Intermediate,
        LearningLevel::Advanced,
        LearningLevel::Expert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LearningLevel::Beginner => "beginner",
            LearningLevel::Intermediate => "intermediate",
            LearningLevel::Advanced => "advanced",
            LearningLevel::Expert => "expert",
        }
    }

    pub fn parse(field: &str, raw: &str) -> Result<Self, DomainError> {
        raw.parse().map_err(|_| {
            DomainError::invalid(
                field,
                "must be one of: beginner, intermediate, advanced, expert",
            )
        })
    }
}

/// 大小写不敏感
impl std::str::FromStr for LearningLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(LearningLevel::Beginner),
            "intermediate" => Ok(LearningLevel::Intermediate),
            "advanced" => Ok(LearningLevel::Advanced),
            "expert" => Ok(LearningLevel::Expert),
            _ => Err(DomainError::invalid("level", format!("unknown level: {}", s))),
        }
    }
}

impl std::fmt::Display for LearningLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 章节在课程中的位置（从 0 开始）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChapterPosition(u32);

impl ChapterPosition {
    pub const MAX: u32 = 999;

    pub fn parse(field: &str, value: u32) -> Result<Self, DomainError> {
        if value > Self::MAX {
            return Err(DomainError::invalid(
                field,
                format!("must be at most {}", Self::MAX),
            ));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}
