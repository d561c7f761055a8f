//! Domain Layer - 领域层
//!
//! 包含以下限界上下文:
//! - User Context: 用户资料
//! - Conversation Context: 学习目标对话与 LLM 级别建议
//! - Course Context: 课程与章节
//! - Quiz Context: 测验、题目与作答评分

pub mod conversation;
pub mod course;
pub mod quiz;
pub mod user;

mod errors;
mod value_objects;

pub use errors::DomainError;
pub use value_objects::{optional_text, Title, MAX_TITLE_CHARS};
