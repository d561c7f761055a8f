//! Conversation Context - 对话限界上下文
//!
//! 职责:
//! - 消息角色与内容
//! - LLM 学习级别建议的提示词与解析

mod level_options;
mod value_objects;

pub use level_options::{
    level_options_prompt, level_options_user_message, parse_level_options, LevelOption,
};
pub use value_objects::{MessageContent, MessageRole};
