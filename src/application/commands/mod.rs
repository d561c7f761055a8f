//! 应用层 - 命令（写操作）
//!
//! CQRS 命令侧：处理所有写操作

mod conversation_commands;
mod course_commands;
mod learning_commands;
mod llm_model_commands;
mod quiz_commands;
mod user_commands;

pub mod handlers;

pub use conversation_commands::*;
pub use course_commands::*;
pub use learning_commands::*;
pub use llm_model_commands::*;
pub use quiz_commands::*;
pub use user_commands::*;
