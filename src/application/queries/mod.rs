//! 应用层 - 查询（读操作）
//!
//! CQRS 查询侧：处理所有读操作

mod conversation_queries;
mod course_queries;
mod llm_model_queries;
mod quiz_queries;
mod user_queries;

pub mod handlers;

pub use conversation_queries::*;
pub use course_queries::*;
pub use llm_model_queries::*;
pub use quiz_queries::*;
pub use user_queries::*;
