//! SQLite Persistence - SQLite 数据库持久化实现

mod conversation_repo;
mod course_repo;
mod database;
mod llm_model_repo;
mod quiz_repo;
mod user_repo;

pub use conversation_repo::*;
pub use course_repo::*;
pub use database::*;
pub use llm_model_repo::*;
pub use quiz_repo::*;
pub use user_repo::*;
