//! Query Handlers 实现

mod conversation_handlers;
mod course_handlers;
mod llm_model_handlers;
mod quiz_handlers;
mod user_handlers;

pub use conversation_handlers::*;
pub use course_handlers::*;
pub use llm_model_handlers::*;
pub use quiz_handlers::*;
pub use user_handlers::*;
