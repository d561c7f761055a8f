//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod auth_verifier;
mod llm_engine;
mod repositories;

pub use auth_verifier::{AuthError, AuthUser, AuthVerifierPort};
pub use llm_engine::{ChatMessage, CompletionRequest, CompletionResponse, LlmEnginePort, LlmError};
pub use repositories::{
    ChapterRecord, ConstraintKind, ConstraintViolation, ConversationRecord,
    ConversationRepositoryPort, CourseRecord, CourseRepositoryPort, LlmModelRecord,
    LlmModelRepositoryPort, MessageRecord, QuestionRecord, QuizAttemptRecord, QuizRecord,
    QuizRepositoryPort, RepositoryError, UserQuizResponseRecord, UserRecord, UserRepositoryPort,
};
