//! Repository Ports - 出站端口
//!
//! 定义数据持久化的抽象接口
//! 具体实现在 infrastructure 层（如 SQLite）

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::conversation::MessageRole;
use crate::domain::course::LearningLevel;

/// 数据库约束类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    /// 唯一键 / 主键冲突
    Unique,
    /// 外键引用的记录不存在
    ForeignKey,
    /// 非空字段缺失
    NotNull,
    /// CHECK 约束不满足
    Check,
}

impl ConstraintKind {
    /// 对外暴露的稳定错误码
    pub fn code(&self) -> &'static str {
        match self {
            ConstraintKind::Unique => "UNIQUE_VIOLATION",
            ConstraintKind::ForeignKey => "FOREIGN_KEY_VIOLATION",
            ConstraintKind::NotNull => "NOT_NULL_VIOLATION",
            ConstraintKind::Check => "CHECK_VIOLATION",
        }
    }
}

/// 已识别的数据库约束错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintViolation {
    pub kind: ConstraintKind,
    /// 数据库原始错误信息，例如 `UNIQUE constraint failed: users.email`
    pub message: String,
}

impl ConstraintViolation {
    pub fn new(kind: ConstraintKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.kind.code(), self.message)
    }
}

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    Constraint(ConstraintViolation),

    /// 数据在写入数据库前即被拒绝
    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

// ============================================================================
// User Repository
// ============================================================================

/// 用户实体（id 为认证服务的 subject）
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User Repository Port
#[async_trait]
pub trait UserRepositoryPort: Send + Sync {
    /// 不存在时插入，已存在时不做任何修改
    async fn insert_if_absent(&self, user: &UserRecord) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>, RepositoryError>;

    /// 更新资料，记录不存在时返回 NotFound
    async fn update(&self, user: &UserRecord) -> Result<(), RepositoryError>;
}

// ============================================================================
// LLM Model Repository
// ============================================================================

/// LLM 模型实体
#[derive(Debug, Clone)]
pub struct LlmModelRecord {
    pub id: Uuid,
    pub name: String,
    pub provider: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// LLM Model Repository Port
#[async_trait]
pub trait LlmModelRepositoryPort: Send + Sync {
    async fn save(&self, model: &LlmModelRecord) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<LlmModelRecord>, RepositoryError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<LlmModelRecord>, RepositoryError>;

    /// 获取所有启用的模型
    async fn find_active(&self) -> Result<Vec<LlmModelRecord>, RepositoryError>;
}

// ============================================================================
// Conversation Repository
// ============================================================================

/// 对话实体
#[derive(Debug, Clone)]
pub struct ConversationRecord {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub llm_model_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 消息实体
#[derive(Debug, Clone)]
pub struct MessageRecord {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Conversation Repository Port
#[async_trait]
pub trait ConversationRepositoryPort: Send + Sync {
    async fn save(&self, conversation: &ConversationRecord) -> Result<(), RepositoryError>;

    /// 更新标题和 updated_at，记录不存在时返回 NotFound
    async fn update(&self, conversation: &ConversationRecord) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ConversationRecord>, RepositoryError>;

    /// 用户的所有对话，最近更新的在前
    async fn find_by_user(&self, user_id: &str) -> Result<Vec<ConversationRecord>, RepositoryError>;

    /// 删除对话（级联删除消息）
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;

    /// 追加消息并刷新对话的 updated_at
    async fn append_message(&self, message: &MessageRecord) -> Result<(), RepositoryError>;

    /// 按时间顺序获取消息
    async fn find_messages(&self, conversation_id: Uuid)
        -> Result<Vec<MessageRecord>, RepositoryError>;
}

// ============================================================================
// Course Repository
// ============================================================================

/// 课程实体
#[derive(Debug, Clone)]
pub struct CourseRecord {
    pub id: Uuid,
    pub user_id: String,
    pub conversation_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub learning_goal: String,
    pub level: LearningLevel,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 章节实体
#[derive(Debug, Clone)]
pub struct ChapterRecord {
    pub id: Uuid,
    pub course_id: Uuid,
    pub position: u32,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Course Repository Port
#[async_trait]
pub trait CourseRepositoryPort: Send + Sync {
    async fn save(&self, course: &CourseRecord) -> Result<(), RepositoryError>;

    async fn update(&self, course: &CourseRecord) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CourseRecord>, RepositoryError>;

    /// 用户的所有课程，最新创建的在前
    async fn find_by_user(&self, user_id: &str) -> Result<Vec<CourseRecord>, RepositoryError>;

    /// 删除课程（级联删除章节、测验）
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;

    async fn save_chapter(&self, chapter: &ChapterRecord) -> Result<(), RepositoryError>;

    async fn update_chapter(&self, chapter: &ChapterRecord) -> Result<(), RepositoryError>;

    async fn find_chapter(&self, id: Uuid) -> Result<Option<ChapterRecord>, RepositoryError>;

    /// 按 position 升序
    async fn find_chapters(&self, course_id: Uuid) -> Result<Vec<ChapterRecord>, RepositoryError>;

    async fn delete_chapter(&self, id: Uuid) -> Result<(), RepositoryError>;

    /// 追加到课程末尾，位置在同一条 INSERT 中取 `MAX(position) + 1`（空课程为 0），
    /// 忽略 `chapter.position`。下一个位置超过 `max_position` 时不插入，返回 `None`
    async fn append_chapter(
        &self,
        chapter: &ChapterRecord,
        max_position: u32,
    ) -> Result<Option<u32>, RepositoryError>;
}

// ============================================================================
// Quiz Repository
// ============================================================================

/// 测验实体
#[derive(Debug, Clone)]
pub struct QuizRecord {
    pub id: Uuid,
    pub chapter_id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// 题目实体
#[derive(Debug, Clone)]
pub struct QuestionRecord {
    pub id: Uuid,
    pub quiz_id: Uuid,
    pub position: u32,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_option: u32,
    pub explanation: Option<String>,
}

/// 作答记录
#[derive(Debug, Clone)]
pub struct QuizAttemptRecord {
    pub id: Uuid,
    pub quiz_id: Uuid,
    pub user_id: String,
    pub score: u32,
    pub total: u32,
    pub created_at: DateTime<Utc>,
}

/// 单题作答
#[derive(Debug, Clone)]
pub struct UserQuizResponseRecord {
    pub id: Uuid,
    pub attempt_id: Uuid,
    pub question_id: Uuid,
    pub selected_option: u32,
    pub is_correct: bool,
}

/// Quiz Repository Port
#[async_trait]
pub trait QuizRepositoryPort: Send + Sync {
    /// 在同一事务中保存测验及其题目
    async fn save_with_questions(
        &self,
        quiz: &QuizRecord,
        questions: &[QuestionRecord],
    ) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<QuizRecord>, RepositoryError>;

    async fn find_by_chapter(&self, chapter_id: Uuid) -> Result<Vec<QuizRecord>, RepositoryError>;

    /// 按 position 升序
    async fn find_questions(&self, quiz_id: Uuid) -> Result<Vec<QuestionRecord>, RepositoryError>;

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;

    /// 在同一事务中保存作答及逐题结果
    async fn save_attempt(
        &self,
        attempt: &QuizAttemptRecord,
        responses: &[UserQuizResponseRecord],
    ) -> Result<(), RepositoryError>;

    /// 用户在某测验上的所有作答，最新的在前
    async fn find_attempts(
        &self,
        quiz_id: Uuid,
        user_id: &str,
    ) -> Result<Vec<QuizAttemptRecord>, RepositoryError>;

    async fn find_responses(
        &self,
        attempt_id: Uuid,
    ) -> Result<Vec<UserQuizResponseRecord>, RepositoryError>;
}
