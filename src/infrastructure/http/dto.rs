//! Data Transfer Objects
//!
//! 请求体与响应体，同时作为 OpenAPI schema

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::{
    AttemptDetail, ChapterRecord, ConversationDetail, ConversationRecord, CourseDetail,
    CourseRecord, LearningLevelsResponse, LlmModelRecord, MessageRecord, QuestionRecord,
    QuizDetail, QuizRecord, UserQuizResponseRecord, UserRecord,
};
use crate::domain::conversation::LevelOption;
use crate::domain::quiz;

// ============================================================================
// User DTOs
// ============================================================================

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRecord> for UserResponse {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

// ============================================================================
// LLM Model DTOs
// ============================================================================

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLlmModelRequest {
    pub name: String,
    pub provider: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LlmModelResponse {
    pub id: Uuid,
    pub name: String,
    pub provider: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<LlmModelRecord> for LlmModelResponse {
    fn from(model: LlmModelRecord) -> Self {
        Self {
            id: model.id,
            name: model.name,
            provider: model.provider,
            description: model.description,
            is_active: model.is_active,
            created_at: model.created_at,
        }
    }
}

// ============================================================================
// Conversation DTOs
// ============================================================================

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateConversationRequest {
    pub title: String,
    pub llm_model_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RenameConversationRequest {
    pub title: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddMessageRequest {
    /// user | assistant | system
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConversationResponse {
    pub id: Uuid,
    pub title: String,
    pub llm_model_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ConversationRecord> for ConversationResponse {
    fn from(conversation: ConversationRecord) -> Self {
        Self {
            id: conversation.id,
            title: conversation.title,
            llm_model_id: conversation.llm_model_id,
            created_at: conversation.created_at,
            updated_at: conversation.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub role: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<MessageRecord> for MessageResponse {
    fn from(message: MessageRecord) -> Self {
        Self {
            id: message.id,
            conversation_id: message.conversation_id,
            role: message.role.as_str().to_string(),
            content: message.content,
            created_at: message.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConversationDetailResponse {
    #[serde(flatten)]
    pub conversation: ConversationResponse,
    pub messages: Vec<MessageResponse>,
}

impl From<ConversationDetail> for ConversationDetailResponse {
    fn from(detail: ConversationDetail) -> Self {
        Self {
            conversation: detail.conversation.into(),
            messages: detail.messages.into_iter().map(Into::into).collect(),
        }
    }
}

// ============================================================================
// Learning DTOs
// ============================================================================

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProposeLevelsRequest {
    /// 学习目标
    pub goal: String,
    /// 模型名称，缺省使用配置的默认模型
    pub model: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LevelOptionResponse {
    /// beginner | intermediate | advanced | expert
    pub level: String,
    pub title: String,
    pub description: String,
}

impl From<LevelOption> for LevelOptionResponse {
    fn from(option: LevelOption) -> Self {
        Self {
            level: option.level.as_str().to_string(),
            title: option.title,
            description: option.description,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LearningLevelsResponseDto {
    pub conversation: ConversationResponse,
    pub messages: Vec<MessageResponse>,
    pub options: Vec<LevelOptionResponse>,
    pub model: String,
}

impl From<LearningLevelsResponse> for LearningLevelsResponseDto {
    fn from(response: LearningLevelsResponse) -> Self {
        Self {
            conversation: response.conversation.into(),
            messages: response.messages.into_iter().map(Into::into).collect(),
            options: response.options.into_iter().map(Into::into).collect(),
            model: response.model,
        }
    }
}

// ============================================================================
// Course DTOs
// ============================================================================

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCourseRequest {
    pub conversation_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub learning_goal: String,
    /// beginner | intermediate | advanced | expert
    pub level: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCourseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub level: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseResponse {
    pub id: Uuid,
    pub conversation_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub learning_goal: String,
    pub level: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CourseRecord> for CourseResponse {
    fn from(course: CourseRecord) -> Self {
        Self {
            id: course.id,
            conversation_id: course.conversation_id,
            title: course.title,
            description: course.description,
            learning_goal: course.learning_goal,
            level: course.level.as_str().to_string(),
            created_at: course.created_at,
            updated_at: course.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseDetailResponse {
    #[serde(flatten)]
    pub course: CourseResponse,
    pub chapters: Vec<ChapterResponse>,
}

impl From<CourseDetail> for CourseDetailResponse {
    fn from(detail: CourseDetail) -> Self {
        Self {
            course: detail.course.into(),
            chapters: detail.chapters.into_iter().map(Into::into).collect(),
        }
    }
}

// ============================================================================
// Chapter DTOs
// ============================================================================

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateChapterRequest {
    pub title: String,
    pub content: String,
    /// 缺省时追加到末尾
    pub position: Option<u32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateChapterRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub position: Option<u32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChapterResponse {
    pub id: Uuid,
    pub course_id: Uuid,
    pub position: u32,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ChapterRecord> for ChapterResponse {
    fn from(chapter: ChapterRecord) -> Self {
        Self {
            id: chapter.id,
            course_id: chapter.course_id,
            position: chapter.position,
            title: chapter.title,
            content: chapter.content,
            created_at: chapter.created_at,
            updated_at: chapter.updated_at,
        }
    }
}

// ============================================================================
// Quiz DTOs
// ============================================================================

#[derive(Debug, Deserialize, ToSchema)]
pub struct QuestionRequest {
    pub prompt: String,
    pub options: Vec<String>,
    /// 正确选项的下标（从 0 开始）
    pub correct_option: u32,
    pub explanation: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateQuizRequest {
    pub title: String,
    pub questions: Vec<QuestionRequest>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AttemptAnswerRequest {
    pub question_id: Uuid,
    pub selected_option: u32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitAttemptRequest {
    pub responses: Vec<AttemptAnswerRequest>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct QuizResponse {
    pub id: Uuid,
    pub chapter_id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

impl From<QuizRecord> for QuizResponse {
    fn from(quiz: QuizRecord) -> Self {
        Self {
            id: quiz.id,
            chapter_id: quiz.chapter_id,
            title: quiz.title,
            created_at: quiz.created_at,
        }
    }
}

/// 题目（不含答案）
#[derive(Debug, Serialize, ToSchema)]
pub struct QuestionResponse {
    pub id: Uuid,
    pub position: u32,
    pub prompt: String,
    pub options: Vec<String>,
}

impl From<QuestionRecord> for QuestionResponse {
    fn from(question: QuestionRecord) -> Self {
        Self {
            id: question.id,
            position: question.position,
            prompt: question.prompt,
            options: question.options,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct QuizDetailResponse {
    #[serde(flatten)]
    pub quiz: QuizResponse,
    pub questions: Vec<QuestionResponse>,
}

impl From<QuizDetail> for QuizDetailResponse {
    fn from(detail: QuizDetail) -> Self {
        Self {
            quiz: detail.quiz.into(),
            questions: detail.questions.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AttemptAnswerResponse {
    pub question_id: Uuid,
    pub selected_option: u32,
    pub is_correct: bool,
}

impl From<UserQuizResponseRecord> for AttemptAnswerResponse {
    fn from(response: UserQuizResponseRecord) -> Self {
        Self {
            question_id: response.question_id,
            selected_option: response.selected_option,
            is_correct: response.is_correct,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AttemptResponse {
    pub id: Uuid,
    pub quiz_id: Uuid,
    pub score: u32,
    pub total: u32,
    /// 0 - 100
    pub percentage: f64,
    pub created_at: DateTime<Utc>,
    pub responses: Vec<AttemptAnswerResponse>,
}

impl From<AttemptDetail> for AttemptResponse {
    fn from(detail: AttemptDetail) -> Self {
        let percentage = quiz::percentage(detail.attempt.score, detail.attempt.total);
        Self {
            id: detail.attempt.id,
            quiz_id: detail.attempt.quiz_id,
            score: detail.attempt.score,
            total: detail.attempt.total,
            percentage,
            created_at: detail.attempt.created_at,
            responses: detail.responses.into_iter().map(Into::into).collect(),
        }
    }
}
