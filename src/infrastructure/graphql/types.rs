//! GraphQL 输出/输入类型

use async_graphql::{InputObject, SimpleObject};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::application::{
    ChapterRecord, ConversationDetail, ConversationRecord, CourseDetail, CourseRecord,
    LearningLevelsResponse, LlmModelRecord, MessageRecord, UserRecord,
};
use crate::domain::conversation::LevelOption;

#[derive(SimpleObject, Clone, Debug)]
#[graphql(name = "User")]
pub struct GqlUser {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRecord> for GqlUser {
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

#[derive(SimpleObject, Clone, Debug)]
#[graphql(name = "LlmModel")]
pub struct GqlLlmModel {
    pub id: Uuid,
    pub name: String,
    pub provider: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<LlmModelRecord> for GqlLlmModel {
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

#[derive(SimpleObject, Clone, Debug)]
#[graphql(name = "Conversation")]
pub struct GqlConversation {
    pub id: Uuid,
    pub title: String,
    pub llm_model_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ConversationRecord> for GqlConversation {
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

#[derive(SimpleObject, Clone, Debug)]
#[graphql(name = "Message")]
pub struct GqlMessage {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub role: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<MessageRecord> for GqlMessage {
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

/// 对话及其按时间排序的消息
#[derive(SimpleObject, Clone, Debug)]
#[graphql(name = "ConversationDetail")]
pub struct GqlConversationDetail {
    pub conversation: GqlConversation,
    pub messages: Vec<GqlMessage>,
}

impl From<ConversationDetail> for GqlConversationDetail {
    fn from(detail: ConversationDetail) -> Self {
        Self {
            conversation: detail.conversation.into(),
            messages: detail.messages.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(SimpleObject, Clone, Debug)]
#[graphql(name = "Course")]
pub struct GqlCourse {
    pub id: Uuid,
    pub conversation_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub learning_goal: String,
    pub level: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CourseRecord> for GqlCourse {
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

#[derive(SimpleObject, Clone, Debug)]
#[graphql(name = "Chapter")]
pub struct GqlChapter {
    pub id: Uuid,
    pub course_id: Uuid,
    pub position: u32,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ChapterRecord> for GqlChapter {
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

#[derive(SimpleObject, Clone, Debug)]
#[graphql(name = "CourseDetail")]
pub struct GqlCourseDetail {
    pub course: GqlCourse,
    pub chapters: Vec<GqlChapter>,
}

impl From<CourseDetail> for GqlCourseDetail {
    fn from(detail: CourseDetail) -> Self {
        Self {
            course: detail.course.into(),
            chapters: detail.chapters.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(SimpleObject, Clone, Debug)]
#[graphql(name = "LevelOption")]
pub struct GqlLevelOption {
    pub level: String,
    pub title: String,
    pub description: String,
}

impl From<LevelOption> for GqlLevelOption {
    fn from(option: LevelOption) -> Self {
        Self {
            level: option.level.as_str().to_string(),
            title: option.title,
            description: option.description,
        }
    }
}

#[derive(SimpleObject, Clone, Debug)]
#[graphql(name = "LearningLevels")]
pub struct GqlLearningLevels {
    pub conversation: GqlConversation,
    pub messages: Vec<GqlMessage>,
    pub options: Vec<GqlLevelOption>,
    pub model: String,
}

impl From<LearningLevelsResponse> for GqlLearningLevels {
    fn from(response: LearningLevelsResponse) -> Self {
        Self {
            conversation: response.conversation.into(),
            messages: response.messages.into_iter().map(Into::into).collect(),
            options: response.options.into_iter().map(Into::into).collect(),
            model: response.model,
        }
    }
}

#[derive(InputObject, Debug)]
pub struct CreateCourseInput {
    pub conversation_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub learning_goal: String,
    /// beginner | intermediate | advanced | expert
    pub level: String,
}

#[derive(InputObject, Debug)]
pub struct UpdateCourseInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub level: Option<String>,
}
