//! Course Command Handlers

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::access::{owned_chapter, owned_conversation, owned_course};
use crate::application::commands::{
    CreateChapter, CreateCourse, DeleteChapter, DeleteCourse, UpdateChapter, UpdateCourse,
};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    ChapterRecord, ConversationRepositoryPort, CourseRecord, CourseRepositoryPort,
};
use crate::domain::course::{ChapterPosition, LearningGoal, LearningLevel};
use crate::domain::{optional_text, DomainError, Title};

const MAX_DESCRIPTION_CHARS: usize = 2000;
const MAX_CHAPTER_CONTENT_CHARS: usize = 100_000;

fn chapter_content(raw: &str) -> Result<String, ApplicationError> {
    if raw.chars().count() > MAX_CHAPTER_CONTENT_CHARS {
        return Err(ApplicationError::validation(
            "content",
            format!("must be at most {} characters", MAX_CHAPTER_CONTENT_CHARS),
        ));
    }
    Ok(raw.to_string())
}

// ============================================================================
// CreateCourse
// ============================================================================

/// CreateCourse Handler
pub struct CreateCourseHandler {
    course_repo: Arc<dyn CourseRepositoryPort>,
    conversation_repo: Arc<dyn ConversationRepositoryPort>,
}

impl CreateCourseHandler {
    pub fn new(
        course_repo: Arc<dyn CourseRepositoryPort>,
        conversation_repo: Arc<dyn ConversationRepositoryPort>,
    ) -> Self {
        Self {
            course_repo,
            conversation_repo,
        }
    }

    pub async fn handle(&self, command: CreateCourse) -> Result<CourseRecord, ApplicationError> {
        let title = Title::parse("title", &command.title)?;
        let description = optional_text(
            "description",
            command.description.as_deref(),
            MAX_DESCRIPTION_CHARS,
        )?;
        let goal = LearningGoal::parse("learning_goal", &command.learning_goal)?;
        let level = LearningLevel::parse("level", &command.level)?;

        // 关联的对话必须属于当前用户
        if let Some(conversation_id) = command.conversation_id {
            owned_conversation(
                self.conversation_repo.as_ref(),
                conversation_id,
                &command.user_id,
            )
            .await?;
        }

        let now = Utc::now();
        let course = CourseRecord {
            id: Uuid::new_v4(),
            user_id: command.user_id,
            conversation_id: command.conversation_id,
            title: title.into_inner(),
            description,
            learning_goal: goal.as_str().to_string(),
            level,
            created_at: now,
            updated_at: now,
        };

        self.course_repo.save(&course).await?;

        tracing::info!(
            course_id = %course.id,
            user_id = %course.user_id,
            level = %course.level,
            "Course created"
        );

        Ok(course)
    }
}

// ============================================================================
// UpdateCourse
// ============================================================================

/// UpdateCourse Handler
pub struct UpdateCourseHandler {
    course_repo: Arc<dyn CourseRepositoryPort>,
}

impl UpdateCourseHandler {
    pub fn new(course_repo: Arc<dyn CourseRepositoryPort>) -> Self {
        Self { course_repo }
    }

    pub async fn handle(&self, command: UpdateCourse) -> Result<CourseRecord, ApplicationError> {
        let title = command
            .title
            .as_deref()
            .map(|t| Title::parse("title", t))
            .transpose()?;
        let level = command
            .level
            .as_deref()
            .map(|l| LearningLevel::parse("level", l))
            .transpose()?;
        let description = match command.description.as_deref() {
            Some(raw) => Some(optional_text("description", Some(raw), MAX_DESCRIPTION_CHARS)?),
            None => None,
        };

        let mut course =
            owned_course(self.course_repo.as_ref(), command.course_id, &command.user_id).await?;

        if let Some(title) = title {
            course.title = title.into_inner();
        }
        if let Some(level) = level {
            course.level = level;
        }
        if let Some(description) = description {
            course.description = description;
        }
        course.updated_at = Utc::now();

        self.course_repo.update(&course).await?;

        Ok(course)
    }
}

// ============================================================================
// DeleteCourse
// ============================================================================

/// DeleteCourse Handler
pub struct DeleteCourseHandler {
    course_repo: Arc<dyn CourseRepositoryPort>,
}

impl DeleteCourseHandler {
    pub fn new(course_repo: Arc<dyn CourseRepositoryPort>) -> Self {
        Self { course_repo }
    }

    pub async fn handle(&self, command: DeleteCourse) -> Result<(), ApplicationError> {
        let course =
            owned_course(self.course_repo.as_ref(), command.course_id, &command.user_id).await?;

        self.course_repo.delete(course.id).await?;

        tracing::info!(course_id = %course.id, title = %course.title, "Course deleted");

        Ok(())
    }
}

// ============================================================================
// CreateChapter
// ============================================================================

/// CreateChapter Handler
pub struct CreateChapterHandler {
    course_repo: Arc<dyn CourseRepositoryPort>,
}

impl CreateChapterHandler {
    pub fn new(course_repo: Arc<dyn CourseRepositoryPort>) -> Self {
        Self { course_repo }
    }

    pub async fn handle(&self, command: CreateChapter) -> Result<ChapterRecord, ApplicationError> {
        let title = Title::parse("title", &command.title)?;
        let content = chapter_content(&command.content)?;
        let explicit_position = command
            .position
            .map(|p| ChapterPosition::parse("position", p))
            .transpose()?;

        let course =
            owned_course(self.course_repo.as_ref(), command.course_id, &command.user_id).await?;

        let now = Utc::now();
        let mut chapter = ChapterRecord {
            id: Uuid::new_v4(),
            course_id: course.id,
            position: explicit_position.map_or(0, |p| p.value()),
            title: title.into_inner(),
            content,
            created_at: now,
            updated_at: now,
        };

        match explicit_position {
            // (course_id, position) 唯一，占用时由数据库约束报告冲突
            Some(_) => self.course_repo.save_chapter(&chapter).await?,
            None => {
                chapter.position = self
                    .course_repo
                    .append_chapter(&chapter, ChapterPosition::MAX)
                    .await?
                    .ok_or_else(|| {
                        DomainError::invalid(
                            "position",
                            format!(
                                "course already has a chapter at position {}",
                                ChapterPosition::MAX
                            ),
                        )
                    })?;
            }
        }

        tracing::info!(
            chapter_id = %chapter.id,
            course_id = %course.id,
            position = chapter.position,
            "Chapter created"
        );

        Ok(chapter)
    }
}

// ============================================================================
// UpdateChapter
// ============================================================================

/// UpdateChapter Handler
pub struct UpdateChapterHandler {
    course_repo: Arc<dyn CourseRepositoryPort>,
}

impl UpdateChapterHandler {
    pub fn new(course_repo: Arc<dyn CourseRepositoryPort>) -> Self {
        Self { course_repo }
    }

    pub async fn handle(&self, command: UpdateChapter) -> Result<ChapterRecord, ApplicationError> {
        let title = command
            .title
            .as_deref()
            .map(|t| Title::parse("title", t))
            .transpose()?;
        let content = command.content.as_deref().map(chapter_content).transpose()?;
        let position = command
            .position
            .map(|p| ChapterPosition::parse("position", p))
            .transpose()?;

        let (_, mut chapter) =
            owned_chapter(self.course_repo.as_ref(), command.chapter_id, &command.user_id).await?;

        if let Some(title) = title {
            chapter.title = title.into_inner();
        }
        if let Some(content) = content {
            chapter.content = content;
        }
        if let Some(position) = position {
            chapter.position = position.value();
        }
        chapter.updated_at = Utc::now();

        self.course_repo.update_chapter(&chapter).await?;

        Ok(chapter)
    }
}

// ============================================================================
// DeleteChapter
// ============================================================================

/// DeleteChapter Handler
pub struct DeleteChapterHandler {
    course_repo: Arc<dyn CourseRepositoryPort>,
}

impl DeleteChapterHandler {
    pub fn new(course_repo: Arc<dyn CourseRepositoryPort>) -> Self {
        Self { course_repo }
    }

    pub async fn handle(&self, command: DeleteChapter) -> Result<(), ApplicationError> {
        let (course, chapter) =
            owned_chapter(self.course_repo.as_ref(), command.chapter_id, &command.user_id).await?;

        self.course_repo.delete_chapter(chapter.id).await?;

        tracing::info!(chapter_id = %chapter.id, course_id = %course.id, "Chapter deleted");

        Ok(())
    }
}
