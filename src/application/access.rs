//! 资源归属校验
//!
//! 课程、对话、测验均只能由创建者访问：
//! - 记录不存在 → NotFound
//! - 记录属于其他用户 → Forbidden

use uuid::Uuid;

use crate::application::error::ApplicationError;
use crate::application::ports::{
    ChapterRecord, ConversationRecord, ConversationRepositoryPort, CourseRecord,
    CourseRepositoryPort, QuizRecord, QuizRepositoryPort,
};

pub(crate) async fn owned_conversation(
    repo: &dyn ConversationRepositoryPort,
    conversation_id: Uuid,
    user_id: &str,
) -> Result<ConversationRecord, ApplicationError> {
    let conversation = repo
        .find_by_id(conversation_id)
        .await?
        .ok_or_else(|| ApplicationError::not_found("Conversation", conversation_id))?;
    if conversation.user_id != user_id {
        return Err(ApplicationError::forbidden("Conversation", conversation_id));
    }
    Ok(conversation)
}

pub(crate) async fn owned_course(
    repo: &dyn CourseRepositoryPort,
    course_id: Uuid,
    user_id: &str,
) -> Result<CourseRecord, ApplicationError> {
    let course = repo
        .find_by_id(course_id)
        .await?
        .ok_or_else(|| ApplicationError::not_found("Course", course_id))?;
    if course.user_id != user_id {
        return Err(ApplicationError::forbidden("Course", course_id));
    }
    Ok(course)
}

pub(crate) async fn owned_chapter(
    repo: &dyn CourseRepositoryPort,
    chapter_id: Uuid,
    user_id: &str,
) -> Result<(CourseRecord, ChapterRecord), ApplicationError> {
    let chapter = repo
        .find_chapter(chapter_id)
        .await?
        .ok_or_else(|| ApplicationError::not_found("Chapter", chapter_id))?;
    let course = owned_course(repo, chapter.course_id, user_id)
        .await
        .map_err(|e| match e {
            ApplicationError::Forbidden(_) => ApplicationError::forbidden("Chapter", chapter_id),
            other => other,
        })?;
    Ok((course, chapter))
}

pub(crate) async fn owned_quiz(
    quiz_repo: &dyn QuizRepositoryPort,
    course_repo: &dyn CourseRepositoryPort,
    quiz_id: Uuid,
    user_id: &str,
) -> Result<QuizRecord, ApplicationError> {
    let quiz = quiz_repo
        .find_by_id(quiz_id)
        .await?
        .ok_or_else(|| ApplicationError::not_found("Quiz", quiz_id))?;
    owned_chapter(course_repo, quiz.chapter_id, user_id)
        .await
        .map_err(|e| match e {
            ApplicationError::Forbidden(_) => ApplicationError::forbidden("Quiz", quiz_id),
            other => other,
        })?;
    Ok(quiz)
}
