//! Course Query Handlers

use std::sync::Arc;

use crate::application::access::{owned_chapter, owned_course};
use crate::application::error::ApplicationError;
use crate::application::ports::{ChapterRecord, CourseRecord, CourseRepositoryPort};
use crate::application::queries::{GetChapter, GetCourse, ListCourses};

/// 课程详情
#[derive(Debug, Clone)]
pub struct CourseDetail {
    pub course: CourseRecord,
    pub chapters: Vec<ChapterRecord>,
}

/// ListCourses Handler
pub struct ListCoursesHandler {
    course_repo: Arc<dyn CourseRepositoryPort>,
}

impl ListCoursesHandler {
    pub fn new(course_repo: Arc<dyn CourseRepositoryPort>) -> Self {
        Self { course_repo }
    }

    pub async fn handle(&self, query: ListCourses) -> Result<Vec<CourseRecord>, ApplicationError> {
        Ok(self.course_repo.find_by_user(&query.user_id).await?)
    }
}

/// GetCourse Handler
pub struct GetCourseHandler {
    course_repo: Arc<dyn CourseRepositoryPort>,
}

impl GetCourseHandler {
    pub fn new(course_repo: Arc<dyn CourseRepositoryPort>) -> Self {
        Self { course_repo }
    }

    pub async fn handle(&self, query: GetCourse) -> Result<CourseDetail, ApplicationError> {
        let course =
            owned_course(self.course_repo.as_ref(), query.course_id, &query.user_id).await?;
        let chapters = self.course_repo.find_chapters(course.id).await?;
        Ok(CourseDetail { course, chapters })
    }
}

/// GetChapter Handler
pub struct GetChapterHandler {
    course_repo: Arc<dyn CourseRepositoryPort>,
}

impl GetChapterHandler {
    pub fn new(course_repo: Arc<dyn CourseRepositoryPort>) -> Self {
        Self { course_repo }
    }

    pub async fn handle(&self, query: GetChapter) -> Result<ChapterRecord, ApplicationError> {
        let (_, chapter) =
            owned_chapter(self.course_repo.as_ref(), query.chapter_id, &query.user_id).await?;
        Ok(chapter)
    }
}
