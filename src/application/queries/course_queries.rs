//! Course Queries

use uuid::Uuid;

/// 列出用户的课程
#[derive(Debug, Clone)]
pub struct ListCourses {
    pub user_id: String,
}

/// 获取课程详情（含章节）
#[derive(Debug, Clone)]
pub struct GetCourse {
    pub user_id: String,
    pub course_id: Uuid,
}

/// 获取章节详情
#[derive(Debug, Clone)]
pub struct GetChapter {
    pub user_id: String,
    pub chapter_id: Uuid,
}
