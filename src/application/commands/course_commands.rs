//! Course Commands

use uuid::Uuid;

/// 创建课程命令
#[derive(Debug, Clone)]
pub struct CreateCourse {
    pub user_id: String,
    pub conversation_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub learning_goal: String,
    pub level: String,
}

/// 更新课程命令（None 表示不修改，description 为空串表示清空）
#[derive(Debug, Clone)]
pub struct UpdateCourse {
    pub user_id: String,
    pub course_id: Uuid,
    pub title: Option<String>,
    pub description: Option<String>,
    pub level: Option<String>,
}

/// 删除课程命令
#[derive(Debug, Clone)]
pub struct DeleteCourse {
    pub user_id: String,
    pub course_id: Uuid,
}

/// 创建章节命令
#[derive(Debug, Clone)]
pub struct CreateChapter {
    pub user_id: String,
    pub course_id: Uuid,
    pub title: String,
    pub content: String,
    /// 为空时追加到末尾
    pub position: Option<u32>,
}

/// 更新章节命令
#[derive(Debug, Clone)]
pub struct UpdateChapter {
    pub user_id: String,
    pub chapter_id: Uuid,
    pub title: Option<String>,
    pub content: Option<String>,
    pub position: Option<u32>,
}

/// 删除章节命令
#[derive(Debug, Clone)]
pub struct DeleteChapter {
    pub user_id: String,
    pub chapter_id: Uuid,
}
