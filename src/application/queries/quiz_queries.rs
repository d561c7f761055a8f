//! Quiz Queries

use uuid::Uuid;

/// 列出章节下的测验
#[derive(Debug, Clone)]
pub struct ListQuizzes {
    pub user_id: String,
    pub chapter_id: Uuid,
}

/// 获取测验详情（含题目）
#[derive(Debug, Clone)]
pub struct GetQuiz {
    pub user_id: String,
    pub quiz_id: Uuid,
}

/// 列出用户在某测验上的作答
#[derive(Debug, Clone)]
pub struct ListQuizAttempts {
    pub user_id: String,
    pub quiz_id: Uuid,
}
