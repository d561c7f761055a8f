//! Quiz Commands

use uuid::Uuid;

/// 题目输入
#[derive(Debug, Clone)]
pub struct QuestionInput {
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_option: u32,
    pub explanation: Option<String>,
}

/// 创建测验命令
#[derive(Debug, Clone)]
pub struct CreateQuiz {
    pub user_id: String,
    pub chapter_id: Uuid,
    pub title: String,
    pub questions: Vec<QuestionInput>,
}

/// 删除测验命令
#[derive(Debug, Clone)]
pub struct DeleteQuiz {
    pub user_id: String,
    pub quiz_id: Uuid,
}

/// 单题作答输入
#[derive(Debug, Clone, Copy)]
pub struct ResponseInput {
    pub question_id: Uuid,
    pub selected_option: u32,
}

/// 提交测验作答命令
#[derive(Debug, Clone)]
pub struct SubmitQuizAttempt {
    pub user_id: String,
    pub quiz_id: Uuid,
    pub responses: Vec<ResponseInput>,
}
