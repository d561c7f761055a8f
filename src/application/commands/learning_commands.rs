//! Learning Commands

/// 提交学习目标，请求 LLM 给出学习级别建议
#[derive(Debug, Clone)]
pub struct ProposeLearningLevels {
    pub user_id: String,
    pub goal: String,
    /// 模型名称，为空时使用默认模型
    pub model: Option<String>,
}
