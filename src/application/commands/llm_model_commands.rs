//! LLM Model Commands

/// 启动时确保默认模型存在
#[derive(Debug, Clone)]
pub struct EnsureLlmModel {
    pub name: String,
    pub provider: String,
}

/// 登记新模型命令
#[derive(Debug, Clone)]
pub struct CreateLlmModel {
    pub name: String,
    pub provider: String,
    pub description: Option<String>,
}
