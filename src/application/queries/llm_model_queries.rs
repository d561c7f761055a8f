//! LLM Model Queries

/// 列出所有启用的模型
#[derive(Debug, Clone)]
pub struct ListLlmModels;
