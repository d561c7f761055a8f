//! Conversation Commands

use uuid::Uuid;

/// 创建对话命令
#[derive(Debug, Clone)]
pub struct CreateConversation {
    pub user_id: String,
    pub title: String,
    pub llm_model_id: Option<Uuid>,
}

/// 重命名对话命令
#[derive(Debug, Clone)]
pub struct RenameConversation {
    pub user_id: String,
    pub conversation_id: Uuid,
    pub title: String,
}

/// 删除对话命令
#[derive(Debug, Clone)]
pub struct DeleteConversation {
    pub user_id: String,
    pub conversation_id: Uuid,
}

/// 追加消息命令
#[derive(Debug, Clone)]
pub struct AddMessage {
    pub user_id: String,
    pub conversation_id: Uuid,
    pub role: String,
    pub content: String,
}
