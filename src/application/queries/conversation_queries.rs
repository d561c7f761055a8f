//! Conversation Queries

use uuid::Uuid;

/// 列出用户的对话
#[derive(Debug, Clone)]
pub struct ListConversations {
    pub user_id: String,
}

/// 获取对话详情（含消息）
#[derive(Debug, Clone)]
pub struct GetConversation {
    pub user_id: String,
    pub conversation_id: Uuid,
}
