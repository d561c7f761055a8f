//! Conversation Query Handlers

use std::sync::Arc;

use crate::application::access::owned_conversation;
use crate::application::error::ApplicationError;
use crate::application::ports::{ConversationRecord, ConversationRepositoryPort, MessageRecord};
use crate::application::queries::{GetConversation, ListConversations};

// ============================================================================
// Response DTOs
// ============================================================================

/// 对话详情
#[derive(Debug, Clone)]
pub struct ConversationDetail {
    pub conversation: ConversationRecord,
    pub messages: Vec<MessageRecord>,
}

// ============================================================================
// Handlers
// ============================================================================

/// ListConversations Handler
pub struct ListConversationsHandler {
    conversation_repo: Arc<dyn ConversationRepositoryPort>,
}

impl ListConversationsHandler {
    pub fn new(conversation_repo: Arc<dyn ConversationRepositoryPort>) -> Self {
        Self { conversation_repo }
    }

    pub async fn handle(
        &self,
        query: ListConversations,
    ) -> Result<Vec<ConversationRecord>, ApplicationError> {
        Ok(self.conversation_repo.find_by_user(&query.user_id).await?)
    }
}

/// GetConversation Handler
pub struct GetConversationHandler {
    conversation_repo: Arc<dyn ConversationRepositoryPort>,
}

impl GetConversationHandler {
    pub fn new(conversation_repo: Arc<dyn ConversationRepositoryPort>) -> Self {
        Self { conversation_repo }
    }

    pub async fn handle(
        &self,
        query: GetConversation,
    ) -> Result<ConversationDetail, ApplicationError> {
        let conversation = owned_conversation(
            self.conversation_repo.as_ref(),
            query.conversation_id,
            &query.user_id,
        )
        .await?;
        let messages = self
            .conversation_repo
            .find_messages(conversation.id)
            .await?;

        Ok(ConversationDetail {
            conversation,
            messages,
        })
    }
}
