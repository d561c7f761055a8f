//! Conversation Command Handlers

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::access::owned_conversation;
use crate::application::commands::{
    AddMessage, CreateConversation, DeleteConversation, RenameConversation,
};
use crate::application::error::ApplicationError;
use crate::application::ports::{ConversationRecord, ConversationRepositoryPort, MessageRecord};
use crate::domain::conversation::{MessageContent, MessageRole};
use crate::domain::Title;

// ============================================================================
// CreateConversation
// ============================================================================

/// CreateConversation Handler
pub struct CreateConversationHandler {
    conversation_repo: Arc<dyn ConversationRepositoryPort>,
}

impl CreateConversationHandler {
    pub fn new(conversation_repo: Arc<dyn ConversationRepositoryPort>) -> Self {
        Self { conversation_repo }
    }

    pub async fn handle(
        &self,
        command: CreateConversation,
    ) -> Result<ConversationRecord, ApplicationError> {
        let title = Title::parse("title", &command.title)?;
        let now = Utc::now();

        let conversation = ConversationRecord {
            id: Uuid::new_v4(),
            user_id: command.user_id,
            title: title.into_inner(),
            llm_model_id: command.llm_model_id,
            created_at: now,
            updated_at: now,
        };

        self.conversation_repo.save(&conversation).await?;

        tracing::info!(
            conversation_id = %conversation.id,
            user_id = %conversation.user_id,
            "Conversation created"
        );

        Ok(conversation)
    }
}

// ============================================================================
// RenameConversation
// ============================================================================

/// RenameConversation Handler
pub struct RenameConversationHandler {
    conversation_repo: Arc<dyn ConversationRepositoryPort>,
}

impl RenameConversationHandler {
    pub fn new(conversation_repo: Arc<dyn ConversationRepositoryPort>) -> Self {
        Self { conversation_repo }
    }

    pub async fn handle(
        &self,
        command: RenameConversation,
    ) -> Result<ConversationRecord, ApplicationError> {
        let title = Title::parse("title", &command.title)?;
        let mut conversation = owned_conversation(
            self.conversation_repo.as_ref(),
            command.conversation_id,
            &command.user_id,
        )
        .await?;

        conversation.title = title.into_inner();
        conversation.updated_at = Utc::now();
        self.conversation_repo.update(&conversation).await?;

        Ok(conversation)
    }
}

// ============================================================================
// DeleteConversation
// ============================================================================

/// DeleteConversation Handler
pub struct DeleteConversationHandler {
    conversation_repo: Arc<dyn ConversationRepositoryPort>,
}

impl DeleteConversationHandler {
    pub fn new(conversation_repo: Arc<dyn ConversationRepositoryPort>) -> Self {
        Self { conversation_repo }
    }

    pub async fn handle(&self, command: DeleteConversation) -> Result<(), ApplicationError> {
        let conversation = owned_conversation(
            self.conversation_repo.as_ref(),
            command.conversation_id,
            &command.user_id,
        )
        .await?;

        self.conversation_repo.delete(conversation.id).await?;

        tracing::info!(conversation_id = %conversation.id, "Conversation deleted");

        Ok(())
    }
}

// ============================================================================
// AddMessage
// ============================================================================

/// AddMessage Handler
pub struct AddMessageHandler {
    conversation_repo: Arc<dyn ConversationRepositoryPort>,
}

impl AddMessageHandler {
    pub fn new(conversation_repo: Arc<dyn ConversationRepositoryPort>) -> Self {
        Self { conversation_repo }
    }

    pub async fn handle(&self, command: AddMessage) -> Result<MessageRecord, ApplicationError> {
        let role = MessageRole::parse("role", &command.role)?;
        let content = MessageContent::parse("content", &command.content)?;
        let conversation = owned_conversation(
            self.conversation_repo.as_ref(),
            command.conversation_id,
            &command.user_id,
        )
        .await?;

        let message = MessageRecord {
            id: Uuid::new_v4(),
            conversation_id: conversation.id,
            role,
            content: content.into_inner(),
            created_at: Utc::now(),
        };
        self.conversation_repo.append_message(&message).await?;

        Ok(message)
    }
}
