//! SQLite Conversation Repository

use async_trait::async_trait;
use sqlx::FromRow;
use uuid::Uuid;

use super::database::{map_sqlx_error, parse_timestamp, parse_uuid, DbPool};
use crate::application::ports::{
    ConversationRecord, ConversationRepositoryPort, MessageRecord, RepositoryError,
};
use crate::domain::conversation::MessageRole;

/// SQLite Conversation Repository
pub struct SqliteConversationRepository {
    pool: DbPool,
}

impl SqliteConversationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct ConversationRow {
    id: String,
    user_id: String,
    title: String,
    llm_model_id: Option<String>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<ConversationRow> for ConversationRecord {
    type Error = RepositoryError;

    fn try_from(row: ConversationRow) -> Result<Self, Self::Error> {
        Ok(ConversationRecord {
            id: parse_uuid(&row.id)?,
            user_id: row.user_id,
            title: row.title,
            llm_model_id: row.llm_model_id.as_deref().map(parse_uuid).transpose()?,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

#[derive(FromRow)]
struct MessageRow {
    id: String,
    conversation_id: String,
    role: String,
    content: String,
    created_at: String,
}

impl TryFrom<MessageRow> for MessageRecord {
    type Error = RepositoryError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        let role: MessageRole = row.role.parse().map_err(|_| {
            RepositoryError::SerializationError(format!("unknown message role: {}", row.role))
        })?;
        Ok(MessageRecord {
            id: parse_uuid(&row.id)?,
            conversation_id: parse_uuid(&row.conversation_id)?,
            role,
            content: row.content,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}

#[async_trait]
impl ConversationRepositoryPort for SqliteConversationRepository {
    async fn save(&self, conversation: &ConversationRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO conversations (id, user_id, title, llm_model_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(conversation.id.to_string())
        .bind(&conversation.user_id)
        .bind(&conversation.title)
        .bind(conversation.llm_model_id.map(|id| id.to_string()))
        .bind(conversation.created_at.to_rfc3339())
        .bind(conversation.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn update(&self, conversation: &ConversationRecord) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE conversations SET title = ?, llm_model_id = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&conversation.title)
        .bind(conversation.llm_model_id.map(|id| id.to_string()))
        .bind(conversation.updated_at.to_rfc3339())
        .bind(conversation.id.to_string())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!(
                "Conversation {}",
                conversation.id
            )));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ConversationRecord>, RepositoryError> {
        let row: Option<ConversationRow> = sqlx::query_as(
            "SELECT id, user_id, title, llm_model_id, created_at, updated_at FROM conversations WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(ConversationRecord::try_from).transpose()
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<ConversationRecord>, RepositoryError> {
        let rows: Vec<ConversationRow> = sqlx::query_as(
            "SELECT id, user_id, title, llm_model_id, created_at, updated_at FROM conversations WHERE user_id = ? ORDER BY updated_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(ConversationRecord::try_from).collect()
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        // messages 通过 ON DELETE CASCADE 一并删除
        sqlx::query("DELETE FROM conversations WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn append_message(&self, message: &MessageRecord) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        sqlx::query(
            r#"
            INSERT INTO messages (id, conversation_id, role, content, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(message.id.to_string())
        .bind(message.conversation_id.to_string())
        .bind(message.role.as_str())
        .bind(&message.content)
        .bind(message.created_at.to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        sqlx::query("UPDATE conversations SET updated_at = ? WHERE id = ?")
            .bind(message.created_at.to_rfc3339())
            .bind(message.conversation_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn find_messages(
        &self,
        conversation_id: Uuid,
    ) -> Result<Vec<MessageRecord>, RepositoryError> {
        // 同一时间戳的消息按插入顺序返回
        let rows: Vec<MessageRow> = sqlx::query_as(
            "SELECT id, conversation_id, role, content, created_at FROM messages WHERE conversation_id = ? ORDER BY created_at ASC, rowid ASC",
        )
        .bind(conversation_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(MessageRecord::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{ConstraintKind, UserRecord, UserRepositoryPort};
    use crate::infrastructure::persistence::sqlite::{
        create_pool, run_migrations, DatabaseConfig, SqliteUserRepository,
    };
    use chrono::Utc;

    async fn setup() -> SqliteConversationRepository {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        let now = Utc::now();
        SqliteUserRepository::new(pool.clone())
            .insert_if_absent(&UserRecord {
                id: "owner".into(),
                email: None,
                name: None,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
        SqliteConversationRepository::new(pool)
    }

    fn conversation(user_id: &str) -> ConversationRecord {
        let now = Utc::now();
        ConversationRecord {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            title: "Learn Rust".to_string(),
            llm_model_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn message(conversation_id: Uuid, role: MessageRole, content: &str) -> MessageRecord {
        MessageRecord {
            id: Uuid::new_v4(),
            conversation_id,
            role,
            content: content.to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_messages_are_ordered_and_cascade_on_delete() {
        let repo = setup().await;
        let conv = conversation("owner");
        repo.save(&conv).await.unwrap();

        repo.append_message(&message(conv.id, MessageRole::User, "first"))
            .await
            .unwrap();
        repo.append_message(&message(conv.id, MessageRole::Assistant, "second"))
            .await
            .unwrap();

        let messages = repo.find_messages(conv.id).await.unwrap();
        let contents: Vec<_> = messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second"]);
        assert_eq!(messages[1].role, MessageRole::Assistant);

        repo.delete(conv.id).await.unwrap();
        assert!(repo.find_by_id(conv.id).await.unwrap().is_none());
        assert!(repo.find_messages(conv.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_conversation_for_unknown_user_is_foreign_key_violation() {
        let repo = setup().await;
        match repo.save(&conversation("nobody")).await {
            Err(RepositoryError::Constraint(v)) => assert_eq!(v.kind, ConstraintKind::ForeignKey),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_message_for_missing_conversation_is_rejected() {
        let repo = setup().await;
        let result = repo
            .append_message(&message(Uuid::new_v4(), MessageRole::User, "orphan"))
            .await;
        assert!(matches!(result, Err(RepositoryError::Constraint(_))));
    }
}
