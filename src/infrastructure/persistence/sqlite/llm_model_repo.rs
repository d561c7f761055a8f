//! SQLite LLM Model Repository

use async_trait::async_trait;
use sqlx::FromRow;
use uuid::Uuid;

use super::database::{map_sqlx_error, parse_timestamp, parse_uuid, DbPool};
use crate::application::ports::{LlmModelRecord, LlmModelRepositoryPort, RepositoryError};

/// SQLite LLM Model Repository
pub struct SqliteLlmModelRepository {
    pool: DbPool,
}

impl SqliteLlmModelRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct LlmModelRow {
    id: String,
    name: String,
    provider: String,
    description: Option<String>,
    is_active: bool,
    created_at: String,
}

impl TryFrom<LlmModelRow> for LlmModelRecord {
    type Error = RepositoryError;

    fn try_from(row: LlmModelRow) -> Result<Self, Self::Error> {
        Ok(LlmModelRecord {
            id: parse_uuid(&row.id)?,
            name: row.name,
            provider: row.provider,
            description: row.description,
            is_active: row.is_active,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}

const SELECT_COLUMNS: &str = "SELECT id, name, provider, description, is_active, created_at FROM llm_models";

#[async_trait]
impl LlmModelRepositoryPort for SqliteLlmModelRepository {
    async fn save(&self, model: &LlmModelRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO llm_models (id, name, provider, description, is_active, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(model.id.to_string())
        .bind(&model.name)
        .bind(&model.provider)
        .bind(&model.description)
        .bind(model.is_active)
        .bind(model.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<LlmModelRecord>, RepositoryError> {
        let row: Option<LlmModelRow> = sqlx::query_as(&format!("{} WHERE id = ?", SELECT_COLUMNS))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(LlmModelRecord::try_from).transpose()
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<LlmModelRecord>, RepositoryError> {
        let row: Option<LlmModelRow> =
            sqlx::query_as(&format!("{} WHERE name = ?", SELECT_COLUMNS))
                .bind(name)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        row.map(LlmModelRecord::try_from).transpose()
    }

    async fn find_active(&self) -> Result<Vec<LlmModelRecord>, RepositoryError> {
        let rows: Vec<LlmModelRow> =
            sqlx::query_as(&format!("{} WHERE is_active = 1 ORDER BY name", SELECT_COLUMNS))
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        rows.into_iter().map(LlmModelRecord::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::ConstraintKind;
    use crate::infrastructure::persistence::sqlite::{create_pool, run_migrations, DatabaseConfig};
    use chrono::Utc;

    async fn setup() -> SqliteLlmModelRepository {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteLlmModelRepository::new(pool)
    }

    fn model(name: &str, is_active: bool) -> LlmModelRecord {
        LlmModelRecord {
            id: Uuid::new_v4(),
            name: name.to_string(),
            provider: "openai".to_string(),
            description: None,
            is_active,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_find_active_skips_disabled_models() {
        let repo = setup().await;
        repo.save(&model("gpt-4o-mini", true)).await.unwrap();
        repo.save(&model("legacy", false)).await.unwrap();

        let active = repo.find_active().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "gpt-4o-mini");
        assert!(repo.find_by_name("legacy").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_duplicate_name_is_rejected() {
        let repo = setup().await;
        repo.save(&model("gpt-4o-mini", true)).await.unwrap();
        match repo.save(&model("gpt-4o-mini", true)).await {
            Err(RepositoryError::Constraint(v)) => assert_eq!(v.kind, ConstraintKind::Unique),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
