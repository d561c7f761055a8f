//! SQLite User Repository

use async_trait::async_trait;
use sqlx::FromRow;

use super::database::{map_sqlx_error, parse_timestamp, DbPool};
use crate::application::ports::{RepositoryError, UserRecord, UserRepositoryPort};

/// SQLite User Repository
pub struct SqliteUserRepository {
    pool: DbPool,
}

impl SqliteUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct UserRow {
    id: String,
    email: Option<String>,
    name: Option<String>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<UserRow> for UserRecord {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(UserRecord {
            id: row.id,
            email: row.email,
            name: row.name,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

#[async_trait]
impl UserRepositoryPort for SqliteUserRepository {
    async fn insert_if_absent(&self, user: &UserRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, name, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(id) DO NOTHING
            "#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(user.created_at.to_rfc3339())
        .bind(user.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, email, name, created_at, updated_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(UserRecord::try_from).transpose()
    }

    async fn update(&self, user: &UserRecord) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE users SET email = ?, name = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&user.email)
        .bind(&user.name)
        .bind(user.updated_at.to_rfc3339())
        .bind(&user.id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("User {}", user.id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::ConstraintKind;
    use crate::infrastructure::persistence::sqlite::{create_pool, run_migrations, DatabaseConfig};
    use chrono::Utc;

    async fn setup() -> SqliteUserRepository {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteUserRepository::new(pool)
    }

    fn user(id: &str) -> UserRecord {
        let now = Utc::now();
        UserRecord {
            id: id.to_string(),
            email: None,
            name: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_if_absent_keeps_existing_profile() {
        let repo = setup().await;
        let mut alice = user("user_alice");
        repo.insert_if_absent(&alice).await.unwrap();

        alice.name = Some("Alice".into());
        repo.update(&alice).await.unwrap();

        repo.insert_if_absent(&user("user_alice")).await.unwrap();
        let found = repo.find_by_id("user_alice").await.unwrap().unwrap();
        assert_eq!(found.name.as_deref(), Some("Alice"));
    }

    #[tokio::test]
    async fn test_duplicate_email_is_unique_violation() {
        let repo = setup().await;
        let mut a = user("a");
        let mut b = user("b");
        repo.insert_if_absent(&a).await.unwrap();
        repo.insert_if_absent(&b).await.unwrap();

        a.email = Some("same@example.com".into());
        b.email = Some("same@example.com".into());
        repo.update(&a).await.unwrap();

        match repo.update(&b).await {
            Err(RepositoryError::Constraint(v)) => assert_eq!(v.kind, ConstraintKind::Unique),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let repo = setup().await;
        let result = repo.update(&user("ghost")).await;
        assert!(matches!(result, Err(RepositoryError::NotFound(_))));
    }
}
