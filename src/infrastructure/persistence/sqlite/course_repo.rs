//! SQLite Course Repository
//!
//! 课程与章节共用同一个仓储，章节总是通过课程访问

use async_trait::async_trait;
use sqlx::FromRow;
use uuid::Uuid;

use super::database::{from_db_int, map_sqlx_error, parse_timestamp, parse_uuid, DbPool};
use crate::application::ports::{
    ChapterRecord, CourseRecord, CourseRepositoryPort, RepositoryError,
};
use crate::domain::course::LearningLevel;

/// SQLite Course Repository
pub struct SqliteCourseRepository {
    pool: DbPool,
}

impl SqliteCourseRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct CourseRow {
    id: String,
    user_id: String,
    conversation_id: Option<String>,
    title: String,
    description: Option<String>,
    learning_goal: String,
    level: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<CourseRow> for CourseRecord {
    type Error = RepositoryError;

    fn try_from(row: CourseRow) -> Result<Self, Self::Error> {
        let level: LearningLevel = row.level.parse().map_err(|_| {
            RepositoryError::SerializationError(format!("unknown learning level: {}", row.level))
        })?;
        Ok(CourseRecord {
            id: parse_uuid(&row.id)?,
            user_id: row.user_id,
            conversation_id: row.conversation_id.as_deref().map(parse_uuid).transpose()?,
            title: row.title,
            description: row.description,
            learning_goal: row.learning_goal,
            level,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

#[derive(FromRow)]
struct ChapterRow {
    id: String,
    course_id: String,
    position: i64,
    title: String,
    content: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<ChapterRow> for ChapterRecord {
    type Error = RepositoryError;

    fn try_from(row: ChapterRow) -> Result<Self, Self::Error> {
        Ok(ChapterRecord {
            id: parse_uuid(&row.id)?,
            course_id: parse_uuid(&row.course_id)?,
            position: from_db_int("position", row.position)?,
            title: row.title,
            content: row.content,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

const COURSE_COLUMNS: &str = "id, user_id, conversation_id, title, description, learning_goal, level, created_at, updated_at";
const CHAPTER_COLUMNS: &str = "id, course_id, position, title, content, created_at, updated_at";

#[async_trait]
impl CourseRepositoryPort for SqliteCourseRepository {
    async fn save(&self, course: &CourseRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO courses (id, user_id, conversation_id, title, description, learning_goal, level, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(course.id.to_string())
        .bind(&course.user_id)
        .bind(course.conversation_id.map(|id| id.to_string()))
        .bind(&course.title)
        .bind(&course.description)
        .bind(&course.learning_goal)
        .bind(course.level.as_str())
        .bind(course.created_at.to_rfc3339())
        .bind(course.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn update(&self, course: &CourseRecord) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE courses SET title = ?, description = ?, level = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&course.title)
        .bind(&course.description)
        .bind(course.level.as_str())
        .bind(course.updated_at.to_rfc3339())
        .bind(course.id.to_string())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("Course {}", course.id)));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CourseRecord>, RepositoryError> {
        let row: Option<CourseRow> =
            sqlx::query_as(&format!("SELECT {} FROM courses WHERE id = ?", COURSE_COLUMNS))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        row.map(CourseRecord::try_from).transpose()
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<CourseRecord>, RepositoryError> {
        let rows: Vec<CourseRow> = sqlx::query_as(&format!(
            "SELECT {} FROM courses WHERE user_id = ? ORDER BY created_at DESC",
            COURSE_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(CourseRecord::try_from).collect()
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        // chapters → quizzes → questions / attempts 通过外键级联删除
        sqlx::query("DELETE FROM courses WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn save_chapter(&self, chapter: &ChapterRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO chapters (id, course_id, position, title, content, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(chapter.id.to_string())
        .bind(chapter.course_id.to_string())
        .bind(i64::from(chapter.position))
        .bind(&chapter.title)
        .bind(&chapter.content)
        .bind(chapter.created_at.to_rfc3339())
        .bind(chapter.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn update_chapter(&self, chapter: &ChapterRecord) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE chapters SET position = ?, title = ?, content = ?, updated_at = ? WHERE id = ?",
        )
        .bind(i64::from(chapter.position))
        .bind(&chapter.title)
        .bind(&chapter.content)
        .bind(chapter.updated_at.to_rfc3339())
        .bind(chapter.id.to_string())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("Chapter {}", chapter.id)));
        }
        Ok(())
    }

    async fn find_chapter(&self, id: Uuid) -> Result<Option<ChapterRecord>, RepositoryError> {
        let row: Option<ChapterRow> =
            sqlx::query_as(&format!("SELECT {} FROM chapters WHERE id = ?", CHAPTER_COLUMNS))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        row.map(ChapterRecord::try_from).transpose()
    }

    async fn find_chapters(&self, course_id: Uuid) -> Result<Vec<ChapterRecord>, RepositoryError> {
        let rows: Vec<ChapterRow> = sqlx::query_as(&format!(
            "SELECT {} FROM chapters WHERE course_id = ? ORDER BY position ASC",
            CHAPTER_COLUMNS
        ))
        .bind(course_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(ChapterRecord::try_from).collect()
    }

    async fn delete_chapter(&self, id: Uuid) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM chapters WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn append_chapter(
        &self,
        chapter: &ChapterRecord,
        max_position: u32,
    ) -> Result<Option<u32>, RepositoryError> {
        let position: Option<i64> = sqlx::query_scalar(
            r#"
            INSERT INTO chapters (id, course_id, position, title, content, created_at, updated_at)
            SELECT ?, ?, next.position, ?, ?, ?, ?
            FROM (
                SELECT COALESCE(MAX(position) + 1, 0) AS position
                FROM chapters WHERE course_id = ?
            ) AS next
            WHERE next.position <= ?
            RETURNING position
            "#,
        )
        .bind(chapter.id.to_string())
        .bind(chapter.course_id.to_string())
        .bind(&chapter.title)
        .bind(&chapter.content)
        .bind(chapter.created_at.to_rfc3339())
        .bind(chapter.updated_at.to_rfc3339())
        .bind(chapter.course_id.to_string())
        .bind(i64::from(max_position))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        position.map(|value| from_db_int("position", value)).transpose()
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

    async fn setup() -> SqliteCourseRepository {
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
        SqliteCourseRepository::new(pool)
    }

    fn course() -> CourseRecord {
        let now = Utc::now();
        CourseRecord {
            id: Uuid::new_v4(),
            user_id: "owner".into(),
            conversation_id: None,
            title: "Rust Basics".into(),
            description: Some("Ownership and borrowing".into()),
            learning_goal: "Learn Rust".into(),
            level: LearningLevel::Beginner,
            created_at: now,
            updated_at: now,
        }
    }

    fn chapter(course_id: Uuid, position: u32) -> ChapterRecord {
        let now = Utc::now();
        ChapterRecord {
            id: Uuid::new_v4(),
            course_id,
            position,
            title: format!("Chapter {}", position),
            content: "Body".into(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_save_and_find_course() {
        let repo = setup().await;
        let c = course();
        repo.save(&c).await.unwrap();

        let found = repo.find_by_id(c.id).await.unwrap().unwrap();
        assert_eq!(found.title, "Rust Basics");
        assert_eq!(found.level, LearningLevel::Beginner);
        assert_eq!(repo.find_by_user("owner").await.unwrap().len(), 1);
        assert!(repo.find_by_user("someone-else").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_chapters_sorted_by_position() {
        let repo = setup().await;
        let c = course();
        repo.save(&c).await.unwrap();

        repo.save_chapter(&chapter(c.id, 2)).await.unwrap();
        repo.save_chapter(&chapter(c.id, 1)).await.unwrap();

        let positions: Vec<u32> = repo
            .find_chapters(c.id)
            .await
            .unwrap()
            .iter()
            .map(|ch| ch.position)
            .collect();
        assert_eq!(positions, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_append_chapter_takes_next_position() {
        let repo = setup().await;
        let c = course();
        repo.save(&c).await.unwrap();

        assert_eq!(repo.append_chapter(&chapter(c.id, 0), 999).await.unwrap(), Some(0));
        repo.save_chapter(&chapter(c.id, 4)).await.unwrap();
        let appended = chapter(c.id, 0);
        assert_eq!(repo.append_chapter(&appended, 999).await.unwrap(), Some(5));
        assert_eq!(repo.find_chapter(appended.id).await.unwrap().unwrap().position, 5);

        // 末尾已到上限时不插入
        assert_eq!(repo.append_chapter(&chapter(c.id, 0), 5).await.unwrap(), None);
        assert_eq!(repo.find_chapters(c.id).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_concurrent_appends_get_distinct_positions() {
        let repo = setup().await;
        let c = course();
        repo.save(&c).await.unwrap();

        let (first, second, third) = (chapter(c.id, 0), chapter(c.id, 0), chapter(c.id, 0));
        let (a, b, d) = tokio::join!(
            repo.append_chapter(&first, 999),
            repo.append_chapter(&second, 999),
            repo.append_chapter(&third, 999),
        );
        let mut positions = vec![a.unwrap().unwrap(), b.unwrap().unwrap(), d.unwrap().unwrap()];
        positions.sort_unstable();
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_duplicate_chapter_position_is_unique_violation() {
        let repo = setup().await;
        let c = course();
        repo.save(&c).await.unwrap();
        repo.save_chapter(&chapter(c.id, 1)).await.unwrap();

        match repo.save_chapter(&chapter(c.id, 1)).await {
            Err(RepositoryError::Constraint(v)) => assert_eq!(v.kind, ConstraintKind::Unique),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_delete_course_cascades_to_chapters() {
        let repo = setup().await;
        let c = course();
        repo.save(&c).await.unwrap();
        let ch = chapter(c.id, 1);
        repo.save_chapter(&ch).await.unwrap();

        repo.delete(c.id).await.unwrap();
        assert!(repo.find_chapter(ch.id).await.unwrap().is_none());
    }
}
