//! SQLite Quiz Repository
//!
//! 测验、题目、作答与逐题结果

use async_trait::async_trait;
use sqlx::FromRow;
use uuid::Uuid;

use super::database::{from_db_int, map_sqlx_error, parse_timestamp, parse_uuid, DbPool};
use crate::application::ports::{
    QuestionRecord, QuizAttemptRecord, QuizRecord, QuizRepositoryPort, RepositoryError,
    UserQuizResponseRecord,
};

/// SQLite Quiz Repository
pub struct SqliteQuizRepository {
    pool: DbPool,
}

impl SqliteQuizRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct QuizRow {
    id: String,
    chapter_id: String,
    title: String,
    created_at: String,
}

impl TryFrom<QuizRow> for QuizRecord {
    type Error = RepositoryError;

    fn try_from(row: QuizRow) -> Result<Self, Self::Error> {
        Ok(QuizRecord {
            id: parse_uuid(&row.id)?,
            chapter_id: parse_uuid(&row.chapter_id)?,
            title: row.title,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}

#[derive(FromRow)]
struct QuestionRow {
    id: String,
    quiz_id: String,
    position: i64,
    prompt: String,
    options: String,
    correct_option: i64,
    explanation: Option<String>,
}

impl TryFrom<QuestionRow> for QuestionRecord {
    type Error = RepositoryError;

    fn try_from(row: QuestionRow) -> Result<Self, Self::Error> {
        let options: Vec<String> = serde_json::from_str(&row.options)
            .map_err(|e| RepositoryError::SerializationError(e.to_string()))?;
        Ok(QuestionRecord {
            id: parse_uuid(&row.id)?,
            quiz_id: parse_uuid(&row.quiz_id)?,
            position: from_db_int("position", row.position)?,
            prompt: row.prompt,
            options,
            correct_option: from_db_int("correct_option", row.correct_option)?,
            explanation: row.explanation,
        })
    }
}

#[derive(FromRow)]
struct AttemptRow {
    id: String,
    quiz_id: String,
    user_id: String,
    score: i64,
    total: i64,
    created_at: String,
}

impl TryFrom<AttemptRow> for QuizAttemptRecord {
    type Error = RepositoryError;

    fn try_from(row: AttemptRow) -> Result<Self, Self::Error> {
        Ok(QuizAttemptRecord {
            id: parse_uuid(&row.id)?,
            quiz_id: parse_uuid(&row.quiz_id)?,
            user_id: row.user_id,
            score: from_db_int("score", row.score)?,
            total: from_db_int("total", row.total)?,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}

#[derive(FromRow)]
struct ResponseRow {
    id: String,
    attempt_id: String,
    question_id: String,
    selected_option: i64,
    is_correct: bool,
}

impl TryFrom<ResponseRow> for UserQuizResponseRecord {
    type Error = RepositoryError;

    fn try_from(row: ResponseRow) -> Result<Self, Self::Error> {
        Ok(UserQuizResponseRecord {
            id: parse_uuid(&row.id)?,
            attempt_id: parse_uuid(&row.attempt_id)?,
            question_id: parse_uuid(&row.question_id)?,
            selected_option: from_db_int("selected_option", row.selected_option)?,
            is_correct: row.is_correct,
        })
    }
}

#[async_trait]
impl QuizRepositoryPort for SqliteQuizRepository {
    async fn save_with_questions(
        &self,
        quiz: &QuizRecord,
        questions: &[QuestionRecord],
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        sqlx::query("INSERT INTO quizzes (id, chapter_id, title, created_at) VALUES (?, ?, ?, ?)")
            .bind(quiz.id.to_string())
            .bind(quiz.chapter_id.to_string())
            .bind(&quiz.title)
            .bind(quiz.created_at.to_rfc3339())
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        for question in questions {
            let options = serde_json::to_string(&question.options)
                .map_err(|e| RepositoryError::InvalidData(e.to_string()))?;
            sqlx::query(
                r#"
                INSERT INTO questions (id, quiz_id, position, prompt, options, correct_option, explanation)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(question.id.to_string())
            .bind(question.quiz_id.to_string())
            .bind(i64::from(question.position))
            .bind(&question.prompt)
            .bind(options)
            .bind(i64::from(question.correct_option))
            .bind(&question.explanation)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
        }

        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<QuizRecord>, RepositoryError> {
        let row: Option<QuizRow> =
            sqlx::query_as("SELECT id, chapter_id, title, created_at FROM quizzes WHERE id = ?")
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        row.map(QuizRecord::try_from).transpose()
    }

    async fn find_by_chapter(&self, chapter_id: Uuid) -> Result<Vec<QuizRecord>, RepositoryError> {
        let rows: Vec<QuizRow> = sqlx::query_as(
            "SELECT id, chapter_id, title, created_at FROM quizzes WHERE chapter_id = ? ORDER BY created_at ASC",
        )
        .bind(chapter_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(QuizRecord::try_from).collect()
    }

    async fn find_questions(&self, quiz_id: Uuid) -> Result<Vec<QuestionRecord>, RepositoryError> {
        let rows: Vec<QuestionRow> = sqlx::query_as(
            "SELECT id, quiz_id, position, prompt, options, correct_option, explanation FROM questions WHERE quiz_id = ? ORDER BY position ASC",
        )
        .bind(quiz_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(QuestionRecord::try_from).collect()
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM quizzes WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn save_attempt(
        &self,
        attempt: &QuizAttemptRecord,
        responses: &[UserQuizResponseRecord],
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        sqlx::query(
            r#"
            INSERT INTO quiz_attempts (id, quiz_id, user_id, score, total, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(attempt.id.to_string())
        .bind(attempt.quiz_id.to_string())
        .bind(&attempt.user_id)
        .bind(i64::from(attempt.score))
        .bind(i64::from(attempt.total))
        .bind(attempt.created_at.to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        for response in responses {
            sqlx::query(
                r#"
                INSERT INTO user_quiz_responses (id, attempt_id, question_id, selected_option, is_correct)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(response.id.to_string())
            .bind(response.attempt_id.to_string())
            .bind(response.question_id.to_string())
            .bind(i64::from(response.selected_option))
            .bind(response.is_correct)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
        }

        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn find_attempts(
        &self,
        quiz_id: Uuid,
        user_id: &str,
    ) -> Result<Vec<QuizAttemptRecord>, RepositoryError> {
        let rows: Vec<AttemptRow> = sqlx::query_as(
            "SELECT id, quiz_id, user_id, score, total, created_at FROM quiz_attempts WHERE quiz_id = ? AND user_id = ? ORDER BY created_at DESC",
        )
        .bind(quiz_id.to_string())
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(QuizAttemptRecord::try_from).collect()
    }

    async fn find_responses(
        &self,
        attempt_id: Uuid,
    ) -> Result<Vec<UserQuizResponseRecord>, RepositoryError> {
        let rows: Vec<ResponseRow> = sqlx::query_as(
            r#"
            SELECT r.id, r.attempt_id, r.question_id, r.selected_option, r.is_correct
            FROM user_quiz_responses r
            JOIN questions q ON q.id = r.question_id
            WHERE r.attempt_id = ?
            ORDER BY q.position ASC
            "#,
        )
        .bind(attempt_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(UserQuizResponseRecord::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{
        ChapterRecord, CourseRecord, CourseRepositoryPort, UserRecord, UserRepositoryPort,
    };
    use crate::domain::course::LearningLevel;
    use crate::infrastructure::persistence::sqlite::{
        create_pool, run_migrations, DatabaseConfig, SqliteCourseRepository,
        SqliteUserRepository,
    };
    use chrono::Utc;

    /// 返回仓储以及一个可挂载测验的章节 id
    async fn setup() -> (SqliteQuizRepository, Uuid) {
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

        let courses = SqliteCourseRepository::new(pool.clone());
        let course = CourseRecord {
            id: Uuid::new_v4(),
            user_id: "owner".into(),
            conversation_id: None,
            title: "Rust".into(),
            description: None,
            learning_goal: "Learn Rust".into(),
            level: LearningLevel::Beginner,
            created_at: now,
            updated_at: now,
        };
        courses.save(&course).await.unwrap();
        let chapter = ChapterRecord {
            id: Uuid::new_v4(),
            course_id: course.id,
            position: 1,
            title: "Ownership".into(),
            content: "Body".into(),
            created_at: now,
            updated_at: now,
        };
        courses.save_chapter(&chapter).await.unwrap();

        (SqliteQuizRepository::new(pool), chapter.id)
    }

    fn quiz_with_questions(chapter_id: Uuid) -> (QuizRecord, Vec<QuestionRecord>) {
        let quiz = QuizRecord {
            id: Uuid::new_v4(),
            chapter_id,
            title: "Ownership quiz".into(),
            created_at: Utc::now(),
        };
        let questions = (0..2)
            .map(|i| QuestionRecord {
                id: Uuid::new_v4(),
                quiz_id: quiz.id,
                position: i,
                prompt: format!("Question {}", i),
                options: vec!["yes".into(), "no".into()],
                correct_option: 0,
                explanation: None,
            })
            .collect();
        (quiz, questions)
    }

    #[tokio::test]
    async fn test_save_quiz_with_questions() {
        let (repo, chapter_id) = setup().await;
        let (quiz, questions) = quiz_with_questions(chapter_id);
        repo.save_with_questions(&quiz, &questions).await.unwrap();

        let loaded = repo.find_questions(quiz.id).await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].options, vec!["yes".to_string(), "no".to_string()]);
        assert_eq!(repo.find_by_chapter(chapter_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_question_insert_rolls_back_quiz() {
        let (repo, chapter_id) = setup().await;
        let (quiz, mut questions) = quiz_with_questions(chapter_id);
        questions[1].position = questions[0].position;

        let result = repo.save_with_questions(&quiz, &questions).await;
        assert!(matches!(result, Err(RepositoryError::Constraint(_))));
        assert!(repo.find_by_id(quiz.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_attempt_and_read_back() {
        let (repo, chapter_id) = setup().await;
        let (quiz, questions) = quiz_with_questions(chapter_id);
        repo.save_with_questions(&quiz, &questions).await.unwrap();

        let attempt = QuizAttemptRecord {
            id: Uuid::new_v4(),
            quiz_id: quiz.id,
            user_id: "owner".into(),
            score: 1,
            total: 2,
            created_at: Utc::now(),
        };
        let responses: Vec<_> = questions
            .iter()
            .enumerate()
            .map(|(i, q)| UserQuizResponseRecord {
                id: Uuid::new_v4(),
                attempt_id: attempt.id,
                question_id: q.id,
                selected_option: i as u32,
                is_correct: i == 0,
            })
            .collect();
        repo.save_attempt(&attempt, &responses).await.unwrap();

        let attempts = repo.find_attempts(quiz.id, "owner").await.unwrap();
        assert_eq!(attempts.len(), 1);
        assert_eq!(attempts[0].score, 1);

        let stored = repo.find_responses(attempt.id).await.unwrap();
        assert_eq!(stored.len(), 2);
        assert!(stored[0].is_correct);
        assert!(!stored[1].is_correct);
    }
}
