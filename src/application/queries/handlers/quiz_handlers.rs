//! Quiz Query Handlers

use std::sync::Arc;

use crate::application::access::{owned_chapter, owned_quiz};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    CourseRepositoryPort, QuestionRecord, QuizAttemptRecord, QuizRecord, QuizRepositoryPort,
    UserQuizResponseRecord,
};
use crate::application::queries::{GetQuiz, ListQuizAttempts, ListQuizzes};

/// 测验详情
#[derive(Debug, Clone)]
pub struct QuizDetail {
    pub quiz: QuizRecord,
    pub questions: Vec<QuestionRecord>,
}

/// 作答详情
#[derive(Debug, Clone)]
pub struct AttemptDetail {
    pub attempt: QuizAttemptRecord,
    pub responses: Vec<UserQuizResponseRecord>,
}

/// ListQuizzes Handler
pub struct ListQuizzesHandler {
    quiz_repo: Arc<dyn QuizRepositoryPort>,
    course_repo: Arc<dyn CourseRepositoryPort>,
}

impl ListQuizzesHandler {
    pub fn new(
        quiz_repo: Arc<dyn QuizRepositoryPort>,
        course_repo: Arc<dyn CourseRepositoryPort>,
    ) -> Self {
        Self {
            quiz_repo,
            course_repo,
        }
    }

    pub async fn handle(&self, query: ListQuizzes) -> Result<Vec<QuizRecord>, ApplicationError> {
        let (_, chapter) =
            owned_chapter(self.course_repo.as_ref(), query.chapter_id, &query.user_id).await?;
        Ok(self.quiz_repo.find_by_chapter(chapter.id).await?)
    }
}

/// GetQuiz Handler
pub struct GetQuizHandler {
    quiz_repo: Arc<dyn QuizRepositoryPort>,
    course_repo: Arc<dyn CourseRepositoryPort>,
}

impl GetQuizHandler {
    pub fn new(
        quiz_repo: Arc<dyn QuizRepositoryPort>,
        course_repo: Arc<dyn CourseRepositoryPort>,
    ) -> Self {
        Self {
            quiz_repo,
            course_repo,
        }
    }

    pub async fn handle(&self, query: GetQuiz) -> Result<QuizDetail, ApplicationError> {
        let quiz = owned_quiz(
            self.quiz_repo.as_ref(),
            self.course_repo.as_ref(),
            query.quiz_id,
            &query.user_id,
        )
        .await?;
        let questions = self.quiz_repo.find_questions(quiz.id).await?;
        Ok(QuizDetail { quiz, questions })
    }
}

/// ListQuizAttempts Handler
pub struct ListQuizAttemptsHandler {
    quiz_repo: Arc<dyn QuizRepositoryPort>,
    course_repo: Arc<dyn CourseRepositoryPort>,
}

impl ListQuizAttemptsHandler {
    pub fn new(
        quiz_repo: Arc<dyn QuizRepositoryPort>,
        course_repo: Arc<dyn CourseRepositoryPort>,
    ) -> Self {
        Self {
            quiz_repo,
            course_repo,
        }
    }

    pub async fn handle(
        &self,
        query: ListQuizAttempts,
    ) -> Result<Vec<AttemptDetail>, ApplicationError> {
        let quiz = owned_quiz(
            self.quiz_repo.as_ref(),
            self.course_repo.as_ref(),
            query.quiz_id,
            &query.user_id,
        )
        .await?;

        let attempts = self.quiz_repo.find_attempts(quiz.id, &query.user_id).await?;
        let mut details = Vec::with_capacity(attempts.len());
        for attempt in attempts {
            let responses = self.quiz_repo.find_responses(attempt.id).await?;
            details.push(AttemptDetail { attempt, responses });
        }
        Ok(details)
    }
}
