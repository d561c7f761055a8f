//! Quiz Command Handlers

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::access::{owned_chapter, owned_quiz};
use crate::application::commands::{CreateQuiz, DeleteQuiz, SubmitQuizAttempt};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    CourseRepositoryPort, QuestionRecord, QuizAttemptRecord, QuizRecord, QuizRepositoryPort,
    UserQuizResponseRecord,
};
use crate::application::queries::handlers::{AttemptDetail, QuizDetail};
use crate::domain::quiz::{score_attempt, AnswerKey, QuestionDraft, SubmittedAnswer};
use crate::domain::Title;

const MAX_QUESTIONS: usize = 50;

// ============================================================================
// CreateQuiz
// ============================================================================

/// CreateQuiz Handler
pub struct CreateQuizHandler {
    quiz_repo: Arc<dyn QuizRepositoryPort>,
    course_repo: Arc<dyn CourseRepositoryPort>,
}

impl CreateQuizHandler {
    pub fn new(
        quiz_repo: Arc<dyn QuizRepositoryPort>,
        course_repo: Arc<dyn CourseRepositoryPort>,
    ) -> Self {
        Self {
            quiz_repo,
            course_repo,
        }
    }

    pub async fn handle(&self, command: CreateQuiz) -> Result<QuizDetail, ApplicationError> {
        let title = Title::parse("title", &command.title)?;
        if command.questions.is_empty() || command.questions.len() > MAX_QUESTIONS {
            return Err(ApplicationError::validation(
                "questions",
                format!("must contain between 1 and {} questions", MAX_QUESTIONS),
            ));
        }
        let drafts = command
            .questions
            .iter()
            .enumerate()
            .map(|(i, q)| {
                QuestionDraft::parse(
                    &format!("questions[{}]", i),
                    &q.prompt,
                    &q.options,
                    q.correct_option,
                    q.explanation.as_deref(),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        let (_, chapter) =
            owned_chapter(self.course_repo.as_ref(), command.chapter_id, &command.user_id).await?;

        let quiz = QuizRecord {
            id: Uuid::new_v4(),
            chapter_id: chapter.id,
            title: title.into_inner(),
            created_at: Utc::now(),
        };
        let questions: Vec<QuestionRecord> = drafts
            .into_iter()
            .enumerate()
            .map(|(i, draft)| QuestionRecord {
                id: Uuid::new_v4(),
                quiz_id: quiz.id,
                position: i as u32,
                prompt: draft.prompt().to_string(),
                options: draft.options().to_vec(),
                correct_option: draft.correct_option(),
                explanation: draft.explanation().map(str::to_string),
            })
            .collect();

        self.quiz_repo.save_with_questions(&quiz, &questions).await?;

        tracing::info!(
            quiz_id = %quiz.id,
            chapter_id = %chapter.id,
            questions = questions.len(),
            "Quiz created"
        );

        Ok(QuizDetail { quiz, questions })
    }
}

// ============================================================================
// DeleteQuiz
// ============================================================================

/// DeleteQuiz Handler
pub struct DeleteQuizHandler {
    quiz_repo: Arc<dyn QuizRepositoryPort>,
    course_repo: Arc<dyn CourseRepositoryPort>,
}

impl DeleteQuizHandler {
    pub fn new(
        quiz_repo: Arc<dyn QuizRepositoryPort>,
        course_repo: Arc<dyn CourseRepositoryPort>,
    ) -> Self {
        Self {
            quiz_repo,
            course_repo,
        }
    }

    pub async fn handle(&self, command: DeleteQuiz) -> Result<(), ApplicationError> {
        let quiz = owned_quiz(
            self.quiz_repo.as_ref(),
            self.course_repo.as_ref(),
            command.quiz_id,
            &command.user_id,
        )
        .await?;

        self.quiz_repo.delete(quiz.id).await?;

        tracing::info!(quiz_id = %quiz.id, "Quiz deleted");

        Ok(())
    }
}

// ============================================================================
// SubmitQuizAttempt
// ============================================================================

/// SubmitQuizAttempt Handler
pub struct SubmitQuizAttemptHandler {
    quiz_repo: Arc<dyn QuizRepositoryPort>,
    course_repo: Arc<dyn CourseRepositoryPort>,
}

impl SubmitQuizAttemptHandler {
    pub fn new(
        quiz_repo: Arc<dyn QuizRepositoryPort>,
        course_repo: Arc<dyn CourseRepositoryPort>,
    ) -> Self {
        Self {
            quiz_repo,
            course_repo,
        }
    }

    pub async fn handle(&self, command: SubmitQuizAttempt) -> Result<AttemptDetail, ApplicationError> {
        let quiz = owned_quiz(
            self.quiz_repo.as_ref(),
            self.course_repo.as_ref(),
            command.quiz_id,
            &command.user_id,
        )
        .await?;

        let questions = self.quiz_repo.find_questions(quiz.id).await?;
        let keys: Vec<AnswerKey> = questions
            .iter()
            .map(|q| AnswerKey {
                question_id: q.id,
                option_count: q.options.len() as u32,
                correct_option: q.correct_option,
            })
            .collect();
        let answers: Vec<SubmittedAnswer> = command
            .responses
            .iter()
            .map(|r| SubmittedAnswer {
                question_id: r.question_id,
                selected_option: r.selected_option,
            })
            .collect();

        let score = score_attempt(&keys, &answers)?;

        let attempt = QuizAttemptRecord {
            id: Uuid::new_v4(),
            quiz_id: quiz.id,
            user_id: command.user_id,
            score: score.correct,
            total: score.total,
            created_at: Utc::now(),
        };
        let responses: Vec<UserQuizResponseRecord> = score
            .graded
            .iter()
            .map(|g| UserQuizResponseRecord {
                id: Uuid::new_v4(),
                attempt_id: attempt.id,
                question_id: g.question_id,
                selected_option: g.selected_option,
                is_correct: g.is_correct,
            })
            .collect();

        self.quiz_repo.save_attempt(&attempt, &responses).await?;

        tracing::info!(
            attempt_id = %attempt.id,
            quiz_id = %quiz.id,
            score = attempt.score,
            total = attempt.total,
            percentage = score.percentage(),
            "Quiz attempt scored"
        );

        Ok(AttemptDetail { attempt, responses })
    }
}
