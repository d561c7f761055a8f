//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态，REST 与 GraphQL 共用

use std::sync::Arc;

use crate::application::{
    // Command handlers
    AddMessageHandler, CreateChapterHandler, CreateConversationHandler, CreateCourseHandler,
    CreateLlmModelHandler, CreateQuizHandler, DeleteChapterHandler, DeleteConversationHandler,
    DeleteCourseHandler, DeleteQuizHandler, EnsureUserHandler, ProposeLearningLevelsHandler,
    RenameConversationHandler, SubmitQuizAttemptHandler, UpdateChapterHandler,
    UpdateCourseHandler, UpdateProfileHandler,
    // Query handlers
    GetChapterHandler, GetConversationHandler, GetCourseHandler, GetCurrentUserHandler,
    GetQuizHandler, ListConversationsHandler, ListCoursesHandler, ListLlmModelsHandler,
    ListQuizAttemptsHandler, ListQuizzesHandler,
    // Ports
    AuthVerifierPort, ConversationRepositoryPort, CourseRepositoryPort, LlmEnginePort,
    LlmModelRepositoryPort, QuizRepositoryPort, UserRepositoryPort,
};
use crate::infrastructure::graphql::{build_schema, CourseSchema};

/// 应用状态依赖的出站端口
#[derive(Clone)]
pub struct Ports {
    pub user_repo: Arc<dyn UserRepositoryPort>,
    pub model_repo: Arc<dyn LlmModelRepositoryPort>,
    pub conversation_repo: Arc<dyn ConversationRepositoryPort>,
    pub course_repo: Arc<dyn CourseRepositoryPort>,
    pub quiz_repo: Arc<dyn QuizRepositoryPort>,
    pub llm_engine: Arc<dyn LlmEnginePort>,
    pub auth_verifier: Arc<dyn AuthVerifierPort>,
}

/// 应用状态
pub struct AppState {
    // ========== Ports ==========
    pub auth_verifier: Arc<dyn AuthVerifierPort>,
    pub llm_engine: Arc<dyn LlmEnginePort>,

    // ========== Command Handlers ==========
    pub ensure_user_handler: EnsureUserHandler,
    pub update_profile_handler: UpdateProfileHandler,
    pub create_llm_model_handler: CreateLlmModelHandler,
    pub propose_levels_handler: ProposeLearningLevelsHandler,
    pub create_conversation_handler: CreateConversationHandler,
    pub rename_conversation_handler: RenameConversationHandler,
    pub delete_conversation_handler: DeleteConversationHandler,
    pub add_message_handler: AddMessageHandler,
    pub create_course_handler: CreateCourseHandler,
    pub update_course_handler: UpdateCourseHandler,
    pub delete_course_handler: DeleteCourseHandler,
    pub create_chapter_handler: CreateChapterHandler,
    pub update_chapter_handler: UpdateChapterHandler,
    pub delete_chapter_handler: DeleteChapterHandler,
    pub create_quiz_handler: CreateQuizHandler,
    pub delete_quiz_handler: DeleteQuizHandler,
    pub submit_attempt_handler: SubmitQuizAttemptHandler,

    // ========== Query Handlers ==========
    pub get_current_user_handler: GetCurrentUserHandler,
    pub list_models_handler: ListLlmModelsHandler,
    pub list_conversations_handler: ListConversationsHandler,
    pub get_conversation_handler: GetConversationHandler,
    pub list_courses_handler: ListCoursesHandler,
    pub get_course_handler: GetCourseHandler,
    pub get_chapter_handler: GetChapterHandler,
    pub list_quizzes_handler: ListQuizzesHandler,
    pub get_quiz_handler: GetQuizHandler,
    pub list_attempts_handler: ListQuizAttemptsHandler,

    // ========== GraphQL ==========
    pub graphql_schema: CourseSchema,
}

impl AppState {
    /// 创建应用状态
    ///
    /// `default_model` 为未显式指定模型时使用的模型名
    pub fn new(ports: Ports, default_model: impl Into<String>) -> Self {
        let Ports {
            user_repo,
            model_repo,
            conversation_repo,
            course_repo,
            quiz_repo,
            llm_engine,
            auth_verifier,
        } = ports;

        Self {
            // Ports
            auth_verifier,
            llm_engine: llm_engine.clone(),

            // Command handlers
            ensure_user_handler: EnsureUserHandler::new(user_repo.clone()),
            update_profile_handler: UpdateProfileHandler::new(user_repo.clone()),
            create_llm_model_handler: CreateLlmModelHandler::new(model_repo.clone()),
            propose_levels_handler: ProposeLearningLevelsHandler::new(
                conversation_repo.clone(),
                model_repo.clone(),
                llm_engine,
                default_model,
            ),
            create_conversation_handler: CreateConversationHandler::new(conversation_repo.clone()),
            rename_conversation_handler: RenameConversationHandler::new(conversation_repo.clone()),
            delete_conversation_handler: DeleteConversationHandler::new(conversation_repo.clone()),
            add_message_handler: AddMessageHandler::new(conversation_repo.clone()),
            create_course_handler: CreateCourseHandler::new(
                course_repo.clone(),
                conversation_repo.clone(),
            ),
            update_course_handler: UpdateCourseHandler::new(course_repo.clone()),
            delete_course_handler: DeleteCourseHandler::new(course_repo.clone()),
            create_chapter_handler: CreateChapterHandler::new(course_repo.clone()),
            update_chapter_handler: UpdateChapterHandler::new(course_repo.clone()),
            delete_chapter_handler: DeleteChapterHandler::new(course_repo.clone()),
            create_quiz_handler: CreateQuizHandler::new(quiz_repo.clone(), course_repo.clone()),
            delete_quiz_handler: DeleteQuizHandler::new(quiz_repo.clone(), course_repo.clone()),
            submit_attempt_handler: SubmitQuizAttemptHandler::new(
                quiz_repo.clone(),
                course_repo.clone(),
            ),

            // Query handlers
            get_current_user_handler: GetCurrentUserHandler::new(user_repo),
            list_models_handler: ListLlmModelsHandler::new(model_repo),
            list_conversations_handler: ListConversationsHandler::new(conversation_repo.clone()),
            get_conversation_handler: GetConversationHandler::new(conversation_repo),
            list_courses_handler: ListCoursesHandler::new(course_repo.clone()),
            get_course_handler: GetCourseHandler::new(course_repo.clone()),
            get_chapter_handler: GetChapterHandler::new(course_repo.clone()),
            list_quizzes_handler: ListQuizzesHandler::new(quiz_repo.clone(), course_repo.clone()),
            get_quiz_handler: GetQuizHandler::new(quiz_repo.clone(), course_repo.clone()),
            list_attempts_handler: ListQuizAttemptsHandler::new(quiz_repo, course_repo),

            graphql_schema: build_schema(),
        }
    }
}
