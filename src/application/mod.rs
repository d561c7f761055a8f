//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（Repository、LlmEngine、AuthVerifier）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

mod access;

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    // User commands
    EnsureUser,
    UpdateProfile,
    // LLM model commands
    CreateLlmModel,
    EnsureLlmModel,
    // Learning commands
    ProposeLearningLevels,
    // Conversation commands
    AddMessage,
    CreateConversation,
    DeleteConversation,
    RenameConversation,
    // Course commands
    CreateChapter,
    CreateCourse,
    DeleteChapter,
    DeleteCourse,
    UpdateChapter,
    UpdateCourse,
    // Quiz commands
    CreateQuiz,
    DeleteQuiz,
    QuestionInput,
    ResponseInput,
    SubmitQuizAttempt,
    // Handlers
    handlers::{
        AddMessageHandler, CreateChapterHandler, CreateConversationHandler,
        CreateCourseHandler, CreateLlmModelHandler, CreateQuizHandler, DeleteChapterHandler,
        DeleteConversationHandler, DeleteCourseHandler, DeleteQuizHandler, EnsureLlmModelHandler,
        EnsureUserHandler, LearningLevelsResponse, ProposeLearningLevelsHandler,
        RenameConversationHandler, SubmitQuizAttemptHandler, UpdateChapterHandler,
        UpdateCourseHandler, UpdateProfileHandler,
    },
};

pub use error::{ApplicationError, FieldIssue};

pub use ports::{
    // Auth
    AuthError,
    AuthUser,
    AuthVerifierPort,
    // LLM engine
    ChatMessage,
    CompletionRequest,
    CompletionResponse,
    LlmEnginePort,
    LlmError,
    // Repositories
    ChapterRecord,
    ConstraintKind,
    ConstraintViolation,
    ConversationRecord,
    ConversationRepositoryPort,
    CourseRecord,
    CourseRepositoryPort,
    LlmModelRecord,
    LlmModelRepositoryPort,
    MessageRecord,
    QuestionRecord,
    QuizAttemptRecord,
    QuizRecord,
    QuizRepositoryPort,
    RepositoryError,
    UserQuizResponseRecord,
    UserRecord,
    UserRepositoryPort,
};

pub use queries::{
    // User queries
    GetCurrentUser,
    // LLM model queries
    ListLlmModels,
    // Conversation queries
    GetConversation,
    ListConversations,
    // Course queries
    GetChapter,
    GetCourse,
    ListCourses,
    // Quiz queries
    GetQuiz,
    ListQuizAttempts,
    ListQuizzes,
    // Handlers
    handlers::{
        AttemptDetail, ConversationDetail, CourseDetail, GetChapterHandler,
        GetConversationHandler, GetCourseHandler, GetCurrentUserHandler, GetQuizHandler,
        ListConversationsHandler, ListCoursesHandler, ListLlmModelsHandler,
        ListQuizAttemptsHandler, ListQuizzesHandler, QuizDetail,
    },
};
