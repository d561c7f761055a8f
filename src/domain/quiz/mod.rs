//! Quiz Context - 测验限界上下文
//!
//! 职责:
//! - 题目草稿校验
//! - 作答评分

mod scoring;
mod value_objects;

pub use scoring::{percentage, score_attempt, AnswerKey, AttemptScore, GradedAnswer, SubmittedAnswer};
pub use value_objects::QuestionDraft;
