//! Course Context - 课程限界上下文
//!
//! 职责:
//! - 学习目标与学习级别
//! - 章节顺序

mod value_objects;

pub use value_objects::{ChapterPosition, LearningGoal, LearningLevel};
