//! Quiz Attempt Scoring
//!
//! 规则:
//! - 每道题最多作答一次，重复作答视为错误请求
//! - 未知题目、越界选项视为错误请求
//! - 未作答的题目计为答错，总分母为题目数

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::domain::DomainError;

/// 单题标准答案
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerKey {
    pub question_id: Uuid,
    pub option_count: u32,
    pub correct_option: u32,
}

/// 用户提交的单题答案
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmittedAnswer {
    pub question_id: Uuid,
    pub selected_option: u32,
}

/// 评分后的单题答案
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradedAnswer {
    pub question_id: Uuid,
    pub selected_option: u32,
    pub is_correct: bool,
}

/// 评分结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptScore {
    pub correct: u32,
    pub total: u32,
    pub graded: Vec<GradedAnswer>,
}

impl AttemptScore {
    pub fn percentage(&self) -> f64 {
        percentage(self.correct, self.total)
    }
}

/// 百分制得分，0 - 100；没有题目时为 0
pub fn percentage(correct: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    f64::from(correct) * 100.0 / f64::from(total)
}

pub fn score_attempt(
    keys: &[AnswerKey],
    answers: &[SubmittedAnswer],
) -> Result<AttemptScore, DomainError> {
    let by_question: HashMap<Uuid, &AnswerKey> =
        keys.iter().map(|k| (k.question_id, k)).collect();
    let mut seen: HashSet<Uuid> = HashSet::with_capacity(answers.len());
    let mut graded = Vec::with_capacity(answers.len());
    let mut correct = 0u32;

    for (i, answer) in answers.iter().enumerate() {
        let field = format!("responses[{}]", i);
        let key = by_question.get(&answer.question_id).ok_or_else(|| {
            DomainError::invalid(
                format!("{}.question_id", field),
                format!("question {} does not belong to this quiz", answer.question_id),
            )
        })?;
        if !seen.insert(answer.question_id) {
            return Err(DomainError::invalid(
                format!("{}.question_id", field),
                "question answered more than once",
            ));
        }
        if answer.selected_option >= key.option_count {
            return Err(DomainError::invalid(
                format!("{}.selected_option", field),
                format!("must be an index below {}", key.option_count),
            ));
        }

        let is_correct = answer.selected_option == key.correct_option;
        if is_correct {
            correct += 1;
        }
        graded.push(GradedAnswer {
            question_id: answer.question_id,
            selected_option: answer.selected_option,
            is_correct,
        });
    }

    Ok(AttemptScore {
        correct,
        total: keys.len() as u32,
        graded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> (Uuid, Uuid, Vec<AnswerKey>) {
        let q1 = Uuid::new_v4();
        let q2 = Uuid::new_v4();
        let keys = vec![
            AnswerKey {
                question_id: q1,
                option_count: 3,
                correct_option: 0,
            },
            AnswerKey {
                question_id: q2,
                option_count: 2,
                correct_option: 1,
            },
        ];
        (q1, q2, keys)
    }

    #[test]
    fn test_scores_correct_answers() {
        let (q1, q2, keys) = keys();
        let score = score_attempt(
            &keys,
            &[
                SubmittedAnswer {
                    question_id: q1,
                    selected_option: 0,
                },
                SubmittedAnswer {
                    question_id: q2,
                    selected_option: 0,
                },
            ],
        )
        .unwrap();
        assert_eq!(score.correct, 1);
        assert_eq!(score.total, 2);
        assert_eq!(score.percentage(), 50.0);
        assert!(score.graded[0].is_correct);
        assert!(!score.graded[1].is_correct);
    }

    #[test]
    fn test_unanswered_questions_count_as_wrong() {
        let (q1, _, keys) = keys();
        let score = score_attempt(
            &keys,
            &[SubmittedAnswer {
                question_id: q1,
                selected_option: 0,
            }],
        )
        .unwrap();
        assert_eq!(score.correct, 1);
        assert_eq!(score.total, 2);
        assert_eq!(score.graded.len(), 1);
    }

    #[test]
    fn test_rejects_duplicate_unknown_and_out_of_range() {
        let (q1, q2, keys) = keys();
        let dup = [
            SubmittedAnswer {
                question_id: q1,
                selected_option: 0,
            },
            SubmittedAnswer {
                question_id: q1,
                selected_option: 1,
            },
        ];
        assert!(score_attempt(&keys, &dup).is_err());

        let unknown = [SubmittedAnswer {
            question_id: Uuid::new_v4(),
            selected_option: 0,
        }];
        assert!(score_attempt(&keys, &unknown).is_err());

        let out_of_range = [SubmittedAnswer {
            question_id: q2,
            selected_option: 2,
        }];
        assert!(score_attempt(&keys, &out_of_range).is_err());
    }

    #[test]
    fn test_percentage_of_empty_quiz_is_zero() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(1, 3), 100.0 / 3.0);
        assert_eq!(percentage(4, 4), 100.0);
    }
}
