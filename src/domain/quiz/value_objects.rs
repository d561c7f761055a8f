//! Quiz Context - Value Objects

use crate::domain::DomainError;

/// 校验后的题目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDraft {
    prompt: String,
    options: Vec<String>,
    correct_option: u32,
    explanation: Option<String>,
}

impl QuestionDraft {
    pub const MIN_OPTIONS: usize = 2;
    pub const MAX_OPTIONS: usize = 6;
    pub const MAX_PROMPT_CHARS: usize = 2000;

    /// `field` 为题目在请求中的路径前缀，例如 `questions[2]`
    pub fn parse(
        field: &str,
        prompt: &str,
        options: &[String],
        correct_option: u32,
        explanation: Option<&str>,
    ) -> Result<Self, DomainError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(DomainError::invalid(
                format!("{}.prompt", field),
                "must not be empty",
            ));
        }
        if prompt.chars().count() > Self::MAX_PROMPT_CHARS {
            return Err(DomainError::invalid(
                format!("{}.prompt", field),
                format!("must be at most {} characters", Self::MAX_PROMPT_CHARS),
            ));
        }

        if options.len() < Self::MIN_OPTIONS || options.len() > Self::MAX_OPTIONS {
            return Err(DomainError::invalid(
                format!("{}.options", field),
                format!(
                    "must contain between {} and {} options",
                    Self::MIN_OPTIONS,
                    Self::MAX_OPTIONS
                ),
            ));
        }

        let mut cleaned = Vec::with_capacity(options.len());
        for (i, option) in options.iter().enumerate() {
            let option = option.trim();
            if option.is_empty() {
                return Err(DomainError::invalid(
                    format!("{}.options[{}]", field, i),
                    "must not be empty",
                ));
            }
            cleaned.push(option.to_string());
        }

        if correct_option as usize >= cleaned.len() {
            return Err(DomainError::invalid(
                format!("{}.correct_option", field),
                format!("must be an index below {}", cleaned.len()),
            ));
        }

        let explanation = explanation
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string);

        Ok(Self {
            prompt: prompt.to_string(),
            options: cleaned,
            correct_option,
            explanation,
        })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn correct_option(&self) -> u32 {
        self.correct_option
    }

    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_valid_question() {
        let q = QuestionDraft::parse(
            "questions[0]",
            " What is 2 + 2? ",
            &opts(&["3", " 4 "]),
            1,
            Some("  "),
        )
        .unwrap();
        assert_eq!(q.prompt(), "What is 2 + 2?");
        assert_eq!(q.options()[1], "4");
        assert_eq!(q.explanation(), None);
    }

    #[test]
    fn test_correct_option_out_of_range() {
        let err = QuestionDraft::parse("questions[1]", "Pick", &opts(&["a", "b"]), 2, None)
            .unwrap_err();
        match err {
            DomainError::InvalidField { field, .. } => {
                assert_eq!(field, "questions[1].correct_option")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_option_count_bounds() {
        assert!(QuestionDraft::parse("q", "Pick", &opts(&["only"]), 0, None).is_err());
        let many = opts(&["a", "b", "c", "d", "e", "f", "g"]);
        assert!(QuestionDraft::parse("q", "Pick", &many, 0, None).is_err());
    }
}
