//! Learning Level Options
//!
//! LLM 返回的学习级别建议:
//! `{"levels": [{"level": "beginner", "title": "...", "description": "..."}]}`
//! 也接受裸数组和 Markdown 代码块包裹的 JSON

use serde::{Deserialize, Serialize};

use crate::domain::course::{LearningGoal, LearningLevel};
use crate::domain::DomainError;

/// 单个学习级别建议
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelOption {
    pub level: LearningLevel,
    pub title: String,
    pub description: String,
}

#[derive(Deserialize)]
struct RawOption {
    level: String,
    title: String,
    #[serde(default)]
    description: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPayload {
    Wrapped { levels: Vec<RawOption> },
    Bare(Vec<RawOption>),
}

/// 生成请求学习级别建议的系统提示词
pub fn level_options_prompt() -> String {
    let levels: Vec<&str> = LearningLevel::ALL.iter().map(|l| l.as_str()).collect();
    format!(
        "You are a curriculum designer. The user states a learning goal. \
         Propose between 2 and 4 learning levels suited to that goal. \
         Reply with JSON only, no prose, in the form \
         {{\"levels\":[{{\"level\":\"<level>\",\"title\":\"<short title>\",\"description\":\"<one or two sentences>\"}}]}}. \
         Allowed level values: {}.",
        levels.join(", ")
    )
}

/// 用户消息：包含学习目标
pub fn level_options_user_message(goal: &LearningGoal) -> String {
    format!("My learning goal: {}", goal.as_str())
}

/// 解析 LLM 返回的学习级别建议
///
/// - 去除 ```json 代码块
/// - 重复的级别只保留第一次出现
/// - 空列表、未知级别、空标题均视为格式错误
pub fn parse_level_options(raw: &str) -> Result<Vec<LevelOption>, DomainError> {
    let json = extract_json(raw)
        .ok_or_else(|| DomainError::MalformedLevelOptions("no JSON payload found".to_string()))?;

    let payload: RawPayload = serde_json::from_str(json)
        .map_err(|e| DomainError::MalformedLevelOptions(e.to_string()))?;

    let raw_options = match payload {
        RawPayload::Wrapped { levels } => levels,
        RawPayload::Bare(levels) => levels,
    };

    let mut options: Vec<LevelOption> = Vec::with_capacity(raw_options.len());
    for option in raw_options {
        let level: LearningLevel = option.level.parse().map_err(|_| {
            DomainError::MalformedLevelOptions(format!("unknown level: {}", option.level))
        })?;
        let title = option.title.trim();
        if title.is_empty() {
            return Err(DomainError::MalformedLevelOptions(format!(
                "empty title for level {}",
                level
            )));
        }
        if options.iter().any(|o| o.level == level) {
            continue;
        }
        options.push(LevelOption {
            level,
            title: title.to_string(),
            description: option.description.trim().to_string(),
        });
    }

    if options.is_empty() {
        return Err(DomainError::MalformedLevelOptions(
            "no level options returned".to_string(),
        ));
    }

    Ok(options)
}

/// 截取第一个 `{` / `[` 到与之对应的最后一个 `}` / `]` 之间的文本
fn extract_json(raw: &str) -> Option<&str> {
    let start = raw.find(|c: char| c == '{' || c == '[')?;
    let close = if raw[start..].starts_with('{') { '}' } else { ']' };
    let end = raw.rfind(close)?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wrapped_payload() {
        let raw = r#"{"levels":[
            {"level":"beginner","title":"Foundations","description":"Start here."},
            {"level":"advanced","title":"Deep dive","description":"Internals."}
        ]}"#;
        let options = parse_level_options(raw).unwrap();
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].level, LearningLevel::Beginner);
        assert_eq!(options[1].title, "Deep dive");
    }

    #[test]
    fn test_parse_fenced_bare_array() {
        let raw = "Sure!\n```json\n[{\"level\":\"Intermediate\",\"title\":\"Builder\"}]\n```";
        let options = parse_level_options(raw).unwrap();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].level, LearningLevel::Intermediate);
        assert_eq!(options[0].description, "");
    }

    #[test]
    fn test_duplicate_levels_keep_first() {
        let raw = r#"[{"level":"expert","title":"A"},{"level":"expert","title":"B"}]"#;
        let options = parse_level_options(raw).unwrap();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].title, "A");
    }

    #[test]
    fn test_rejects_empty_and_unknown() {
        assert!(parse_level_options(r#"{"levels":[]}"#).is_err());
        assert!(parse_level_options(r#"[{"level":"wizard","title":"x"}]"#).is_err());
        assert!(parse_level_options("I cannot help with that.").is_err());
    }

    #[test]
    fn test_prompt_lists_all_levels() {
        let prompt = level_options_prompt();
        for level in LearningLevel::ALL {
            assert!(prompt.contains(level.as_str()));
        }
    }
}
