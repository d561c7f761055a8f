//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, AuthProvider};

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `COURSELY_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `COURSELY_SERVER__PORT=8080`
/// - `COURSELY_DATABASE__PATH=/data/coursely.db`
/// - `COURSELY_LLM__API_KEY=sk-...`
/// - `COURSELY_AUTH__CLERK_SECRET_KEY=sk_live_...`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080)?
        .set_default("database.path", "data/coursely.db")?
        .set_default("database.max_connections", 5)?
        .set_default("llm.provider", "openai")?
        .set_default("llm.base_url", "https://api.openai.com/v1")?
        .set_default("llm.default_model", "gpt-4o-mini")?
        .set_default("llm.timeout_secs", 60)?
        .set_default("auth.provider", "clerk")?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 例如: COURSELY_LLM__DEFAULT_MODEL=gpt-4o
    builder = builder.add_source(
        Environment::with_prefix("COURSELY")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.database.path.is_empty() {
        return Err(ConfigError::ValidationError(
            "Database path cannot be empty".to_string(),
        ));
    }

    if config.database.max_connections == 0 {
        return Err(ConfigError::ValidationError(
            "Database max_connections cannot be 0".to_string(),
        ));
    }

    if config.llm.default_model.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "LLM default_model cannot be empty".to_string(),
        ));
    }

    if config.llm.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "LLM base_url cannot be empty".to_string(),
        ));
    }

    let has_clerk_secret = config
        .auth
        .clerk_secret_key
        .as_deref()
        .is_some_and(|key| !key.trim().is_empty());
    if config.auth.provider == AuthProvider::Clerk && !has_clerk_secret {
        return Err(ConfigError::ValidationError(
            "auth.clerk_secret_key is required when auth.provider = \"clerk\"".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志，不输出密钥）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Public Base URL: {}", config.server.public_base_url());
    tracing::info!("Database: {}", config.database.path);
    tracing::info!("Database Max Connections: {}", config.database.max_connections);
    tracing::info!("LLM Provider: {:?}", config.llm.provider);
    tracing::info!("LLM Base URL: {}", config.llm.base_url);
    tracing::info!("LLM Default Model: {}", config.llm.default_model);
    tracing::info!("LLM Timeout: {}s", config.llm.timeout_secs);
    tracing::info!("Auth Provider: {:?}", config.auth.provider);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LlmProvider;
    use std::io::Write;

    fn valid_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.auth.clerk_secret_key = Some("sk_test_123".to_string());
        config
    }

    #[test]
    fn test_default_values() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.llm.default_model, "gpt-4o-mini");
        assert_eq!(config.auth.provider, AuthProvider::Clerk);
    }

    #[test]
    fn test_validation_passes_for_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = valid_config();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_empty_db_path() {
        let mut config = valid_config();
        config.database.path = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_blank_default_model() {
        let mut config = valid_config();
        config.llm.default_model = "  ".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_clerk_requires_secret_key() {
        let mut config = valid_config();
        config.auth.clerk_secret_key = None;
        assert!(validate_config(&config).is_err());

        config.auth.provider = AuthProvider::Dev;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 9000

[database]
path = ":memory:"

[llm]
provider = "fake"
default_model = "fake-model"

[auth]
provider = "dev"
"#
        )
        .unwrap();

        let config = load_config_from_path(Some(file.path())).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.database.database_url(), "sqlite::memory:");
        assert_eq!(config.llm.provider, LlmProvider::Fake);
        assert_eq!(config.llm.default_model, "fake-model");
        assert_eq!(config.auth.provider, AuthProvider::Dev);
    }

    #[test]
    fn test_load_from_file_rejects_unknown_provider() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[auth]\nprovider = \"magic\"").unwrap();

        let result = load_config_from_path(Some(file.path()));
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }
}
