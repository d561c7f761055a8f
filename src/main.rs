//! Coursely - 课程生成服务
//!
//! - Domain: user/, conversation/, course/, quiz/
//! - Application: commands, queries, ports
//! - Infrastructure: http, graphql, persistence, adapters

use std::sync::Arc;

use coursely::application::{AuthVerifierPort, EnsureLlmModel, EnsureLlmModelHandler, LlmEnginePort};
use coursely::config::{load_config, print_config, AppConfig, AuthProvider, LlmProvider};
use coursely::infrastructure::adapters::{
    ClerkVerifier, DevVerifier, FakeLlmClient, OpenAiClient, OpenAiClientConfig,
};
use coursely::infrastructure::http::{AppState, HttpServer, Ports, ServerConfig};
use coursely::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, DatabaseConfig, SqliteConversationRepository,
    SqliteCourseRepository, SqliteLlmModelRepository, SqliteQuizRepository, SqliteUserRepository,
};

/// 初始化日志
fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},coursely={},tower_http=debug,sqlx=warn",
        config.log.level, config.log.level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// 按配置选择 LLM 引擎
fn build_llm_engine(config: &AppConfig) -> anyhow::Result<Arc<dyn LlmEnginePort>> {
    match config.llm.provider {
        LlmProvider::Openai => {
            let client_config = OpenAiClientConfig::new(&config.llm.base_url)
                .with_api_key(config.llm.api_key.clone())
                .with_timeout(config.llm.timeout_secs);
            Ok(Arc::new(OpenAiClient::new(client_config)?))
        }
        LlmProvider::Fake => {
            tracing::warn!("Using fake LLM engine, level options are canned");
            Ok(Arc::new(FakeLlmClient::new()))
        }
    }
}

/// 按配置选择认证适配器
fn build_auth_verifier(config: &AppConfig) -> anyhow::Result<Arc<dyn AuthVerifierPort>> {
    match config.auth.provider {
        AuthProvider::Clerk => {
            let secret = config
                .auth
                .clerk_secret_key
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("auth.clerk_secret_key is required"))?;
            Ok(Arc::new(ClerkVerifier::new(secret)))
        }
        AuthProvider::Dev => {
            tracing::warn!("Dev auth enabled: bearer token is taken as the user id");
            Ok(Arc::new(DevVerifier::new()))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("Coursely - course generation service");
    print_config(&config);

    // 确保数据目录存在
    if config.database.path != ":memory:" {
        if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    // 初始化数据库
    let db_config = DatabaseConfig {
        database_url: config.database.database_url(),
        max_connections: config.database.max_connections,
    };
    let pool = create_pool(&db_config).await?;
    run_migrations(&pool).await?;

    // 创建 Repository 适配器
    let ports = Ports {
        user_repo: Arc::new(SqliteUserRepository::new(pool.clone())),
        model_repo: Arc::new(SqliteLlmModelRepository::new(pool.clone())),
        conversation_repo: Arc::new(SqliteConversationRepository::new(pool.clone())),
        course_repo: Arc::new(SqliteCourseRepository::new(pool.clone())),
        quiz_repo: Arc::new(SqliteQuizRepository::new(pool.clone())),
        llm_engine: build_llm_engine(&config)?,
        auth_verifier: build_auth_verifier(&config)?,
    };

    // 登记默认模型
    let provider = match config.llm.provider {
        LlmProvider::Openai => "openai",
        LlmProvider::Fake => "fake",
    };
    EnsureLlmModelHandler::new(ports.model_repo.clone())
        .handle(EnsureLlmModel {
            name: config.llm.default_model.clone(),
            provider: provider.to_string(),
        })
        .await?;

    // 创建 HTTP 服务器
    let server_config = ServerConfig::new(&config.server.host, config.server.port);
    let state = AppState::new(ports, &config.llm.default_model);
    let server = HttpServer::new(server_config, state);

    tracing::info!(
        docs = %format!("{}/api/docs", config.server.public_base_url()),
        "Starting HTTP server..."
    );

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    pool.close().await;
    tracing::info!("Server shutdown complete");

    Ok(())
}
