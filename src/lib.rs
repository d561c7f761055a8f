//! Coursely - 课程生成服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - User / Conversation / Course / Quiz 值对象与规则
//! - 学习级别建议的解析、测验评分
//!
//! 应用层 (application/):
//! - Ports: 端口定义（Repositories, LlmEngine, AuthVerifier）
//! - Commands: CQRS 命令处理器
//! - Queries: CQRS 查询处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API + 统一错误归一化 + OpenAPI
//! - GraphQL: 与 REST 共用同一组处理器
//! - Persistence: SQLite 存储
//! - Adapters: OpenAI 兼容 LLM 客户端、Clerk 认证

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
