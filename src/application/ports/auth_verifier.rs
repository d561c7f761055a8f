//! Auth Verifier Port - 请求身份校验

use async_trait::async_trait;
use thiserror::Error;

/// 认证错误
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing bearer token")]
    MissingToken,

    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

/// 已认证的请求主体
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    /// 认证服务的 subject，同时作为本地用户 id
    pub user_id: String,
}

/// Auth Verifier Port
#[async_trait]
pub trait AuthVerifierPort: Send + Sync {
    async fn verify(&self, token: &str) -> Result<AuthUser, AuthError>;
}
