//! Clerk Verifier - 通过 Clerk JWKS 校验会话 JWT
//!
//! 公钥由 `MemoryCacheJwksProvider` 在内存中缓存

use async_trait::async_trait;
use clerk_rs::clerk::Clerk;
use clerk_rs::validators::authorizer::validate_jwt;
use clerk_rs::validators::jwks::MemoryCacheJwksProvider;
use clerk_rs::ClerkConfiguration;
use std::sync::Arc;

use crate::application::ports::{AuthError, AuthUser, AuthVerifierPort};

/// Clerk JWT 校验器
pub struct ClerkVerifier {
    provider: Arc<MemoryCacheJwksProvider>,
}

impl ClerkVerifier {
    pub fn new(secret_key: &str) -> Self {
        let config = ClerkConfiguration::new(None, None, Some(secret_key.to_string()), None);
        let clerk = Clerk::new(config);
        Self {
            provider: Arc::new(MemoryCacheJwksProvider::new(clerk)),
        }
    }
}

#[async_trait]
impl AuthVerifierPort for ClerkVerifier {
    async fn verify(&self, token: &str) -> Result<AuthUser, AuthError> {
        let clerk_jwt = validate_jwt(token, self.provider.clone())
            .await
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        if clerk_jwt.sub.is_empty() {
            return Err(AuthError::InvalidToken("token has no subject".to_string()));
        }

        Ok(AuthUser {
            user_id: clerk_jwt.sub,
        })
    }
}
