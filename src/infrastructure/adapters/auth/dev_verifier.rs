//! Dev Verifier - 开发模式认证
//!
//! token 本身即用户 id，仅接受 `[A-Za-z0-9_-]{1,64}`

use async_trait::async_trait;

use crate::application::ports::{AuthError, AuthUser, AuthVerifierPort};

const MAX_USER_ID_CHARS: usize = 64;

/// 开发模式校验器
#[derive(Debug, Clone, Default)]
pub struct DevVerifier;

impl DevVerifier {
    pub fn new() -> Self {
        Self
    }
}

fn is_valid_user_id(token: &str) -> bool {
    !token.is_empty()
        && token.len() <= MAX_USER_ID_CHARS
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[async_trait]
impl AuthVerifierPort for DevVerifier {
    async fn verify(&self, token: &str) -> Result<AuthUser, AuthError> {
        if !is_valid_user_id(token) {
            return Err(AuthError::InvalidToken(
                "dev token must match [A-Za-z0-9_-]{1,64}".to_string(),
            ));
        }
        Ok(AuthUser {
            user_id: token.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_accepts_plain_user_id() {
        let user = DevVerifier::new().verify("user_2abc-XYZ").await.unwrap();
        assert_eq!(user.user_id, "user_2abc-XYZ");
    }

    #[tokio::test]
    async fn test_rejects_malformed_tokens() {
        let verifier = DevVerifier::new();
        for token in ["", "has space", "semi;colon", &"a".repeat(65)] {
            assert!(
                verifier.verify(token).await.is_err(),
                "token {:?} should be rejected",
                token
            );
        }
    }
}
