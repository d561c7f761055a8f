//! User Command Handlers

use chrono::Utc;
use std::sync::Arc;

use crate::application::commands::{EnsureUser, UpdateProfile};
use crate::application::error::ApplicationError;
use crate::application::ports::{UserRecord, UserRepositoryPort};
use crate::domain::user::{DisplayName, Email};

// ============================================================================
// EnsureUser
// ============================================================================

/// EnsureUser Handler
///
/// 每个已认证请求都会调用，保证外键引用的用户记录存在
pub struct EnsureUserHandler {
    user_repo: Arc<dyn UserRepositoryPort>,
}

impl EnsureUserHandler {
    pub fn new(user_repo: Arc<dyn UserRepositoryPort>) -> Self {
        Self { user_repo }
    }

    pub async fn handle(&self, command: EnsureUser) -> Result<(), ApplicationError> {
        let now = Utc::now();
        let user = UserRecord {
            id: command.user_id,
            email: None,
            name: None,
            created_at: now,
            updated_at: now,
        };
        self.user_repo.insert_if_absent(&user).await?;
        Ok(())
    }
}

// ============================================================================
// UpdateProfile
// ============================================================================

/// UpdateProfile Handler
pub struct UpdateProfileHandler {
    user_repo: Arc<dyn UserRepositoryPort>,
}

impl UpdateProfileHandler {
    pub fn new(user_repo: Arc<dyn UserRepositoryPort>) -> Self {
        Self { user_repo }
    }

    pub async fn handle(&self, command: UpdateProfile) -> Result<UserRecord, ApplicationError> {
        let name = command
            .name
            .as_deref()
            .map(|n| DisplayName::parse("name", n))
            .transpose()?;
        let email = command
            .email
            .as_deref()
            .map(|e| Email::parse("email", e))
            .transpose()?;

        let mut user = self
            .user_repo
            .find_by_id(&command.user_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("User", &command.user_id))?;

        if let Some(name) = name {
            user.name = Some(name.as_str().to_string());
        }
        if let Some(email) = email {
            user.email = Some(email.as_str().to_string());
        }
        user.updated_at = Utc::now();

        self.user_repo.update(&user).await?;

        tracing::info!(user_id = %user.id, "User profile updated");

        Ok(user)
    }
}
