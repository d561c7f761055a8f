//! User Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{UserRecord, UserRepositoryPort};
use crate::application::queries::GetCurrentUser;

/// GetCurrentUser Handler
pub struct GetCurrentUserHandler {
    user_repo: Arc<dyn UserRepositoryPort>,
}

impl GetCurrentUserHandler {
    pub fn new(user_repo: Arc<dyn UserRepositoryPort>) -> Self {
        Self { user_repo }
    }

    pub async fn handle(&self, query: GetCurrentUser) -> Result<UserRecord, ApplicationError> {
        self.user_repo
            .find_by_id(&query.user_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("User", &query.user_id))
    }
}
