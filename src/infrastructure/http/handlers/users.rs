//! User HTTP Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{GetCurrentUser, UpdateProfile};
use crate::infrastructure::http::dto::{UpdateProfileRequest, UserResponse};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::{ApiJson, CurrentUser};
use crate::infrastructure::http::state::AppState;

/// 当前用户资料
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorized", body = ErrorBody)
    )
)]
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<UserResponse>, ApiError> {
    let record = state
        .get_current_user_handler
        .handle(GetCurrentUser {
            user_id: user.user_id,
        })
        .await?;
    Ok(Json(record.into()))
}

/// 更新资料（email 唯一）
#[utoipa::path(
    put,
    path = "/api/users/me",
    tag = "users",
    security(("bearer" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Invalid request data", body = ErrorBody),
        (status = 409, description = "Email already in use", body = ErrorBody)
    )
)]
pub async fn update_me(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiJson(req): ApiJson<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let record = state
        .update_profile_handler
        .handle(UpdateProfile {
            user_id: user.user_id,
            name: req.name,
            email: req.email,
        })
        .await?;
    Ok(Json(record.into()))
}
