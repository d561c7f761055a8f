//! Conversation HTTP Handlers

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::{
    AddMessage, CreateConversation, DeleteConversation, GetConversation, ListConversations,
    RenameConversation,
};
use crate::infrastructure::http::dto::{
    AddMessageRequest, ConversationDetailResponse, ConversationResponse,
    CreateConversationRequest, MessageResponse, RenameConversationRequest,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::{ApiJson, ApiPath, CurrentUser};
use crate::infrastructure::http::state::AppState;

/// 列出当前用户的对话
#[utoipa::path(
    get,
    path = "/api/conversations",
    tag = "conversations",
    security(("bearer" = [])),
    responses((status = 200, description = "Conversations, most recently updated first", body = [ConversationResponse]))
)]
pub async fn list_conversations(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<ConversationResponse>>, ApiError> {
    let conversations = state
        .list_conversations_handler
        .handle(ListConversations {
            user_id: user.user_id,
        })
        .await?;
    Ok(Json(conversations.into_iter().map(Into::into).collect()))
}

/// 创建对话
#[utoipa::path(
    post,
    path = "/api/conversations",
    tag = "conversations",
    security(("bearer" = [])),
    request_body = CreateConversationRequest,
    responses(
        (status = 201, description = "Conversation created", body = ConversationResponse),
        (status = 400, description = "Invalid request data", body = ErrorBody)
    )
)]
pub async fn create_conversation(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiJson(req): ApiJson<CreateConversationRequest>,
) -> Result<(StatusCode, Json<ConversationResponse>), ApiError> {
    let conversation = state
        .create_conversation_handler
        .handle(CreateConversation {
            user_id: user.user_id,
            title: req.title,
            llm_model_id: req.llm_model_id,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(conversation.into())))
}

/// 获取对话及其消息
#[utoipa::path(
    get,
    path = "/api/conversations/{id}",
    tag = "conversations",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Conversation id")),
    responses(
        (status = 200, description = "Conversation with messages", body = ConversationDetailResponse),
        (status = 403, description = "Owned by another user", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn get_conversation(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ConversationDetailResponse>, ApiError> {
    let detail = state
        .get_conversation_handler
        .handle(GetConversation {
            user_id: user.user_id,
            conversation_id: id,
        })
        .await?;
    Ok(Json(detail.into()))
}

/// 重命名对话
#[utoipa::path(
    put,
    path = "/api/conversations/{id}",
    tag = "conversations",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Conversation id")),
    request_body = RenameConversationRequest,
    responses(
        (status = 200, description = "Conversation renamed", body = ConversationResponse),
        (status = 403, description = "Owned by another user", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn rename_conversation(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<RenameConversationRequest>,
) -> Result<Json<ConversationResponse>, ApiError> {
    let conversation = state
        .rename_conversation_handler
        .handle(RenameConversation {
            user_id: user.user_id,
            conversation_id: id,
            title: req.title,
        })
        .await?;
    Ok(Json(conversation.into()))
}

/// 删除对话（消息一并删除）
#[utoipa::path(
    delete,
    path = "/api/conversations/{id}",
    tag = "conversations",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Conversation id")),
    responses(
        (status = 204, description = "Conversation deleted"),
        (status = 403, description = "Owned by another user", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn delete_conversation(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state
        .delete_conversation_handler
        .handle(DeleteConversation {
            user_id: user.user_id,
            conversation_id: id,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// 列出对话消息（按时间顺序）
#[utoipa::path(
    get,
    path = "/api/conversations/{id}/messages",
    tag = "conversations",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Conversation id")),
    responses(
        (status = 200, description = "Messages in chronological order", body = [MessageResponse]),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Vec<MessageResponse>>, ApiError> {
    let detail = state
        .get_conversation_handler
        .handle(GetConversation {
            user_id: user.user_id,
            conversation_id: id,
        })
        .await?;
    Ok(Json(detail.messages.into_iter().map(Into::into).collect()))
}

/// 追加消息
#[utoipa::path(
    post,
    path = "/api/conversations/{id}/messages",
    tag = "conversations",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Conversation id")),
    request_body = AddMessageRequest,
    responses(
        (status = 201, description = "Message stored", body = MessageResponse),
        (status = 400, description = "Invalid request data", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn add_message(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<AddMessageRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let message = state
        .add_message_handler
        .handle(AddMessage {
            user_id: user.user_id,
            conversation_id: id,
            role: req.role,
            content: req.content,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(message.into())))
}
