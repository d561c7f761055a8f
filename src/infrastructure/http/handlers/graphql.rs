//! GraphQL HTTP Handler

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::infrastructure::http::extract::{ApiJson, CurrentUser};
use crate::infrastructure::http::state::AppState;

/// GraphQL 请求体（仅用于文档）
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlRequestDoc {
    pub query: String,
    pub operation_name: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub variables: Value,
}

/// GraphQL 响应体（仅用于文档）
#[derive(Serialize, ToSchema)]
pub struct GraphqlResponseDoc {
    #[schema(value_type = Option<Object>)]
    pub data: Value,
    /// 每项含 `message` 与 `extensions: {status, code, details}`
    #[schema(value_type = Option<Vec<Object>>)]
    pub errors: Value,
}

/// 执行 GraphQL 请求
///
/// 解析失败与 resolver 错误都以 GraphQL `errors` 数组返回，状态码为 200
#[utoipa::path(
    post,
    path = "/api/graphql",
    tag = "graphql",
    security(("bearer" = [])),
    request_body = GraphqlRequestDoc,
    responses(
        (status = 200, description = "GraphQL response", body = GraphqlResponseDoc),
        (status = 400, description = "Body is not a GraphQL request", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody)
    )
)]
pub async fn graphql_handler(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiJson(request): ApiJson<async_graphql::Request>,
) -> Json<async_graphql::Response> {
    let request = request.data(state.clone()).data(user);
    Json(state.graphql_schema.execute(request).await)
}
