//! Ping Handler
//!
//! 健康检查，不需要认证

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::infrastructure::http::state::AppState;

/// Ping 响应
#[derive(Serialize, ToSchema)]
pub struct PingResponse {
    pub status: String,
    pub version: String,
    /// LLM 服务是否可用：up | down
    pub llm: String,
}

/// Ping endpoint - 健康检查
///
/// 服务本身可响应即返回 200，LLM 不可用时只体现在 `llm` 字段
#[utoipa::path(
    get,
    path = "/api/ping",
    tag = "system",
    responses((status = 200, description = "Service is up", body = PingResponse))
)]
pub async fn ping(State(state): State<Arc<AppState>>) -> Json<PingResponse> {
    let llm = if state.llm_engine.health_check().await {
        "up"
    } else {
        tracing::warn!("LLM health check failed");
        "down"
    };

    Json(PingResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        llm: llm.to_string(),
    })
}
