//! User Queries

/// 获取当前用户资料
#[derive(Debug, Clone)]
pub struct GetCurrentUser {
    pub user_id: String,
}
