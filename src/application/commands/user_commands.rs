//! User Commands

/// 确保已认证用户在本地存在
#[derive(Debug, Clone)]
pub struct EnsureUser {
    pub user_id: String,
}

/// 更新用户资料命令（None 表示不修改）
#[derive(Debug, Clone)]
pub struct UpdateProfile {
    pub user_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
}
