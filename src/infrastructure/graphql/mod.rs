//! GraphQL Layer
//!
//! Query/Mutation resolver 直接调用与 REST 相同的 Command/Query Handlers。
//! Schema 本身不持有数据，每个请求附带 `Arc<AppState>` 与 `AuthUser`

mod error;
mod mutation;
mod query;
mod types;

use std::sync::Arc;

use async_graphql::{Context, EmptySubscription, Schema};

use crate::application::AuthUser;
use crate::infrastructure::http::AppState;

pub use error::to_graphql_error;
pub use mutation::MutationRoot;
pub use query::QueryRoot;

pub type CourseSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// 构建 GraphQL Schema
pub fn build_schema() -> CourseSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .limit_depth(8)
        .finish()
}

/// 取出请求级数据：应用状态与当前用户
fn request_scope<'a>(ctx: &Context<'a>) -> async_graphql::Result<(&'a Arc<AppState>, &'a AuthUser)> {
    let state = ctx.data::<Arc<AppState>>()?;
    let user = ctx.data::<AuthUser>()?;
    Ok((state, user))
}
