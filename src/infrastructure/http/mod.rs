//! HTTP Layer - RESTful API + GraphQL
//!
//! 错误统一经过 `ApiError` 归一化为 `{message, details}`

pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod server;
pub mod state;

#[cfg(test)]
mod tests;

pub use error::{ApiError, ErrorBody};
pub use routes::create_routes;
pub use server::{build_router, HttpServer, ServerConfig};
pub use state::{AppState, Ports};
