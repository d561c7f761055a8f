//! HTTP Handlers

mod chapters;
mod conversations;
mod courses;
mod graphql;
mod learning;
mod models;
mod ping;
mod quizzes;
mod users;

pub use chapters::*;
pub use conversations::*;
pub use courses::*;
pub use graphql::*;
pub use learning::*;
pub use models::*;
pub use ping::*;
pub use quizzes::*;
pub use users::*;
