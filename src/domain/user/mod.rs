//! User Context - 用户资料

mod value_objects;

pub use value_objects::{DisplayName, Email};
