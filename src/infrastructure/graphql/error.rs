//! GraphQL 错误映射
//!
//! 与 REST 共用 `ApiError::normalize` 的状态码/消息表，
//! 归一化结果放入 extensions：`{status, code, details}`

use async_graphql::{Error, ErrorExtensions, Value};

use crate::application::ApplicationError;
use crate::infrastructure::http::ApiError;

/// 应用层错误 → GraphQL 错误
pub fn to_graphql_error(err: ApplicationError) -> Error {
    let normalized = ApiError::from(err).report();
    let details = Value::from_json(normalized.details.clone()).unwrap_or(Value::Null);

    Error::new(normalized.message).extend_with(|_, e| {
        e.set("status", i32::from(normalized.status.as_u16()));
        e.set("code", normalized.code);
        e.set("details", details);
    })
}

/// 便于在 resolver 中使用 `?`
pub trait GraphqlResultExt<T> {
    fn gql(self) -> async_graphql::Result<T>;
}

impl<T> GraphqlResultExt<T> for Result<T, ApplicationError> {
    fn gql(self) -> async_graphql::Result<T> {
        self.map_err(to_graphql_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{ConstraintKind, ConstraintViolation};

    fn extension(err: &Error, key: &str) -> Option<Value> {
        err.extensions.as_ref().and_then(|ext| ext.get(key).cloned())
    }

    #[test]
    fn test_not_found_carries_status_and_code() {
        let err = to_graphql_error(ApplicationError::not_found("Course", "abc"));
        assert_eq!(err.message, "Resource not found");
        assert_eq!(extension(&err, "status"), Some(Value::from(404)));
        assert_eq!(extension(&err, "code"), Some(Value::from("NOT_FOUND")));
    }

    #[test]
    fn test_unique_violation_maps_to_conflict() {
        let err = to_graphql_error(ApplicationError::Constraint(ConstraintViolation::new(
            ConstraintKind::Unique,
            "UNIQUE constraint failed: users.email",
        )));
        assert_eq!(err.message, "A record with this value already exists");
        assert_eq!(extension(&err, "status"), Some(Value::from(409)));
        assert_eq!(extension(&err, "code"), Some(Value::from("UNIQUE_VIOLATION")));
    }

    #[test]
    fn test_internal_error_hides_cause() {
        let err = to_graphql_error(ApplicationError::internal("secret connection string"));
        assert_eq!(err.message, "Internal server error");
        assert_eq!(extension(&err, "details"), Some(Value::Null));
    }
}
