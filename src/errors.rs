// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for entire application

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use sqlx::error::ErrorKind;
use thiserror::Error;

/// Outcome of a failed statement, classified by SQLSTATE
/// DOCUMENTATION: Repositories return this so callers can tell a unique
/// violation from a foreign-key violation without looking at message text
#[derive(Error, Debug)]
pub enum DbError {
    #[error("duplicate key violates unique constraint {}", .constraint.as_deref().unwrap_or("unknown"))]
    DuplicateKey { constraint: Option<String> },

    #[error("foreign key constraint {} violated", .constraint.as_deref().unwrap_or("unknown"))]
    ForeignKeyViolation { constraint: Option<String> },

    #[error("check constraint {} violated", .constraint.as_deref().unwrap_or("unknown"))]
    CheckViolation { constraint: Option<String> },

    #[error("Database error: {0}")]
    Other(sqlx::Error),
}

impl DbError {
    /// Name of the violated constraint, if the driver reported one
    pub fn constraint(&self) -> Option<&str> {
        match self {
            DbError::DuplicateKey { constraint }
            | DbError::ForeignKeyViolation { constraint }
            | DbError::CheckViolation { constraint } => constraint.as_deref(),
            DbError::Other(_) => None,
        }
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        let kind = match &err {
            sqlx::Error::Database(db) => {
                let constraint = db.constraint().map(str::to_string);
                match db.kind() {
                    ErrorKind::UniqueViolation => Some(DbError::DuplicateKey { constraint }),
                    ErrorKind::ForeignKeyViolation => {
                        Some(DbError::ForeignKeyViolation { constraint })
                    }
                    ErrorKind::CheckViolation => Some(DbError::CheckViolation { constraint }),
                    _ => None,
                }
            }
            _ => None,
        };

        kind.unwrap_or(DbError::Other(err))
    }
}

/// Application-specific error types
/// DOCUMENTATION: Each variant maps to one HTTP status code;
/// the message is returned verbatim as `{"error": message}`
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// Duplicate key
    #[error("{0}")]
    Conflict(String),

    /// Missing parent or existing dependents
    #[error("{0}")]
    ForeignKey(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Authentication required")]
    Unauthorized,

    #[error("{0}")]
    Upload(String),

    #[error("{0}")]
    Internal(String),
}

/// Fallback mapping for constraint errors no service claimed
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::DuplicateKey { .. } => ApiError::Conflict("Record already exists".to_string()),
            DbError::ForeignKeyViolation { .. } => {
                ApiError::ForeignKey("Record is referenced by, or references, another record".to_string())
            }
            DbError::CheckViolation { .. } => {
                ApiError::Validation("Value is outside the allowed range".to_string())
            }
            DbError::Other(e) => {
                log::error!("Unclassified database error: {}", e);
                ApiError::Internal(format!("Database error: {}", e))
            }
        }
    }
}

/// Convert ApiError to HTTP response
impl ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::ForeignKey(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Upload(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::Validation("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Conflict("x".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(ApiError::ForeignKey("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Upload("x".into()).status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            ApiError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn test_error_body_shape() {
        let resp = ApiError::Conflict("College code already exists".into()).error_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value, json!({ "error": "College code already exists" }));
    }

    #[test]
    fn test_fallback_mapping() {
        let err: ApiError = DbError::DuplicateKey {
            constraint: Some("college_table_college_code_key".into()),
        }
        .into();
        assert!(matches!(err, ApiError::Conflict(_)));

        let err: ApiError = DbError::ForeignKeyViolation { constraint: None }.into();
        assert!(matches!(err, ApiError::ForeignKey(_)));

        let err: ApiError = DbError::Other(sqlx::Error::RowNotFound).into();
        assert!(matches!(err, ApiError::Internal(_)));
    }

    #[test]
    fn test_non_database_errors_stay_unclassified() {
        let err = DbError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, DbError::Other(_)));
        assert!(err.constraint().is_none());
    }
}
