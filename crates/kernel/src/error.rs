//! Application error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// A single field-level validation failure.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldViolation {
    /// Name of the offending request field.
    pub field: &'static str,

    /// Human-readable description of the violation.
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("not found")]
    NotFound,

    #[error("invalid sort field: {0}")]
    InvalidSortField(String),

    #[error("invalid sort direction: {0}")]
    InvalidSortDirection(String),

    #[error("validation failed")]
    Validation(Vec<FieldViolation>),

    #[error("{entity} {id} not found")]
    ForeignKeyNotFound { entity: &'static str, id: Uuid },

    #[error("database error")]
    Database(#[from] sqlx::Error),

    /// Failure to begin, commit, or roll back a transaction scope. Errors
    /// returned by steps inside the scope propagate unchanged instead.
    #[error("transaction error")]
    Transaction(sqlx::Error),

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Map each error kind to its HTTP status. This is the single,
    /// immutable error-to-status table; no runtime registration exists.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::InvalidSortField(_)
            | AppError::InvalidSortDirection(_)
            | AppError::Validation(_)
            | AppError::ForeignKeyNotFound { .. } => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Transaction(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    violations: Option<Vec<FieldViolation>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Store failures are logged with detail but rendered generically so
        // backend error text never reaches clients.
        let body = match self {
            AppError::Database(ref e) => {
                tracing::error!(error = %e, "database error");
                ErrorBody {
                    error: "internal server error".to_string(),
                    violations: None,
                }
            }
            AppError::Transaction(ref e) => {
                tracing::error!(error = %e, "transaction error");
                ErrorBody {
                    error: "internal server error".to_string(),
                    violations: None,
                }
            }
            AppError::Internal(ref e) => {
                tracing::error!(error = %e, "internal server error");
                ErrorBody {
                    error: "internal server error".to_string(),
                    violations: None,
                }
            }
            AppError::Validation(violations) => ErrorBody {
                error: "validation failed".to_string(),
                violations: Some(violations),
            },
            other => ErrorBody {
                error: other.to_string(),
                violations: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias using AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(AppError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::InvalidSortField("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::InvalidSortDirection("sideways".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Validation(vec![]).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::ForeignKeyNotFound {
                entity: "category",
                id: Uuid::nil()
            }
            .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Database(sqlx::Error::RowNotFound).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Transaction(sqlx::Error::RowNotFound).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn foreign_key_message_names_entity() {
        let err = AppError::ForeignKeyNotFound {
            entity: "supplier",
            id: Uuid::nil(),
        };
        let msg = err.to_string();
        assert!(msg.contains("supplier"));
        assert!(msg.contains("not found"));
    }
}
