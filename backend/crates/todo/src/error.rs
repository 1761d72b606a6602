//! Todo Error Types
//!
//! This module provides todo-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use storage::StorageError;
use thiserror::Error;

/// Todo-specific result type alias
pub type TodoResult<T> = Result<T, TodoError>;

/// Todo-specific error variants
#[derive(Debug, Error)]
pub enum TodoError {
    /// Path names a user other than the caller
    #[error("You may only access your own todos")]
    Forbidden,

    /// Malformed request body
    #[error("{0}")]
    Validation(String),

    /// Storage call failed, including lookups that matched nothing
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl TodoError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            TodoError::Forbidden => ErrorKind::Forbidden,
            TodoError::Validation(_) => ErrorKind::BadRequest,
            TodoError::Storage(e) if e.is_deadline_exceeded() => ErrorKind::GatewayTimeout,
            TodoError::Storage(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    ///
    /// Storage detail stays in the log, not the response.
    pub fn to_app_error(&self) -> AppError {
        match self.kind() {
            ErrorKind::GatewayTimeout => AppError::timeout("The request took too long"),
            kind if kind.is_server_error() => AppError::internal("Internal server error"),
            kind => AppError::new(kind, self.to_string()),
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            TodoError::Storage(e) => match e.operation() {
                Some(op) => tracing::error!(op = %op, error = %e, "Todo storage error"),
                None => tracing::error!(error = %e, "Todo storage error"),
            },
            TodoError::Forbidden => {
                tracing::warn!("Cross-user todo access rejected");
            }
            TodoError::Validation(msg) => {
                tracing::debug!(message = %msg, "Todo validation error");
            }
        }
    }
}

impl IntoResponse for TodoError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
