//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::response::{IntoResponse, Response};
use kernel::context::Interrupted;
use kernel::error::{app_error::AppError, kind::ErrorKind};
use storage::StorageError;
use thiserror::Error;

use crate::domain::token::TokenError;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Message for every failed login, whatever the cause
pub const INVALID_CREDENTIALS_MESSAGE: &str = "email or password is incorrect";

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed sign-up or login input
    #[error("{0}")]
    Validation(String),

    /// Sign-up with an email that is already registered
    #[error("User with this email already exists!")]
    EmailTaken,

    /// Unknown email or wrong password
    #[error("{}", INVALID_CREDENTIALS_MESSAGE)]
    InvalidCredentials,

    /// No `token` cookie on a protected request
    #[error("Missing session token")]
    MissingToken,

    /// Token failed verification
    #[error("Invalid session token: {0}")]
    InvalidToken(#[from] TokenError),

    /// Storage call failed
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Hashing did not finish within the request context
    #[error("Password hashing interrupted: {0}")]
    Interrupted(#[from] Interrupted),

    /// Hashing itself failed
    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_) | AuthError::EmailTaken => ErrorKind::BadRequest,
            AuthError::InvalidCredentials
            | AuthError::MissingToken
            | AuthError::InvalidToken(_) => ErrorKind::Unauthorized,
            AuthError::Storage(e) if e.is_deadline_exceeded() => ErrorKind::GatewayTimeout,
            AuthError::Interrupted(Interrupted::DeadlineExceeded) => ErrorKind::GatewayTimeout,
            AuthError::Storage(_)
            | AuthError::Interrupted(_)
            | AuthError::PasswordHash(_)
            | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    ///
    /// Server-side failures get a generic message; the detail is logged.
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
            AuthError::Storage(e) => match e.operation() {
                Some(op) => tracing::error!(op = %op, error = %e, "Auth storage error"),
                None => tracing::error!(error = %e, "Auth storage error"),
            },
            AuthError::Interrupted(e) => {
                tracing::error!(error = %e, "Auth hashing interrupted");
            }
            AuthError::PasswordHash(msg) | AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::InvalidToken(e) => {
                tracing::debug!(reason = %e, "Rejected session token");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
