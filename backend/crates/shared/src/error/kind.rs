//! Error Kind
//!
//! The closed set of outcomes a request can fail with, one per HTTP status
//! the service emits.

use serde::Serialize;

/// Failure class of a request
///
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// assert_eq!(ErrorKind::Forbidden.status_code(), 403);
/// assert!(ErrorKind::GatewayTimeout.is_server_error());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorKind {
    /// Malformed body or rejected input; storage was not touched
    BadRequest,
    /// Missing, forged or expired token, or failed login
    Unauthorized,
    /// Path names another user
    Forbidden,
    /// Backend failure, unmatched record, cancelled operation
    InternalServerError,
    /// Request deadline passed
    GatewayTimeout,
}

impl ErrorKind {
    #[inline]
    pub const fn status_code(&self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::Unauthorized => 401,
            ErrorKind::Forbidden => 403,
            ErrorKind::InternalServerError => 500,
            ErrorKind::GatewayTimeout => 504,
        }
    }

    /// Reason phrase, used as the problem `title`
    #[inline]
    pub const fn title(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "Bad Request",
            ErrorKind::Unauthorized => "Unauthorized",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::InternalServerError => "Internal Server Error",
            ErrorKind::GatewayTimeout => "Gateway Timeout",
        }
    }

    /// 5xx: the detail belongs in the log, not the response
    #[inline]
    pub const fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_server_failures_are_5xx() {
        let client = [
            ErrorKind::BadRequest,
            ErrorKind::Unauthorized,
            ErrorKind::Forbidden,
        ];
        assert!(client.iter().all(|k| !k.is_server_error()));
        assert!(ErrorKind::InternalServerError.is_server_error());
        assert_eq!(ErrorKind::GatewayTimeout.status_code(), 504);
    }

    #[test]
    fn test_serializes_as_constant_name() {
        assert_eq!(
            serde_json::to_string(&ErrorKind::GatewayTimeout).unwrap(),
            "\"GATEWAY_TIMEOUT\""
        );
    }
}
