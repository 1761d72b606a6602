//! Session Guard
//!
//! Decides whether a request's credentials are valid and whether the token
//! should be reissued. Pure with respect to storage: the answer depends only
//! on the token, the key and the clock.
//!
//! Concurrent requests near expiry may each reissue; every reissued token is
//! independently valid, so no coordination is needed.

use std::sync::Arc;

use axum::http::HeaderMap;
use chrono::{DateTime, TimeDelta, Utc};
use kernel::id::UserId;
use platform::cookie::extract_cookie;

use crate::domain::token::{IssuedToken, TokenIssuer};
use crate::error::{AuthError, AuthResult};

/// Cookie carrying the signed token
pub const TOKEN_COOKIE: &str = "token";
/// Cookie carrying the plain user id
pub const USER_ID_COOKIE: &str = "userID";
/// Cookie carrying the display name
pub const USERNAME_COOKIE: &str = "username";

/// Credential material lifted off a request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialCarrier {
    pub token: Option<String>,
    pub username: Option<String>,
}

impl CredentialCarrier {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            token: extract_cookie(headers, TOKEN_COOKIE),
            username: extract_cookie(headers, USERNAME_COOKIE),
        }
    }
}

/// A replacement token to hand back to the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Renewal {
    pub token: IssuedToken,
    /// Display name echoed from the inbound `username` cookie
    pub username: Option<String>,
}

/// Outcome of a successful check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authorization {
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
    pub renewal: Option<Renewal>,
}

/// Token check plus silent renewal
#[derive(Debug, Clone)]
pub struct SessionGuard {
    issuer: Arc<TokenIssuer>,
    renew_before: TimeDelta,
}

impl SessionGuard {
    pub fn new(issuer: Arc<TokenIssuer>, renew_before: TimeDelta) -> Self {
        Self {
            issuer,
            renew_before,
        }
    }

    pub fn authorize(&self, carrier: &CredentialCarrier) -> AuthResult<Authorization> {
        self.authorize_at(carrier, Utc::now())
    }

    pub fn authorize_at(
        &self,
        carrier: &CredentialCarrier,
        now: DateTime<Utc>,
    ) -> AuthResult<Authorization> {
        let token = carrier.token.as_deref().ok_or(AuthError::MissingToken)?;
        let verified = self.issuer.parse_at(token, now)?;

        if verified.expires_at - now >= self.renew_before {
            return Ok(Authorization {
                user_id: verified.user_id,
                expires_at: verified.expires_at,
                renewal: None,
            });
        }

        let token = self.issuer.issue_at(&verified.user_id, now);
        tracing::debug!(user_id = %verified.user_id, "Renewing session token");

        Ok(Authorization {
            user_id: verified.user_id,
            expires_at: token.expires_at,
            renewal: Some(Renewal {
                token,
                username: carrier.username.clone(),
            }),
        })
    }
}
