//! Session Tokens
//!
//! Format: `base64url(claims JSON) "." base64url(HMAC-SHA256(key, first part))`
//! with claims `{"sub": <user id>, "exp": <unix millis>}`.
//!
//! Tokens are verified by signature and expiry alone. Rotating the key
//! invalidates every outstanding token.

use chrono::{DateTime, SubsecRound, TimeDelta, Utc};
use kernel::id::UserId;
use platform::crypto::{from_base64url, hmac_sha256, to_base64url, verify_hmac_sha256};
use serde::Deserialize;
use thiserror::Error;

use crate::application::config::SigningKey;

/// Why a token was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,

    #[error("token signature does not verify")]
    BadSignature,

    #[error("token has expired")]
    Expired,
}

#[derive(Deserialize)]
struct Claims {
    sub: String,
    exp: i64,
}

/// A freshly signed token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
}

/// Identity recovered from a valid token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
}

/// Signs and verifies session tokens
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    key: SigningKey,
    ttl: TimeDelta,
}

impl TokenIssuer {
    pub fn new(key: SigningKey, ttl: TimeDelta) -> Self {
        Self { key, ttl }
    }

    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Sign a token for `user_id`, valid for the configured window
    pub fn issue(&self, user_id: &UserId) -> IssuedToken {
        self.issue_at(user_id, Utc::now())
    }

    pub fn issue_at(&self, user_id: &UserId, now: DateTime<Utc>) -> IssuedToken {
        // Claims carry millisecond precision
        let expires_at = (now + self.ttl).trunc_subsecs(3);

        let claims = serde_json::json!({
            "sub": user_id.as_str(),
            "exp": expires_at.timestamp_millis(),
        });
        let payload = to_base64url(claims.to_string().as_bytes());
        let signature = hmac_sha256(self.key.as_bytes(), payload.as_bytes());

        IssuedToken {
            token: format!("{}.{}", payload, to_base64url(&signature)),
            user_id: user_id.clone(),
            expires_at,
        }
    }

    /// Verify signature and expiry
    pub fn parse(&self, token: &str) -> Result<VerifiedToken, TokenError> {
        self.parse_at(token, Utc::now())
    }

    pub fn parse_at(&self, token: &str, now: DateTime<Utc>) -> Result<VerifiedToken, TokenError> {
        let (payload, signature) = token.split_once('.').ok_or(TokenError::Malformed)?;
        let signature = from_base64url(signature).map_err(|_| TokenError::Malformed)?;

        if !verify_hmac_sha256(self.key.as_bytes(), payload.as_bytes(), &signature) {
            return Err(TokenError::BadSignature);
        }

        let claims = from_base64url(payload).map_err(|_| TokenError::Malformed)?;
        let claims: Claims = serde_json::from_slice(&claims).map_err(|_| TokenError::Malformed)?;
        if claims.sub.is_empty() {
            return Err(TokenError::Malformed);
        }

        let expires_at =
            DateTime::from_timestamp_millis(claims.exp).ok_or(TokenError::Malformed)?;
        if now >= expires_at {
            return Err(TokenError::Expired);
        }

        Ok(VerifiedToken {
            user_id: UserId::new(claims.sub),
            expires_at,
        })
    }
}
