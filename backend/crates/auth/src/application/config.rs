//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::fmt;
use std::time::Duration;

use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Re-export cookie settings from platform
pub use platform::cookie::{CookieConfig, SameSite};

/// Token lifetime (24 hours)
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(24 * 3600);

/// Reissue once less than this much lifetime remains (6 hours)
pub const DEFAULT_RENEW_BEFORE: Duration = Duration::from_secs(6 * 3600);

/// Deadline for each storage or hashing call
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("signing key must not be empty")]
pub struct EmptySigningKey;

/// Process-wide token signing secret
///
/// Zeroized on drop; never printed.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SigningKey(Vec<u8>);

impl SigningKey {
    pub fn new(secret: impl Into<Vec<u8>>) -> Result<Self, EmptySigningKey> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(EmptySigningKey);
        }
        Ok(Self(secret))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SigningKey").field(&"[REDACTED]").finish()
    }
}

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC key for session tokens
    pub signing_key: SigningKey,
    /// Absolute token lifetime
    pub token_ttl: Duration,
    /// Renewal threshold on remaining lifetime
    pub renew_before: Duration,
    /// Per-request deadline for storage and hashing
    pub request_timeout: Duration,
    /// Attributes for the `token`, `userID` and `username` cookies
    pub cookie: CookieConfig,
}

impl AuthConfig {
    pub fn new(signing_key: SigningKey) -> Self {
        Self {
            signing_key,
            token_ttl: DEFAULT_TOKEN_TTL,
            renew_before: DEFAULT_RENEW_BEFORE,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            cookie: CookieConfig::default(),
        }
    }
}
