//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Signed session tokens, email value object
//! - `application/` - Sign-up, login and the session guard
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! Persistence goes through `storage::TodoStore`; this crate owns no tables.
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, verified off the async runtime
//! - Sessions are bearer tokens signed with HMAC-SHA256; the server keeps
//!   no session state, so validity is signature + expiry only
//! - Tokens near expiry are silently reissued by the guard
//! - Login failures never reveal whether the email exists

pub mod application;
pub mod domain;
pub mod error;
pub mod presentation;

// Re-exports for convenience
pub use application::config::{AuthConfig, SigningKey};
pub use application::session_guard::{Authorization, CredentialCarrier, Renewal, SessionGuard};
pub use domain::token::{IssuedToken, TokenError, TokenIssuer};
pub use error::{AuthError, AuthResult};
pub use presentation::handlers::AuthAppState;
pub use presentation::middleware::{AuthenticatedUser, SessionLayerState, require_session};
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
