//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod session_guard;
pub mod sign_in;
pub mod sign_up;

use kernel::context::OpContext;

use crate::error::{AuthError, AuthResult};

// Re-exports
pub use config::AuthConfig;
pub use session_guard::{Authorization, CredentialCarrier, Renewal, SessionGuard};
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_up::{SignUpInput, SignUpOutput, SignUpUseCase};

/// Run CPU-heavy password work off the async workers, bounded by `ctx`
///
/// On deadline or cancellation the caller stops waiting; the blocking
/// task itself runs to completion and its result is dropped.
pub(crate) async fn run_blocking<T, F>(ctx: &OpContext, f: F) -> AuthResult<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    ctx.run(tokio::task::spawn_blocking(f))
        .await?
        .map_err(|e| AuthError::Internal(format!("password task failed: {e}")))
}
