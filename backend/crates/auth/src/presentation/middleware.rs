//! Auth Middleware
//!
//! Middleware for requiring a valid session on protected routes.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use kernel::id::UserId;
use platform::cookie::CookieConfig;

use crate::application::session_guard::{CredentialCarrier, SessionGuard};
use crate::error::AuthError;
use crate::presentation::cookies::append_session_cookies;

/// Middleware state
#[derive(Debug, Clone)]
pub struct SessionLayerState {
    pub guard: SessionGuard,
    pub cookie: CookieConfig,
}

/// Caller identity, placed in request extensions by [`require_session`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AuthError::MissingToken)
    }
}

/// Middleware that requires a valid session token
///
/// Rejects with 401 before the handler runs. A renewed token is attached
/// to whatever response the handler produces.
pub async fn require_session(
    State(state): State<SessionLayerState>,
    mut req: Request,
    next: Next,
) -> Response {
    let carrier = CredentialCarrier::from_headers(req.headers());

    let authorization = match state.guard.authorize(&carrier) {
        Ok(authorization) => authorization,
        Err(e) => return e.into_response(),
    };

    req.extensions_mut().insert(AuthenticatedUser {
        user_id: authorization.user_id,
        expires_at: authorization.expires_at,
    });

    let mut response = next.run(req).await;

    if let Some(renewal) = authorization.renewal {
        append_session_cookies(
            response.headers_mut(),
            &state.cookie,
            &renewal.token,
            renewal.username.as_deref(),
        );
    }

    response
}
