//! HTTP Handlers

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use chrono::TimeDelta;
use kernel::context::OpContext;
use storage::TodoStore;

use crate::application::config::AuthConfig;
use crate::application::{
    SessionGuard, SignInInput, SignInUseCase, SignUpInput, SignUpUseCase,
};
use crate::domain::token::TokenIssuer;
use crate::error::{AuthError, AuthResult};
use crate::presentation::cookies::append_session_cookies;
use crate::presentation::dto::{
    LoginRequest, LoginResponse, SessionResponse, SignUpRequest, SignUpResponse,
};
use crate::presentation::middleware::{AuthenticatedUser, SessionLayerState};

/// Shared state for auth handlers
pub struct AuthAppState<S> {
    pub store: Arc<S>,
    pub issuer: Arc<TokenIssuer>,
    pub guard: SessionGuard,
    pub config: Arc<AuthConfig>,
}

impl<S> Clone for AuthAppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            issuer: self.issuer.clone(),
            guard: self.guard.clone(),
            config: self.config.clone(),
        }
    }
}

impl<S> AuthAppState<S> {
    pub fn new(store: Arc<S>, config: AuthConfig) -> AuthResult<Self> {
        let ttl = TimeDelta::from_std(config.token_ttl)
            .map_err(|_| AuthError::Internal("token TTL out of range".into()))?;
        let renew_before = TimeDelta::from_std(config.renew_before)
            .map_err(|_| AuthError::Internal("renewal threshold out of range".into()))?;

        let issuer = Arc::new(TokenIssuer::new(config.signing_key.clone(), ttl));
        let guard = SessionGuard::new(issuer.clone(), renew_before);

        Ok(Self {
            store,
            issuer,
            guard,
            config: Arc::new(config),
        })
    }

    /// State for [`require_session`](crate::presentation::middleware::require_session)
    pub fn session_layer(&self) -> SessionLayerState {
        SessionLayerState {
            guard: self.guard.clone(),
            cookie: self.config.cookie.clone(),
        }
    }

    fn op_context(&self) -> OpContext {
        OpContext::with_timeout(self.config.request_timeout)
    }
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> AuthResult<T> {
    body.map(|Json(value)| value)
        .map_err(|rejection| AuthError::Validation(rejection.body_text()))
}

// ============================================================================
// Sign Up
// ============================================================================

/// POST /signup
pub async fn sign_up<S>(
    State(state): State<AuthAppState<S>>,
    body: Result<Json<SignUpRequest>, JsonRejection>,
) -> AuthResult<impl IntoResponse>
where
    S: TodoStore + Send + Sync + 'static,
{
    let req = json_body(body)?;
    let use_case = SignUpUseCase::new(state.store.clone(), state.issuer.clone());

    let input = SignUpInput {
        email: req.email,
        name: req.name,
        password: req.password,
    };

    let output = use_case.execute(&state.op_context(), input).await?;

    let mut headers = HeaderMap::new();
    append_session_cookies(
        &mut headers,
        &state.config.cookie,
        &output.token,
        Some(&output.username),
    );

    Ok((
        headers,
        Json(SignUpResponse {
            inserted_id: output.user_id.into_string(),
        }),
    ))
}

// ============================================================================
// Login
// ============================================================================

/// POST /login
///
/// Always issues a fresh token, whatever the caller already holds.
pub async fn login<S>(
    State(state): State<AuthAppState<S>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> AuthResult<impl IntoResponse>
where
    S: TodoStore + Send + Sync + 'static,
{
    let req = json_body(body)?;
    let use_case = SignInUseCase::new(state.store.clone(), state.issuer.clone());

    let input = SignInInput {
        email: req.email,
        password: req.password,
    };

    let output = use_case.execute(&state.op_context(), input).await?;

    let mut headers = HeaderMap::new();
    append_session_cookies(
        &mut headers,
        &state.config.cookie,
        &output.token,
        Some(&output.username),
    );

    Ok((
        headers,
        Json(LoginResponse {
            msg: "login successful".to_string(),
        }),
    ))
}

// ============================================================================
// Session
// ============================================================================

/// GET /session (behind `require_session`)
pub async fn session(user: AuthenticatedUser) -> Json<SessionResponse> {
    Json(SessionResponse {
        user_id: user.user_id.into_string(),
        expires_at_ms: user.expires_at.timestamp_millis(),
    })
}
