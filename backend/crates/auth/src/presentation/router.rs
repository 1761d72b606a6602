//! Auth Router

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use storage::TodoStore;

use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::require_session;

/// Create the Auth router for any store implementation
pub fn auth_router<S>(state: AuthAppState<S>) -> Router
where
    S: TodoStore + Send + Sync + 'static,
{
    Router::new()
        .route("/session", get(handlers::session))
        .route_layer(from_fn_with_state(state.session_layer(), require_session))
        .route("/signup", post(handlers::sign_up::<S>))
        .route("/login", post(handlers::login::<S>))
        .with_state(state)
}
