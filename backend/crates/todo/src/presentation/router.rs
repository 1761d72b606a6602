//! Todo Router

use auth::{SessionLayerState, require_session};
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get, put},
};
use storage::TodoStore;

use crate::presentation::handlers::{self, TodoAppState};

/// Create the Todo router for any store implementation
///
/// Every route requires a session.
pub fn todo_router<S>(state: TodoAppState<S>, session: SessionLayerState) -> Router
where
    S: TodoStore + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/todos/{userid}",
            get(handlers::list_todos::<S>).delete(handlers::clear_todos::<S>),
        )
        // Sibling segments must share one parameter name; GET reads it as a todo id.
        .route(
            "/todo/{userid}",
            get(handlers::get_todo::<S>).post(handlers::add_todo::<S>),
        )
        .route("/todo/{userid}/{id}", delete(handlers::delete_todo::<S>))
        .route("/todo", put(handlers::update_todo::<S>))
        .route_layer(from_fn_with_state(session, require_session))
        .with_state(state)
}
