//! HTTP Handlers
//!
//! All handlers run behind `auth::require_session`, so the
//! [`AuthenticatedUser`] extractor always finds the caller.

use std::sync::Arc;

use auth::AuthenticatedUser;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use kernel::context::OpContext;
use kernel::id::{TodoId, UserId};
use storage::TodoStore;

use crate::application::config::TodoConfig;
use crate::application::todos::{TodoChanges, TodoUseCase};
use crate::error::{TodoError, TodoResult};
use crate::presentation::dto::{
    AddTodoRequest, InsertedResponse, SuccessResponse, TodoResponse, UpdateTodoRequest,
    UpdateTodoResponse,
};

/// Shared state for todo handlers
pub struct TodoAppState<S> {
    pub store: Arc<S>,
    pub config: Arc<TodoConfig>,
}

impl<S> Clone for TodoAppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            config: self.config.clone(),
        }
    }
}

impl<S> TodoAppState<S>
where
    S: TodoStore,
{
    pub fn new(store: Arc<S>, config: TodoConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    fn use_case(&self) -> TodoUseCase<S> {
        TodoUseCase::new(self.store.clone())
    }

    fn op_context(&self) -> OpContext {
        OpContext::with_timeout(self.config.request_timeout)
    }
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> TodoResult<T> {
    body.map(|Json(value)| value)
        .map_err(|rejection| TodoError::Validation(rejection.body_text()))
}

/// GET /todos/{userid}
pub async fn list_todos<S>(
    State(state): State<TodoAppState<S>>,
    user: AuthenticatedUser,
    Path(userid): Path<String>,
) -> TodoResult<Json<Vec<TodoResponse>>>
where
    S: TodoStore + Send + Sync + 'static,
{
    let todos = state
        .use_case()
        .list(&state.op_context(), &user.user_id, &UserId::new(userid))
        .await?;

    Ok(Json(todos.into_iter().map(TodoResponse::from).collect()))
}

/// GET /todo/{id}
pub async fn get_todo<S>(
    State(state): State<TodoAppState<S>>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> TodoResult<Json<TodoResponse>>
where
    S: TodoStore + Send + Sync + 'static,
{
    let todo = state
        .use_case()
        .get(&state.op_context(), &user.user_id, &TodoId::new(id))
        .await?;

    Ok(Json(todo.into()))
}

/// POST /todo/{userid}
pub async fn add_todo<S>(
    State(state): State<TodoAppState<S>>,
    user: AuthenticatedUser,
    Path(userid): Path<String>,
    body: Result<Json<AddTodoRequest>, JsonRejection>,
) -> TodoResult<Json<InsertedResponse>>
where
    S: TodoStore + Send + Sync + 'static,
{
    let req = json_body(body)?;

    let todo = state
        .use_case()
        .add(
            &state.op_context(),
            &user.user_id,
            &UserId::new(userid),
            req.name,
            req.status,
        )
        .await?;

    Ok(Json(InsertedResponse {
        inserted_id: todo.id.into_string(),
    }))
}

/// PUT /todo
pub async fn update_todo<S>(
    State(state): State<TodoAppState<S>>,
    user: AuthenticatedUser,
    body: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> TodoResult<Json<UpdateTodoResponse>>
where
    S: TodoStore + Send + Sync + 'static,
{
    let req = json_body(body)?;

    let changes = TodoChanges {
        id: TodoId::new(req.id),
        owner: req.userid.map(UserId::new),
        name: req.name,
        status: req.status,
    };

    let outcome = state
        .use_case()
        .update(&state.op_context(), &user.user_id, changes)
        .await?;

    Ok(Json(UpdateTodoResponse {
        todo: outcome.todo.into(),
        updated: outcome.updated,
    }))
}

/// DELETE /todo/{userid}/{id}
pub async fn delete_todo<S>(
    State(state): State<TodoAppState<S>>,
    user: AuthenticatedUser,
    Path((userid, id)): Path<(String, String)>,
) -> TodoResult<Json<SuccessResponse>>
where
    S: TodoStore + Send + Sync + 'static,
{
    let id = TodoId::new(id);
    state
        .use_case()
        .delete(&state.op_context(), &user.user_id, &UserId::new(userid), &id)
        .await?;

    Ok(Json(SuccessResponse {
        success: format!("todo with id: {id} was deleted successfully."),
    }))
}

/// DELETE /todos/{userid}
pub async fn clear_todos<S>(
    State(state): State<TodoAppState<S>>,
    user: AuthenticatedUser,
    Path(userid): Path<String>,
) -> TodoResult<Json<SuccessResponse>>
where
    S: TodoStore + Send + Sync + 'static,
{
    state
        .use_case()
        .clear(&state.op_context(), &user.user_id, &UserId::new(userid))
        .await?;

    Ok(Json(SuccessResponse {
        success: "All todos deleted.".to_string(),
    }))
}
