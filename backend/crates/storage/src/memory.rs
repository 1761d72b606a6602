//! In-Memory Store
//!
//! Same contract as the real backends, for tests of the layers above.
//! Not selectable at runtime.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use kernel::context::OpContext;
use kernel::id::{TodoId, UserId};
use uuid::Uuid;

use crate::error::{Operation, StorageError, StorageResult};
use crate::model::{NewTodo, NewUser, Todo, User};
use crate::traits::TodoStore;

#[derive(Default)]
struct State {
    users: Vec<User>,
    todos: Vec<Todo>,
}

/// Vector-backed store; clones share state
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
    closed: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users, for assertions
    pub fn user_count(&self) -> usize {
        self.lock().users.len()
    }

    pub fn todo_count(&self) -> usize {
        self.lock().todos.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        // Poisoning only means another test panicked mid-update
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Closed, cancelled and expired contexts fail before touching state
    fn admit(&self, ctx: &OpContext, op: Operation) -> StorageResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StorageError::Closed { op });
        }
        if ctx.is_cancelled() {
            return Err(StorageError::Cancelled { op });
        }
        if ctx.remaining().is_zero() {
            return Err(StorageError::DeadlineExceeded { op });
        }
        Ok(())
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl TodoStore for MemoryStore {
    async fn find_existing_users(&self, ctx: &OpContext, email: &str) -> StorageResult<u64> {
        self.admit(ctx, Operation::FindExistingUsers)?;
        let count = self.lock().users.iter().filter(|u| u.email == email).count();
        Ok(count as u64)
    }

    async fn add_user(&self, ctx: &OpContext, user: NewUser) -> StorageResult<User> {
        self.admit(ctx, Operation::AddUser)?;
        let user = user.with_id(UserId::new(new_id()));
        self.lock().users.push(user.clone());
        Ok(user)
    }

    async fn get_user(&self, ctx: &OpContext, email: &str) -> StorageResult<User> {
        let op = Operation::GetUser;
        self.admit(ctx, op)?;
        self.lock()
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(StorageError::NotFound { op })
    }

    async fn get_todo(&self, ctx: &OpContext, id: &TodoId) -> StorageResult<Todo> {
        let op = Operation::GetTodo;
        self.admit(ctx, op)?;
        self.lock()
            .todos
            .iter()
            .find(|t| &t.id == id)
            .cloned()
            .ok_or(StorageError::NotFound { op })
    }

    async fn get_todos(&self, ctx: &OpContext, owner: &UserId) -> StorageResult<Vec<Todo>> {
        self.admit(ctx, Operation::GetTodos)?;
        Ok(self
            .lock()
            .todos
            .iter()
            .filter(|t| &t.user_id == owner)
            .cloned()
            .collect())
    }

    async fn add_todo(&self, ctx: &OpContext, todo: NewTodo) -> StorageResult<Todo> {
        self.admit(ctx, Operation::AddTodo)?;
        let todo = todo.with_id(TodoId::new(new_id()));
        self.lock().todos.push(todo.clone());
        Ok(todo)
    }

    async fn update_todo(&self, ctx: &OpContext, todo: &Todo) -> StorageResult<u64> {
        self.admit(ctx, Operation::UpdateTodo)?;
        let mut state = self.lock();
        let Some(stored) = state
            .todos
            .iter_mut()
            .find(|t| t.id == todo.id && t.user_id == todo.user_id)
        else {
            return Ok(0);
        };
        stored.name = todo.name.clone();
        stored.status = todo.status.clone();
        Ok(1)
    }

    async fn delete_todo(
        &self,
        ctx: &OpContext,
        id: &TodoId,
        owner: &UserId,
    ) -> StorageResult<()> {
        let op = Operation::DeleteTodo;
        self.admit(ctx, op)?;
        let mut state = self.lock();
        let before = state.todos.len();
        state.todos.retain(|t| !(&t.id == id && &t.user_id == owner));
        if state.todos.len() == before {
            return Err(StorageError::NotFound { op });
        }
        Ok(())
    }

    async fn clear_todos(&self, ctx: &OpContext, owner: &UserId) -> StorageResult<u64> {
        self.admit(ctx, Operation::ClearTodos)?;
        let mut state = self.lock();
        let before = state.todos.len();
        state.todos.retain(|t| &t.user_id != owner);
        Ok((before - state.todos.len()) as u64)
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }
}
