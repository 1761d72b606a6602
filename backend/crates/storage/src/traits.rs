//! Storage Trait
//!
//! The persistence contract. Backends implement [`TodoStore`]; the
//! `Local` variant exists for single-threaded callers.

use kernel::context::OpContext;
use kernel::id::{TodoId, UserId};

use crate::error::StorageResult;
use crate::model::{NewTodo, NewUser, Todo, User};

/// Users and their todos
#[trait_variant::make(TodoStore: Send)]
pub trait LocalTodoStore {
    /// Count users registered under `email`
    async fn find_existing_users(&self, ctx: &OpContext, email: &str) -> StorageResult<u64>;

    /// Insert a user; the returned record carries the backend-assigned id
    async fn add_user(&self, ctx: &OpContext, user: NewUser) -> StorageResult<User>;

    /// Any user registered under `email`
    async fn get_user(&self, ctx: &OpContext, email: &str) -> StorageResult<User>;

    /// Todo by id, regardless of owner
    async fn get_todo(&self, ctx: &OpContext, id: &TodoId) -> StorageResult<Todo>;

    /// All todos of `owner`; empty when there are none
    async fn get_todos(&self, ctx: &OpContext, owner: &UserId) -> StorageResult<Vec<Todo>>;

    /// Insert a todo; the returned record carries the backend-assigned id
    async fn add_todo(&self, ctx: &OpContext, todo: NewTodo) -> StorageResult<Todo>;

    /// Overwrite name and status of the todo matching both id and owner
    ///
    /// Returns the number of matched records (0 or 1).
    async fn update_todo(&self, ctx: &OpContext, todo: &Todo) -> StorageResult<u64>;

    /// Remove the todo matching both id and owner
    async fn delete_todo(&self, ctx: &OpContext, id: &TodoId, owner: &UserId)
    -> StorageResult<()>;

    /// Remove every todo of `owner`, returning how many were removed
    async fn clear_todos(&self, ctx: &OpContext, owner: &UserId) -> StorageResult<u64>;

    /// Release backend resources. Safe to call more than once.
    async fn close(&self);
}
