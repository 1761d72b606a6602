//! Todo Use Cases
//!
//! Every operation acts for an authenticated caller. Routes that name a user
//! in the path are rejected unless that user is the caller, and every store
//! call is filtered by the caller's id, so one user can never read or change
//! another user's todos.

use std::sync::Arc;

use kernel::context::OpContext;
use kernel::id::{TodoId, UserId};
use storage::{NewTodo, Operation, StorageError, Todo, TodoStore};

use crate::error::{TodoError, TodoResult};

/// Fields of an update request
#[derive(Debug, Clone)]
pub struct TodoChanges {
    pub id: TodoId,
    /// `None` means the caller
    pub owner: Option<UserId>,
    pub name: String,
    pub status: String,
}

/// Result of an update: the todo as requested and whether a row matched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub todo: Todo,
    pub updated: bool,
}

/// Todo use cases over one store
pub struct TodoUseCase<S>
where
    S: TodoStore,
{
    store: Arc<S>,
}

impl<S> TodoUseCase<S>
where
    S: TodoStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// All todos of the caller
    pub async fn list(
        &self,
        ctx: &OpContext,
        caller: &UserId,
        path_user: &UserId,
    ) -> TodoResult<Vec<Todo>> {
        ensure_self(caller, path_user)?;
        Ok(self.store.get_todos(ctx, caller).await?)
    }

    /// One todo by id
    ///
    /// A todo owned by someone else is reported exactly like a missing one.
    pub async fn get(&self, ctx: &OpContext, caller: &UserId, id: &TodoId) -> TodoResult<Todo> {
        let todo = self.store.get_todo(ctx, id).await?;
        if &todo.user_id != caller {
            tracing::debug!(todo_id = %id, "Todo belongs to another user");
            return Err(StorageError::NotFound {
                op: Operation::GetTodo,
            }
            .into());
        }
        Ok(todo)
    }

    pub async fn add(
        &self,
        ctx: &OpContext,
        caller: &UserId,
        path_user: &UserId,
        name: String,
        status: String,
    ) -> TodoResult<Todo> {
        ensure_self(caller, path_user)?;

        let todo = self
            .store
            .add_todo(
                ctx,
                NewTodo {
                    user_id: caller.clone(),
                    name,
                    status,
                },
            )
            .await?;

        tracing::info!(todo_id = %todo.id, user_id = %caller, "Todo added");
        Ok(todo)
    }

    /// Replace name and status of a todo the caller owns
    ///
    /// A request naming another owner never reaches the store and reports
    /// `updated: false`, the same as an id that matches nothing.
    pub async fn update(
        &self,
        ctx: &OpContext,
        caller: &UserId,
        changes: TodoChanges,
    ) -> TodoResult<UpdateOutcome> {
        let todo = Todo {
            id: changes.id,
            user_id: changes.owner.unwrap_or_else(|| caller.clone()),
            name: changes.name,
            status: changes.status,
        };

        if &todo.user_id != caller {
            tracing::warn!(todo_id = %todo.id, "Update names another owner");
            return Ok(UpdateOutcome {
                todo,
                updated: false,
            });
        }

        let matched = self.store.update_todo(ctx, &todo).await?;
        Ok(UpdateOutcome {
            todo,
            updated: matched > 0,
        })
    }

    pub async fn delete(
        &self,
        ctx: &OpContext,
        caller: &UserId,
        path_user: &UserId,
        id: &TodoId,
    ) -> TodoResult<()> {
        ensure_self(caller, path_user)?;
        self.store.delete_todo(ctx, id, caller).await?;
        tracing::info!(todo_id = %id, user_id = %caller, "Todo deleted");
        Ok(())
    }

    /// Delete every todo of the caller, returning how many went
    pub async fn clear(
        &self,
        ctx: &OpContext,
        caller: &UserId,
        path_user: &UserId,
    ) -> TodoResult<u64> {
        ensure_self(caller, path_user)?;
        let removed = self.store.clear_todos(ctx, caller).await?;
        tracing::info!(user_id = %caller, removed, "Todos cleared");
        Ok(removed)
    }
}

fn ensure_self(caller: &UserId, path_user: &UserId) -> TodoResult<()> {
    if caller == path_user {
        Ok(())
    } else {
        Err(TodoError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use storage::MemoryStore;

    fn ctx() -> OpContext {
        OpContext::with_timeout(Duration::from_secs(30))
    }

    fn use_case(store: &MemoryStore) -> TodoUseCase<MemoryStore> {
        TodoUseCase::new(Arc::new(store.clone()))
    }

    fn user(id: &str) -> UserId {
        UserId::new(id)
    }

    async fn seed(todos: &TodoUseCase<MemoryStore>, owner: &UserId, name: &str) -> Todo {
        todos
            .add(&ctx(), owner, owner, name.to_string(), "pending".to_string())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_list_only_returns_callers_todos() {
        let store = MemoryStore::new();
        let todos = use_case(&store);
        let (ada, bob) = (user("ada"), user("bob"));

        seed(&todos, &ada, "milk").await;
        seed(&todos, &ada, "eggs").await;
        seed(&todos, &bob, "bread").await;

        let listed = todos.list(&ctx(), &ada, &ada).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().all(|t| t.user_id == ada));
    }

    #[tokio::test]
    async fn test_path_user_must_be_caller() {
        let store = MemoryStore::new();
        let todos = use_case(&store);
        let (ada, bob) = (user("ada"), user("bob"));
        let bread = seed(&todos, &bob, "bread").await;

        assert!(matches!(
            todos.list(&ctx(), &ada, &bob).await,
            Err(TodoError::Forbidden)
        ));
        assert!(matches!(
            todos
                .add(&ctx(), &ada, &bob, "x".into(), "pending".into())
                .await,
            Err(TodoError::Forbidden)
        ));
        assert!(matches!(
            todos.delete(&ctx(), &ada, &bob, &bread.id).await,
            Err(TodoError::Forbidden)
        ));
        assert!(matches!(
            todos.clear(&ctx(), &ada, &bob).await,
            Err(TodoError::Forbidden)
        ));

        // Bob's todo survived every attempt
        assert_eq!(todos.list(&ctx(), &bob, &bob).await.unwrap(), vec![bread]);
    }

    #[tokio::test]
    async fn test_get_hides_foreign_todo() {
        let store = MemoryStore::new();
        let todos = use_case(&store);
        let (ada, bob) = (user("ada"), user("bob"));
        let bread = seed(&todos, &bob, "bread").await;

        assert_eq!(todos.get(&ctx(), &bob, &bread.id).await.unwrap(), bread);

        match todos.get(&ctx(), &ada, &bread.id).await {
            Err(TodoError::Storage(e)) => assert!(e.is_not_found()),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_update_own_todo() {
        let store = MemoryStore::new();
        let todos = use_case(&store);
        let ada = user("ada");
        let milk = seed(&todos, &ada, "milk").await;

        let outcome = todos
            .update(
                &ctx(),
                &ada,
                TodoChanges {
                    id: milk.id.clone(),
                    owner: None,
                    name: "oat milk".into(),
                    status: "done".into(),
                },
            )
            .await
            .unwrap();

        assert!(outcome.updated);
        assert_eq!(outcome.todo.user_id, ada);

        let stored = todos.get(&ctx(), &ada, &milk.id).await.unwrap();
        assert_eq!(stored.name, "oat milk");
        assert_eq!(stored.status, "done");
    }

    #[tokio::test]
    async fn test_update_naming_other_owner_changes_nothing() {
        let store = MemoryStore::new();
        let todos = use_case(&store);
        let (ada, bob) = (user("ada"), user("bob"));
        let bread = seed(&todos, &bob, "bread").await;

        // Ada claims Bob's todo is hers
        let outcome = todos
            .update(
                &ctx(),
                &ada,
                TodoChanges {
                    id: bread.id.clone(),
                    owner: None,
                    name: "stolen".into(),
                    status: "done".into(),
                },
            )
            .await
            .unwrap();
        assert!(!outcome.updated);

        // Ada names Bob as the owner
        let outcome = todos
            .update(
                &ctx(),
                &ada,
                TodoChanges {
                    id: bread.id.clone(),
                    owner: Some(bob.clone()),
                    name: "stolen".into(),
                    status: "done".into(),
                },
            )
            .await
            .unwrap();
        assert!(!outcome.updated);
        assert_eq!(outcome.todo.user_id, bob);

        assert_eq!(todos.get(&ctx(), &bob, &bread.id).await.unwrap(), bread);
    }

    #[tokio::test]
    async fn test_delete_and_clear() {
        let store = MemoryStore::new();
        let todos = use_case(&store);
        let ada = user("ada");
        let milk = seed(&todos, &ada, "milk").await;
        seed(&todos, &ada, "eggs").await;
        seed(&todos, &ada, "flour").await;

        todos.delete(&ctx(), &ada, &ada, &milk.id).await.unwrap();

        match todos.delete(&ctx(), &ada, &ada, &milk.id).await {
            Err(TodoError::Storage(e)) => assert!(e.is_not_found()),
            other => panic!("expected NotFound, got {other:?}"),
        }

        assert_eq!(todos.clear(&ctx(), &ada, &ada).await.unwrap(), 2);
        assert_eq!(todos.clear(&ctx(), &ada, &ada).await.unwrap(), 0);
        assert!(todos.list(&ctx(), &ada, &ada).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_expired_context_surfaces_as_timeout() {
        let store = MemoryStore::new();
        let todos = use_case(&store);
        let ada = user("ada");

        let expired = OpContext::with_timeout(Duration::ZERO);
        let err = todos.list(&expired, &ada, &ada).await.unwrap_err();
        assert_eq!(err.kind(), kernel::error::kind::ErrorKind::GatewayTimeout);
    }
}
