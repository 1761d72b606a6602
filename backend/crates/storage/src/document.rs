//! MongoDB Backend
//!
//! Collections `users` and `todos`. Ids are `ObjectId`s rendered as
//! 24-char hex; a string that is not one matches nothing.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::TryStreamExt;
use kernel::context::OpContext;
use kernel::id::{TodoId, UserId};
use mongodb::bson::{Document, doc, oid::ObjectId};
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};

use crate::backend::BackendKind;
use crate::error::{Operation, StorageError, StorageResult, bounded};
use crate::model::{NewTodo, NewUser, Todo, User};
use crate::traits::TodoStore;

const USERS: &str = "users";
const TODOS: &str = "todos";

/// Default database name when none is configured
pub const DEFAULT_DATABASE: &str = "go-mongodb";

/// Connection settings for the document backend
#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

impl MongoConfig {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            database: DEFAULT_DATABASE.to_string(),
        }
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }
}

// ============================================================================
// Documents
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct UserDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    email: String,
    name: String,
    password: String,
}

impl UserDocument {
    fn into_user(self) -> User {
        User {
            id: UserId::new(self.id.to_hex()),
            email: self.email,
            name: self.name,
            password_hash: self.password,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct TodoDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    name: String,
    status: String,
    userid: String,
}

impl TodoDocument {
    fn into_todo(self) -> Todo {
        Todo {
            id: TodoId::new(self.id.to_hex()),
            user_id: UserId::new(self.userid),
            name: self.name,
            status: self.status,
        }
    }
}

fn parse_object_id(id: &TodoId) -> Option<ObjectId> {
    ObjectId::parse_str(id.as_str()).ok()
}

fn owned_by(id: ObjectId, owner: &UserId) -> Document {
    doc! { "_id": id, "userid": owner.as_str() }
}

// ============================================================================
// Store
// ============================================================================

/// MongoDB-backed store
#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    users: Collection<UserDocument>,
    todos: Collection<TodoDocument>,
    closed: Arc<AtomicBool>,
}

impl MongoStore {
    /// Connect and verify the deployment answers a `ping`
    pub async fn connect(config: &MongoConfig) -> StorageResult<Self> {
        let client = Client::with_uri_str(&config.uri)
            .await
            .map_err(|e| StorageError::connect(BackendKind::Document, e))?;

        let database = client.database(&config.database);
        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| StorageError::connect(BackendKind::Document, e))?;

        tracing::info!(database = %config.database, "Connected to MongoDB");

        Ok(Self {
            users: database.collection(USERS),
            todos: database.collection(TODOS),
            client,
            closed: Arc::new(AtomicBool::new(false)),
        })
    }

    fn ensure_open(&self, op: Operation) -> StorageResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StorageError::Closed { op });
        }
        Ok(())
    }
}

impl TodoStore for MongoStore {
    async fn find_existing_users(&self, ctx: &OpContext, email: &str) -> StorageResult<u64> {
        let op = Operation::FindExistingUsers;
        self.ensure_open(op)?;

        bounded(ctx, op, self.users.count_documents(doc! { "email": email })).await
    }

    async fn add_user(&self, ctx: &OpContext, user: NewUser) -> StorageResult<User> {
        let op = Operation::AddUser;
        self.ensure_open(op)?;

        let document = UserDocument {
            id: ObjectId::new(),
            email: user.email,
            name: user.name,
            password: user.password_hash,
        };
        bounded(ctx, op, self.users.insert_one(&document)).await?;

        Ok(document.into_user())
    }

    async fn get_user(&self, ctx: &OpContext, email: &str) -> StorageResult<User> {
        let op = Operation::GetUser;
        self.ensure_open(op)?;

        bounded(ctx, op, self.users.find_one(doc! { "email": email }))
            .await?
            .map(UserDocument::into_user)
            .ok_or(StorageError::NotFound { op })
    }

    async fn get_todo(&self, ctx: &OpContext, id: &TodoId) -> StorageResult<Todo> {
        let op = Operation::GetTodo;
        self.ensure_open(op)?;

        let Some(oid) = parse_object_id(id) else {
            return Err(StorageError::NotFound { op });
        };

        bounded(ctx, op, self.todos.find_one(doc! { "_id": oid }))
            .await?
            .map(TodoDocument::into_todo)
            .ok_or(StorageError::NotFound { op })
    }

    async fn get_todos(&self, ctx: &OpContext, owner: &UserId) -> StorageResult<Vec<Todo>> {
        let op = Operation::GetTodos;
        self.ensure_open(op)?;

        let documents: Vec<TodoDocument> = bounded(ctx, op, async {
            let cursor = self.todos.find(doc! { "userid": owner.as_str() }).await?;
            cursor.try_collect().await
        })
        .await?;

        Ok(documents.into_iter().map(TodoDocument::into_todo).collect())
    }

    async fn add_todo(&self, ctx: &OpContext, todo: NewTodo) -> StorageResult<Todo> {
        let op = Operation::AddTodo;
        self.ensure_open(op)?;

        let document = TodoDocument {
            id: ObjectId::new(),
            name: todo.name,
            status: todo.status,
            userid: todo.user_id.into_string(),
        };
        bounded(ctx, op, self.todos.insert_one(&document)).await?;

        Ok(document.into_todo())
    }

    async fn update_todo(&self, ctx: &OpContext, todo: &Todo) -> StorageResult<u64> {
        let op = Operation::UpdateTodo;
        self.ensure_open(op)?;

        let Some(oid) = parse_object_id(&todo.id) else {
            return Ok(0);
        };

        let update = doc! {
            "$set": { "name": todo.name.as_str(), "status": todo.status.as_str() }
        };
        let result = bounded(
            ctx,
            op,
            self.todos.update_one(owned_by(oid, &todo.user_id), update),
        )
        .await?;

        Ok(result.matched_count)
    }

    async fn delete_todo(
        &self,
        ctx: &OpContext,
        id: &TodoId,
        owner: &UserId,
    ) -> StorageResult<()> {
        let op = Operation::DeleteTodo;
        self.ensure_open(op)?;

        let Some(oid) = parse_object_id(id) else {
            return Err(StorageError::NotFound { op });
        };

        let result = bounded(ctx, op, self.todos.delete_one(owned_by(oid, owner))).await?;
        if result.deleted_count == 0 {
            return Err(StorageError::NotFound { op });
        }

        Ok(())
    }

    async fn clear_todos(&self, ctx: &OpContext, owner: &UserId) -> StorageResult<u64> {
        let op = Operation::ClearTodos;
        self.ensure_open(op)?;

        let result = bounded(
            ctx,
            op,
            self.todos.delete_many(doc! { "userid": owner.as_str() }),
        )
        .await?;

        Ok(result.deleted_count)
    }

    async fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        self.client.clone().shutdown().await;
        tracing::info!("MongoDB client shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_database() {
        let config = MongoConfig::new("mongodb://localhost:27017");
        assert_eq!(config.database, "go-mongodb");

        let config = config.with_database("tasks");
        assert_eq!(config.database, "tasks");
    }

    #[test]
    fn test_object_id_parsing() {
        let oid = ObjectId::new();
        assert_eq!(parse_object_id(&TodoId::new(oid.to_hex())), Some(oid));
        assert_eq!(parse_object_id(&TodoId::new("not-an-object-id")), None);
        assert_eq!(
            parse_object_id(&TodoId::new("123e4567-e89b-12d3-a456-426614174000")),
            None
        );
    }

    #[test]
    fn test_todo_document_mapping() {
        let oid = ObjectId::new();
        let todo = TodoDocument {
            id: oid,
            name: "buy milk".to_string(),
            status: "pending".to_string(),
            userid: "u1".to_string(),
        }
        .into_todo();

        assert_eq!(todo.id.as_str(), oid.to_hex());
        assert_eq!(todo.user_id.as_str(), "u1");
        assert_eq!(todo.name, "buy milk");
    }
}
