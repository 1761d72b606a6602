//! PostgreSQL Backend
//!
//! Tables `users` and `todos`, created on connect when `pg_tables` does not
//! list them. Ids are UUID v4; a string that is not one matches nothing.

use kernel::context::OpContext;
use kernel::id::{TodoId, UserId};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use crate::backend::BackendKind;
use crate::error::{Operation, StorageError, StorageResult, bounded};
use crate::model::{NewTodo, NewUser, Todo, User};
use crate::traits::TodoStore;

/// Default pool size
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Tables and their column definitions, in creation order
const TABLES: [(&str, &str); 2] = [
    (
        "users",
        "id uuid PRIMARY KEY, email text NOT NULL, name text NOT NULL, password text NOT NULL",
    ),
    (
        "todos",
        "id uuid PRIMARY KEY, name text NOT NULL, status text NOT NULL, userid text NOT NULL",
    ),
];

/// Connection settings for the relational backend
#[derive(Debug, Clone)]
pub struct PgConfig {
    pub uri: String,
    pub max_connections: u32,
}

impl PgConfig {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    name: String,
    password: String,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            id: UserId::new(self.id.to_string()),
            email: self.email,
            name: self.name,
            password_hash: self.password,
        }
    }
}

#[derive(sqlx::FromRow)]
struct TodoRow {
    id: Uuid,
    name: String,
    status: String,
    userid: String,
}

impl TodoRow {
    fn into_todo(self) -> Todo {
        Todo {
            id: TodoId::new(self.id.to_string()),
            user_id: UserId::new(self.userid),
            name: self.name,
            status: self.status,
        }
    }
}

fn parse_uuid(id: &TodoId) -> Option<Uuid> {
    Uuid::parse_str(id.as_str()).ok()
}

// ============================================================================
// Store
// ============================================================================

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Open the pool and create missing tables
    pub async fn connect(config: &PgConfig) -> StorageResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.uri)
            .await
            .map_err(|e| StorageError::connect(BackendKind::Relational, e))?;

        tracing::info!(
            max_connections = config.max_connections,
            "Connected to PostgreSQL"
        );

        let store = Self { pool };
        store.bootstrap().await?;
        Ok(store)
    }

    /// Create each table that `pg_tables` does not list yet
    pub async fn bootstrap(&self) -> StorageResult<()> {
        for (table, columns) in TABLES {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS (SELECT FROM pg_tables WHERE tablename = $1)")
                    .bind(table)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(|source| StorageError::Bootstrap { table, source })?;

            if exists {
                tracing::debug!(table, "Table already present");
                continue;
            }

            sqlx::query(&format!("CREATE TABLE IF NOT EXISTS \"{table}\" ({columns})"))
                .execute(&self.pool)
                .await
                .map_err(|source| StorageError::Bootstrap { table, source })?;

            tracing::info!(table, "Created table");
        }

        Ok(())
    }

    fn ensure_open(&self, op: Operation) -> StorageResult<()> {
        if self.pool.is_closed() {
            return Err(StorageError::Closed { op });
        }
        Ok(())
    }
}

impl TodoStore for PgStore {
    async fn find_existing_users(&self, ctx: &OpContext, email: &str) -> StorageResult<u64> {
        let op = Operation::FindExistingUsers;
        self.ensure_open(op)?;

        let count: i64 = bounded(
            ctx,
            op,
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(&self.pool),
        )
        .await?;

        Ok(count.max(0) as u64)
    }

    async fn add_user(&self, ctx: &OpContext, user: NewUser) -> StorageResult<User> {
        let op = Operation::AddUser;
        self.ensure_open(op)?;

        let id = Uuid::new_v4();
        bounded(
            ctx,
            op,
            sqlx::query("INSERT INTO users (id, email, name, password) VALUES ($1, $2, $3, $4)")
                .bind(id)
                .bind(&user.email)
                .bind(&user.name)
                .bind(&user.password_hash)
                .execute(&self.pool),
        )
        .await?;

        Ok(user.with_id(UserId::new(id.to_string())))
    }

    async fn get_user(&self, ctx: &OpContext, email: &str) -> StorageResult<User> {
        let op = Operation::GetUser;
        self.ensure_open(op)?;

        let row = bounded(
            ctx,
            op,
            sqlx::query_as::<_, UserRow>(
                r#"
                SELECT
                    id,
                    email,
                    name,
                    password
                FROM users
                WHERE email = $1
                LIMIT 1
                "#,
            )
            .bind(email)
            .fetch_optional(&self.pool),
        )
        .await?;

        row.map(UserRow::into_user)
            .ok_or(StorageError::NotFound { op })
    }

    async fn get_todo(&self, ctx: &OpContext, id: &TodoId) -> StorageResult<Todo> {
        let op = Operation::GetTodo;
        self.ensure_open(op)?;

        let Some(id) = parse_uuid(id) else {
            return Err(StorageError::NotFound { op });
        };

        let row = bounded(
            ctx,
            op,
            sqlx::query_as::<_, TodoRow>(
                r#"
                SELECT
                    id,
                    name,
                    status,
                    userid
                FROM todos
                WHERE id = $1
                "#,
            )
            .bind(id)
            .fetch_optional(&self.pool),
        )
        .await?;

        row.map(TodoRow::into_todo)
            .ok_or(StorageError::NotFound { op })
    }

    async fn get_todos(&self, ctx: &OpContext, owner: &UserId) -> StorageResult<Vec<Todo>> {
        let op = Operation::GetTodos;
        self.ensure_open(op)?;

        let rows = bounded(
            ctx,
            op,
            sqlx::query_as::<_, TodoRow>(
                r#"
                SELECT
                    id,
                    name,
                    status,
                    userid
                FROM todos
                WHERE userid = $1
                "#,
            )
            .bind(owner.as_str())
            .fetch_all(&self.pool),
        )
        .await?;

        Ok(rows.into_iter().map(TodoRow::into_todo).collect())
    }

    async fn add_todo(&self, ctx: &OpContext, todo: NewTodo) -> StorageResult<Todo> {
        let op = Operation::AddTodo;
        self.ensure_open(op)?;

        let id = Uuid::new_v4();
        bounded(
            ctx,
            op,
            sqlx::query("INSERT INTO todos (id, name, status, userid) VALUES ($1, $2, $3, $4)")
                .bind(id)
                .bind(&todo.name)
                .bind(&todo.status)
                .bind(todo.user_id.as_str())
                .execute(&self.pool),
        )
        .await?;

        Ok(todo.with_id(TodoId::new(id.to_string())))
    }

    async fn update_todo(&self, ctx: &OpContext, todo: &Todo) -> StorageResult<u64> {
        let op = Operation::UpdateTodo;
        self.ensure_open(op)?;

        let Some(id) = parse_uuid(&todo.id) else {
            return Ok(0);
        };

        let result = bounded(
            ctx,
            op,
            sqlx::query("UPDATE todos SET name = $1, status = $2 WHERE id = $3 AND userid = $4")
                .bind(&todo.name)
                .bind(&todo.status)
                .bind(id)
                .bind(todo.user_id.as_str())
                .execute(&self.pool),
        )
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete_todo(
        &self,
        ctx: &OpContext,
        id: &TodoId,
        owner: &UserId,
    ) -> StorageResult<()> {
        let op = Operation::DeleteTodo;
        self.ensure_open(op)?;

        let Some(id) = parse_uuid(id) else {
            return Err(StorageError::NotFound { op });
        };

        let result = bounded(
            ctx,
            op,
            sqlx::query("DELETE FROM todos WHERE id = $1 AND userid = $2")
                .bind(id)
                .bind(owner.as_str())
                .execute(&self.pool),
        )
        .await?;

        if result.rows_affected() == 0 {
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
            sqlx::query("DELETE FROM todos WHERE userid = $1")
                .bind(owner.as_str())
                .execute(&self.pool),
        )
        .await?;

        tracing::debug!(deleted = result.rows_affected(), "Cleared todos");

        Ok(result.rows_affected())
    }

    async fn close(&self) {
        if self.pool.is_closed() {
            return;
        }
        self.pool.close().await;
        tracing::info!("PostgreSQL pool closed");
    }
}
