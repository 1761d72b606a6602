//! Backend Selection
//!
//! `DB_TYPE` picks exactly one backend at startup. [`Store`] forwards every
//! contract call to it, so the rest of the service is generic over a single
//! concrete type.

use std::str::FromStr;

use derive_more::Display;
use kernel::context::OpContext;
use kernel::id::{TodoId, UserId};

use crate::document::{MongoConfig, MongoStore};
use crate::error::{StorageError, StorageResult};
use crate::model::{NewTodo, NewUser, Todo, User};
use crate::relational::{PgConfig, PgStore};
use crate::traits::TodoStore;

/// Supported backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum BackendKind {
    #[default]
    #[display("mongodb")]
    Document,

    #[display("postgresql")]
    Relational,
}

impl FromStr for BackendKind {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mongodb" => Ok(Self::Document),
            "postgresql" => Ok(Self::Relational),
            _ => Err(StorageError::UnknownBackend(s.to_string())),
        }
    }
}

/// Connection settings of the selected backend
#[derive(Debug, Clone)]
pub enum BackendConfig {
    Document(MongoConfig),
    Relational(PgConfig),
}

impl BackendConfig {
    pub fn kind(&self) -> BackendKind {
        match self {
            Self::Document(_) => BackendKind::Document,
            Self::Relational(_) => BackendKind::Relational,
        }
    }
}

/// The store the service runs on
#[derive(Clone)]
pub enum Store {
    Document(MongoStore),
    Relational(PgStore),
}

impl Store {
    /// Construct the configured backend
    pub async fn connect(config: &BackendConfig) -> StorageResult<Self> {
        tracing::info!(backend = %config.kind(), "Connecting to storage backend");

        match config {
            BackendConfig::Document(config) => MongoStore::connect(config).await.map(Self::Document),
            BackendConfig::Relational(config) => PgStore::connect(config).await.map(Self::Relational),
        }
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            Self::Document(_) => BackendKind::Document,
            Self::Relational(_) => BackendKind::Relational,
        }
    }
}

impl TodoStore for Store {
    async fn find_existing_users(&self, ctx: &OpContext, email: &str) -> StorageResult<u64> {
        match self {
            Self::Document(store) => store.find_existing_users(ctx, email).await,
            Self::Relational(store) => store.find_existing_users(ctx, email).await,
        }
    }

    async fn add_user(&self, ctx: &OpContext, user: NewUser) -> StorageResult<User> {
        match self {
            Self::Document(store) => store.add_user(ctx, user).await,
            Self::Relational(store) => store.add_user(ctx, user).await,
        }
    }

    async fn get_user(&self, ctx: &OpContext, email: &str) -> StorageResult<User> {
        match self {
            Self::Document(store) => store.get_user(ctx, email).await,
            Self::Relational(store) => store.get_user(ctx, email).await,
        }
    }

    async fn get_todo(&self, ctx: &OpContext, id: &TodoId) -> StorageResult<Todo> {
        match self {
            Self::Document(store) => store.get_todo(ctx, id).await,
            Self::Relational(store) => store.get_todo(ctx, id).await,
        }
    }

    async fn get_todos(&self, ctx: &OpContext, owner: &UserId) -> StorageResult<Vec<Todo>> {
        match self {
            Self::Document(store) => store.get_todos(ctx, owner).await,
            Self::Relational(store) => store.get_todos(ctx, owner).await,
        }
    }

    async fn add_todo(&self, ctx: &OpContext, todo: NewTodo) -> StorageResult<Todo> {
        match self {
            Self::Document(store) => store.add_todo(ctx, todo).await,
            Self::Relational(store) => store.add_todo(ctx, todo).await,
        }
    }

    async fn update_todo(&self, ctx: &OpContext, todo: &Todo) -> StorageResult<u64> {
        match self {
            Self::Document(store) => store.update_todo(ctx, todo).await,
            Self::Relational(store) => store.update_todo(ctx, todo).await,
        }
    }

    async fn delete_todo(
        &self,
        ctx: &OpContext,
        id: &TodoId,
        owner: &UserId,
    ) -> StorageResult<()> {
        match self {
            Self::Document(store) => store.delete_todo(ctx, id, owner).await,
            Self::Relational(store) => store.delete_todo(ctx, id, owner).await,
        }
    }

    async fn clear_todos(&self, ctx: &OpContext, owner: &UserId) -> StorageResult<u64> {
        match self {
            Self::Document(store) => store.clear_todos(ctx, owner).await,
            Self::Relational(store) => store.clear_todos(ctx, owner).await,
        }
    }

    async fn close(&self) {
        match self {
            Self::Document(store) => store.close().await,
            Self::Relational(store) => store.close().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_kind_parse() {
        assert_eq!("mongodb".parse::<BackendKind>().unwrap(), BackendKind::Document);
        assert_eq!(
            " PostgreSQL ".parse::<BackendKind>().unwrap(),
            BackendKind::Relational
        );
    }

    #[test]
    fn test_backend_kind_rejects_unknown() {
        let err = "sqlite".parse::<BackendKind>().unwrap_err();
        assert!(matches!(err, StorageError::UnknownBackend(ref name) if name == "sqlite"));

        assert!("postgres".parse::<BackendKind>().is_err());
        assert!("".parse::<BackendKind>().is_err());
    }

    #[test]
    fn test_backend_kind_display_round_trips() {
        for kind in [BackendKind::Document, BackendKind::Relational] {
            assert_eq!(kind.to_string().parse::<BackendKind>().unwrap(), kind);
        }
        assert_eq!(BackendKind::default(), BackendKind::Document);
    }

    #[test]
    fn test_config_kind() {
        let config = BackendConfig::Relational(PgConfig::new("postgres://localhost/tasky"));
        assert_eq!(config.kind(), BackendKind::Relational);

        let config = BackendConfig::Document(MongoConfig::new("mongodb://localhost"));
        assert_eq!(config.kind(), BackendKind::Document);
    }
}
