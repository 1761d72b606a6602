//! Storage Errors
//!
//! Failures of contract calls carry the [`Operation`] they happened in, so
//! callers can log them without knowing which backend is active.

use std::future::IntoFuture;

use derive_more::Display;
use kernel::context::{Interrupted, OpContext};
use thiserror::Error;

use crate::backend::BackendKind;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Contract operation names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Operation {
    FindExistingUsers,
    AddUser,
    GetUser,
    GetTodo,
    GetTodos,
    AddTodo,
    UpdateTodo,
    DeleteTodo,
    ClearTodos,
}

/// Storage layer errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Lookup or delete matched nothing
    #[error("{op}: no matching record")]
    NotFound { op: Operation },

    /// The driver reported a failure (connection, query, decoding)
    #[error("{op}: backend failure: {source}")]
    Backend {
        op: Operation,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("{op}: deadline exceeded")]
    DeadlineExceeded { op: Operation },

    #[error("{op}: cancelled")]
    Cancelled { op: Operation },

    /// The store was closed before the call
    #[error("{op}: store is closed")]
    Closed { op: Operation },

    /// `DB_TYPE` names no known backend
    #[error("unsupported database type: {0:?}")]
    UnknownBackend(String),

    #[error("failed to connect to {backend}: {source}")]
    Connect {
        backend: BackendKind,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Creating a missing table failed
    #[error("failed to bootstrap table {table}: {source}")]
    Bootstrap {
        table: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl StorageError {
    pub fn backend<E>(op: Operation, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend {
            op,
            source: Box::new(source),
        }
    }

    pub fn connect<E>(backend: BackendKind, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Connect {
            backend,
            source: Box::new(source),
        }
    }

    pub fn interrupted(op: Operation, interrupted: Interrupted) -> Self {
        match interrupted {
            Interrupted::DeadlineExceeded => Self::DeadlineExceeded { op },
            Interrupted::Cancelled => Self::Cancelled { op },
        }
    }

    /// The operation that failed, when there is one
    pub fn operation(&self) -> Option<Operation> {
        match self {
            Self::NotFound { op }
            | Self::Backend { op, .. }
            | Self::DeadlineExceeded { op }
            | Self::Cancelled { op }
            | Self::Closed { op } => Some(*op),
            Self::UnknownBackend(_) | Self::Connect { .. } | Self::Bootstrap { .. } => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_deadline_exceeded(&self) -> bool {
        matches!(self, Self::DeadlineExceeded { .. })
    }
}

/// Run a driver call under `ctx`, tagging every failure with `op`
pub(crate) async fn bounded<T, E, F>(ctx: &OpContext, op: Operation, call: F) -> StorageResult<T>
where
    F: IntoFuture<Output = Result<T, E>>,
    E: std::error::Error + Send + Sync + 'static,
{
    match ctx.run(call.into_future()).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(StorageError::backend(op, e)),
        Err(interrupted) => Err(StorageError::interrupted(op, interrupted)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_operation_display_is_contract_name() {
        assert_eq!(Operation::FindExistingUsers.to_string(), "FindExistingUsers");
        assert_eq!(Operation::DeleteTodo.to_string(), "DeleteTodo");
    }

    #[test]
    fn test_error_message_names_operation() {
        let err = StorageError::NotFound {
            op: Operation::GetUser,
        };
        assert_eq!(err.to_string(), "GetUser: no matching record");
        assert_eq!(err.operation(), Some(Operation::GetUser));
        assert!(err.is_not_found());

        let err = StorageError::UnknownBackend("sqlite".to_string());
        assert_eq!(err.to_string(), "unsupported database type: \"sqlite\"");
        assert_eq!(err.operation(), None);
    }

    #[tokio::test]
    async fn test_bounded_tags_backend_failure() {
        let ctx = OpContext::with_timeout(Duration::from_secs(5));
        let result: StorageResult<()> = bounded(&ctx, Operation::AddTodo, async {
            Err(std::io::Error::other("connection reset"))
        })
        .await;

        match result {
            Err(StorageError::Backend { op, source }) => {
                assert_eq!(op, Operation::AddTodo);
                assert_eq!(source.to_string(), "connection reset");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_bounded_reports_cancellation() {
        let ctx = OpContext::with_timeout(Duration::from_secs(5));
        ctx.cancel();
        let result: StorageResult<()> = bounded(
            &ctx,
            Operation::GetTodos,
            std::future::pending::<Result<(), std::io::Error>>(),
        )
        .await;

        assert!(matches!(
            result,
            Err(StorageError::Cancelled {
                op: Operation::GetTodos
            })
        ));
    }
}
