//! Storage Abstraction
//!
//! One persistence contract ([`TodoStore`]) with two conforming backends:
//! - `document` - MongoDB collections of schemaless documents
//! - `relational` - PostgreSQL tables, created lazily on first connect
//!
//! The backend is chosen once at startup through [`BackendConfig`] and
//! wrapped in [`Store`]; application code only sees the trait.
//!
//! ## Contract highlights
//! - Identity is generated by the backend, never by the caller
//! - Lookups that match nothing are [`StorageError::NotFound`], not empty values
//! - Todo mutations filter by both todo id and owner id
//! - Every call is bounded by the caller's [`kernel::context::OpContext`]
//! - No operation is retried

pub mod backend;
pub mod document;
pub mod error;
pub mod model;
pub mod relational;
pub mod traits;

#[cfg(any(test, feature = "test-util"))]
pub mod memory;

// Re-exports for convenience
pub use backend::{BackendConfig, BackendKind, Store};
pub use document::{MongoConfig, MongoStore};
pub use error::{Operation, StorageError, StorageResult};
pub use model::{NewTodo, NewUser, Todo, User};
pub use relational::{PgConfig, PgStore};
pub use traits::{LocalTodoStore, TodoStore};

#[cfg(any(test, feature = "test-util"))]
pub use memory::MemoryStore;
