//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod todos;

// Re-exports
pub use config::TodoConfig;
pub use todos::{TodoChanges, TodoUseCase, UpdateOutcome};
