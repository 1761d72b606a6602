//! Todo Backend Module
//!
//! Clean Architecture structure:
//! - `application/` - Todo use cases with owner checks
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! Every route sits behind `auth::require_session`. A caller may only name
//! themselves in a path, and every store call filters by the caller's id.

pub mod application;
pub mod error;
pub mod presentation;

// Re-exports for convenience
pub use application::config::TodoConfig;
pub use application::todos::{TodoChanges, TodoUseCase, UpdateOutcome};
pub use error::{TodoError, TodoResult};
pub use presentation::handlers::TodoAppState;
pub use presentation::router::todo_router;
