//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, cookies and middleware.

pub mod cookies;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::AuthAppState;
pub use middleware::{AuthenticatedUser, SessionLayerState, require_session};
pub use router::auth_router;
