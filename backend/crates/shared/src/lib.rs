//! Kernel
//!
//! Vocabulary every other crate in the service speaks:
//! - [`error`]: the `ErrorKind`/`AppError` pair crate errors render through
//! - [`id`]: opaque, typed user and todo identifiers
//! - [`context`]: the deadline and cancellation bound on each operation

pub mod context;
pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
