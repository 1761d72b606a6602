//! Domain Layer
//!
//! Session tokens and value objects.

pub mod token;
pub mod value_object;
