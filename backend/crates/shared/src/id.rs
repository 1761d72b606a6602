//! Common ID Types
//!
//! Type-safe wrappers around backend-issued identifiers.
//! The storage backend decides the textual format (ObjectId hex, UUID);
//! everything above the storage layer treats the value as opaque.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// Generic typed ID wrapper
///
/// Usage:
/// ```
/// use kernel::id::{Id, markers};
/// type UserId = Id<markers::User>;
/// let id = UserId::new("65f1c0ffee");
/// assert_eq!(id.as_str(), "65f1c0ffee");
/// ```
#[derive(Serialize, Deserialize)]
#[serde(transparent, bound = "")]
pub struct Id<T> {
    value: String,
    #[serde(skip)]
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    /// Wrap an identifier issued by a storage backend
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            _marker: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_string(self) -> String {
        self.value
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> std::hash::Hash for Id<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T> From<String> for Id<T> {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl<T> From<&str> for Id<T> {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl<T> AsRef<str> for Id<T> {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

/// Marker types for different entity IDs
pub mod markers {
    /// Marker for User IDs
    pub struct User;

    /// Marker for Todo IDs
    pub struct Todo;
}

/// Type aliases for common IDs
pub type UserId = Id<markers::User>;
pub type TodoId = Id<markers::Todo>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_equality_by_value() {
        let a = UserId::new("abc");
        let b = UserId::from("abc".to_string());
        assert_eq!(a, b);
        assert_ne!(a, UserId::new("abd"));
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = TodoId::new("65f1c0ffee0000000000beef");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"65f1c0ffee0000000000beef\"");

        let back: TodoId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_id_display() {
        let id = UserId::new("u-1");
        assert_eq!(id.to_string(), "u-1");
        assert_eq!(format!("{:?}", id), "Id(u-1)");
    }
}
