//! Stored records
//!
//! Backend-neutral shapes of what the stores persist. Wire formats live
//! with the HTTP glue, not here.

use std::fmt;

use kernel::id::{TodoId, UserId};

/// A registered user
///
/// `password_hash` is the PHC string produced at signup; it is never
/// serialized and never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub password_hash: String,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("name", &self.name)
            .field("password_hash", &"[HASH]")
            .finish()
    }
}

/// User fields supplied at signup; the store assigns the id
#[derive(Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("email", &self.email)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A todo item, referencing (not owning) its user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    pub id: TodoId,
    pub user_id: UserId,
    pub name: String,
    pub status: String,
}

/// Todo fields supplied by the owner; the store assigns the id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub user_id: UserId,
    pub name: String,
    pub status: String,
}

impl NewTodo {
    pub(crate) fn with_id(self, id: TodoId) -> Todo {
        Todo {
            id,
            user_id: self.user_id,
            name: self.name,
            status: self.status,
        }
    }
}

impl NewUser {
    pub(crate) fn with_id(self, id: UserId) -> User {
        User {
            id,
            email: self.email,
            name: self.name,
            password_hash: self.password_hash,
        }
    }
}
