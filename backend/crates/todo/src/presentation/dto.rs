//! API DTOs (Data Transfer Objects)
//!
//! Field names follow the service's established wire format
//! (`_id`, `userid`, `insertedId`).

use serde::{Deserialize, Serialize};
use storage::Todo;

/// Todo as sent to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub status: String,
    pub userid: String,
}

impl From<Todo> for TodoResponse {
    fn from(todo: Todo) -> Self {
        Self {
            id: todo.id.into_string(),
            name: todo.name,
            status: todo.status,
            userid: todo.user_id.into_string(),
        }
    }
}

/// POST /todo/{userid}
#[derive(Debug, Clone, Deserialize)]
pub struct AddTodoRequest {
    pub name: String,
    #[serde(default)]
    pub status: String,
}

/// PUT /todo
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTodoRequest {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub userid: Option<String>,
}

/// Echo of the requested todo plus whether a row matched
#[derive(Debug, Clone, Serialize)]
pub struct UpdateTodoResponse {
    #[serde(flatten)]
    pub todo: TodoResponse,
    pub updated: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct InsertedResponse {
    #[serde(rename = "insertedId")]
    pub inserted_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
    pub success: String,
}
