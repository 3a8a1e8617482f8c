//! Storage and wire shapes of a todo, and the mapping between them.
//!
//! # Design
//! `TodoDocument` is what the document store holds: a native `ObjectId` and a
//! BSON timestamp. `Todo` is what clients see: the id as 24-char hex and the
//! timestamp as RFC3339. Mapping only goes store -> wire. Request payloads
//! (`CreateTodo`, `UpdateTodo`) carry title and completed only, so a client
//! can never choose an id or a creation time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub use bson::oid::ObjectId;

/// A todo as persisted in the collection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TodoDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(rename = "createdAt")]
    pub created_at: bson::DateTime,
}

impl TodoDocument {
    /// Fresh record with a new id, stamped with the current time.
    pub fn new(title: String, completed: bool) -> Self {
        Self {
            id: ObjectId::new(),
            title,
            completed,
            created_at: bson::DateTime::now(),
        }
    }

    /// Applies the present fields of `changes`; id and `created_at` are never touched.
    pub fn apply(&mut self, changes: &TodoChanges) {
        if let Some(title) = &changes.title {
            self.title.clone_from(title);
        }
        if let Some(completed) = changes.completed {
            self.completed = completed;
        }
    }
}

/// A todo as sent to clients.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl From<TodoDocument> for Todo {
    fn from(doc: TodoDocument) -> Self {
        Self {
            id: doc.id.to_hex(),
            title: doc.title,
            completed: doc.completed,
            created_at: doc.created_at.to_chrono(),
        }
    }
}

/// Field-level changes for an update; `None` means leave as is.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TodoChanges {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

impl TodoChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.completed.is_none()
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateTodo {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

impl CreateTodo {
    pub fn into_document(self) -> Result<TodoDocument, ApiError> {
        let title = required_title(self.title)?;
        Ok(TodoDocument::new(title, self.completed.unwrap_or(false)))
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateTodo {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

impl UpdateTodo {
    pub fn into_changes(self) -> Result<TodoChanges, ApiError> {
        let title = match self.title {
            Some(title) => Some(required_title(Some(title))?),
            None => None,
        };
        let changes = TodoChanges {
            title,
            completed: self.completed,
        };
        if changes.is_empty() {
            return Err(ApiError::Validation(
                "at least one of title or completed is required".to_string(),
            ));
        }
        Ok(changes)
    }
}

fn required_title(title: Option<String>) -> Result<String, ApiError> {
    match title.as_deref().map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => Ok(trimmed.to_string()),
        _ => Err(ApiError::Validation("the title field is required".to_string())),
    }
}

/// Decodes a path identifier into the store's native id.
pub fn parse_id(raw: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(raw).map_err(|_| ApiError::Validation(format!("invalid todo id `{raw}`")))
}

/// Success envelope: `{"data": ...}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Failure envelope: `{"message": ..., "error": ...}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    pub error: String,
}

/// Body of `GET /`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    pub status: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            status: "ok".to_string(),
        }
    }
}
