//! Storage connector for the todo collection.
//!
//! Handlers only see `SharedStore`, a trait object built once at startup and
//! handed to the router. Every operation is independently atomic at the
//! store; there are no transactions and no application-level locking.

mod memory;
mod mongo;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{ObjectId, TodoChanges, TodoDocument};

pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// The handle shared by every request for the lifetime of the process.
pub type SharedStore = Arc<dyn TodoStore>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached while connecting.
    #[error("document store unreachable: {0}")]
    Connection(String),

    /// A query or write failed after the connection was established.
    #[error("document store operation failed: {0}")]
    Operation(String),
}

impl From<mongodb::error::Error> for StoreError {
    fn from(e: mongodb::error::Error) -> Self {
        StoreError::Operation(e.to_string())
    }
}

#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Every record, oldest first.
    async fn find_all(&self) -> Result<Vec<TodoDocument>, StoreError>;

    async fn insert_one(&self, todo: &TodoDocument) -> Result<(), StoreError>;

    /// Applies `changes` and returns the record as it is afterwards, or
    /// `None` when no record has this id.
    async fn update_by_id(
        &self,
        id: ObjectId,
        changes: TodoChanges,
    ) -> Result<Option<TodoDocument>, StoreError>;

    /// Removes the record and returns it, or `None` when no record has this id.
    async fn delete_by_id(&self, id: ObjectId) -> Result<Option<TodoDocument>, StoreError>;
}
