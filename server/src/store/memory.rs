use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{StoreError, TodoStore};
use crate::model::{ObjectId, TodoChanges, TodoDocument};

/// Process-local store with the same semantics as the MongoDB one.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    todos: Arc<RwLock<HashMap<ObjectId, TodoDocument>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn find_all(&self) -> Result<Vec<TodoDocument>, StoreError> {
        let todos = self.todos.read().await;
        let mut all: Vec<TodoDocument> = todos.values().cloned().collect();
        all.sort_by_key(|t| (t.created_at.timestamp_millis(), t.id.bytes()));
        Ok(all)
    }

    async fn insert_one(&self, todo: &TodoDocument) -> Result<(), StoreError> {
        let mut todos = self.todos.write().await;
        if todos.contains_key(&todo.id) {
            return Err(StoreError::Operation(format!("duplicate key {}", todo.id)));
        }
        todos.insert(todo.id, todo.clone());
        Ok(())
    }

    async fn update_by_id(
        &self,
        id: ObjectId,
        changes: TodoChanges,
    ) -> Result<Option<TodoDocument>, StoreError> {
        let mut todos = self.todos.write().await;
        Ok(todos.get_mut(&id).map(|todo| {
            todo.apply(&changes);
            todo.clone()
        }))
    }

    async fn delete_by_id(&self, id: ObjectId) -> Result<Option<TodoDocument>, StoreError> {
        Ok(self.todos.write().await.remove(&id))
    }
}
