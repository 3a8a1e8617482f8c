use std::time::Duration;

use async_trait::async_trait;
use bson::{doc, Document};
use futures::TryStreamExt;
use mongodb::{
    options::{ClientOptions, ReturnDocument},
    Client, Collection,
};
use tracing::info;

use super::{StoreError, TodoStore};
use crate::model::{ObjectId, TodoChanges, TodoDocument};

/// MongoDB-backed store bound to one database and collection.
///
/// The driver pools connections internally, so a single `MongoStore` is
/// shared by all handlers without further locking.
#[derive(Clone, Debug)]
pub struct MongoStore {
    collection: Collection<TodoDocument>,
}

impl MongoStore {
    /// Connects and pings the database.
    ///
    /// The driver connects lazily, so the ping is what turns an unreachable
    /// server into a startup failure. `timeout` bounds server selection.
    pub async fn connect(
        uri: &str,
        database: &str,
        collection: &str,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let mut options = ClientOptions::parse(uri)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
        options.connect_timeout = Some(timeout);
        options.server_selection_timeout = Some(timeout);

        let client = Client::with_options(options).map_err(|e| StoreError::Connection(e.to_string()))?;
        let db = client.database(database);
        db.run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        info!(database, collection, "connected to document store");
        Ok(Self {
            collection: db.collection(collection),
        })
    }
}

fn by_id(id: ObjectId) -> Document {
    doc! { "_id": id }
}

#[async_trait]
impl TodoStore for MongoStore {
    async fn find_all(&self) -> Result<Vec<TodoDocument>, StoreError> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "createdAt": 1, "_id": 1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn insert_one(&self, todo: &TodoDocument) -> Result<(), StoreError> {
        self.collection.insert_one(todo).await?;
        Ok(())
    }

    async fn update_by_id(
        &self,
        id: ObjectId,
        changes: TodoChanges,
    ) -> Result<Option<TodoDocument>, StoreError> {
        let mut set = Document::new();
        if let Some(title) = changes.title {
            set.insert("title", title);
        }
        if let Some(completed) = changes.completed {
            set.insert("completed", completed);
        }
        // `$set` rejects an empty document.
        if set.is_empty() {
            return Ok(self.collection.find_one(by_id(id)).await?);
        }

        Ok(self
            .collection
            .find_one_and_update(by_id(id), doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?)
    }

    async fn delete_by_id(&self, id: ObjectId) -> Result<Option<TodoDocument>, StoreError> {
        Ok(self.collection.find_one_and_delete(by_id(id)).await?)
    }
}
