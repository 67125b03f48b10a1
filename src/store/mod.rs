use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

/// Errors surfaced by store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to persist {kind}: {reason}")]
    Persist { kind: &'static str, reason: String },
    #[error("failed to load {kind}: {reason}")]
    Load { kind: &'static str, reason: String },
}

/// Items a store can key by
pub trait HasId {
    fn id(&self) -> &str;
}

/// Remote persistence behind a store
///
/// Implementations wrap whatever the backend actually is (a REST API, a
/// file); the store only needs list/upsert/delete.
#[async_trait]
pub trait StoreBackend<T: HasId>: Send + Sync {
    async fn list(&self) -> Result<Vec<T>, StoreError>;
    async fn upsert(&self, item: &T) -> Result<(), StoreError>;
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

/// Locally cached collection with optimistic updates.
///
/// Mutations apply to the cache first, then persist; when persistence fails
/// the cache rolls back to its prior contents and the error propagates.
/// Scenario and message-sample collections both use this one implementation.
pub struct Store<T: HasId + Clone, B: StoreBackend<T>> {
    items: Vec<T>,
    backend: B,
}

impl<T: HasId + Clone, B: StoreBackend<T>> Store<T, B> {
    pub fn new(backend: B) -> Self {
        Self {
            items: Vec::new(),
            backend,
        }
    }

    /// Replace the cache with the backend's current contents
    pub async fn load(&mut self) -> Result<(), StoreError> {
        self.items = self.backend.list().await?;
        Ok(())
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Insert or replace an item, rolling back on persist failure
    pub async fn upsert(&mut self, item: T) -> Result<(), StoreError> {
        let previous = self.items.clone();
        match self.items.iter_mut().find(|i| i.id() == item.id()) {
            Some(existing) => *existing = item.clone(),
            None => self.items.push(item.clone()),
        }
        if let Err(e) = self.backend.upsert(&item).await {
            warn!("upsert rolled back: {e}");
            self.items = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Remove an item, rolling back on persist failure. Unknown ids are a
    /// no-op.
    pub async fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        if self.get(id).is_none() {
            return Ok(());
        }
        let previous = self.items.clone();
        self.items.retain(|item| item.id() != id);
        if let Err(e) = self.backend.delete(id).await {
            warn!("delete rolled back: {e}");
            self.items = previous;
            return Err(e);
        }
        Ok(())
    }
}

impl HasId for crate::core::Scenario {
    fn id(&self) -> &str {
        &self.id
    }
}

impl HasId for crate::core::MessageSample {
    fn id(&self) -> &str {
        &self.message_id
    }
}
