//! Shared client-side cache of backend records, keyed by id.
//!
//! Views read from a store instead of keeping private copies, so a document
//! count shown on the dashboard and on the documents view come from the same
//! list. Writers only ever apply records the backend returned; every update is
//! a replace-by-id, so updates to different ids commute.

use std::sync::Arc;

use tokio::sync::{watch, RwLock};

use crate::models::{ChatSession, Conflict, Document, Entity};

pub struct EntityStore<T: Entity> {
    items: Arc<RwLock<Vec<T>>>,
    revision: Arc<watch::Sender<u64>>,
}

impl<T: Entity> Clone for EntityStore<T> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
            revision: Arc::clone(&self.revision),
        }
    }
}

impl<T: Entity> Default for EntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> EntityStore<T> {
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            items: Arc::new(RwLock::new(Vec::new())),
            revision: Arc::new(revision),
        }
    }

    /// Receiver that observes a new revision number after every write.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn bump(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }

    pub async fn snapshot(&self) -> Vec<T> {
        self.items.read().await.clone()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    pub async fn get(&self, id: &str) -> Option<T> {
        self.items.read().await.iter().find(|i| i.id() == id).cloned()
    }

    /// Replace the whole list, e.g. after a full reload.
    pub async fn set_all(&self, items: Vec<T>) {
        *self.items.write().await = items;
        self.bump();
    }

    /// Put `fresh` at the head of the list, dropping older copies of the same ids.
    pub async fn prepend(&self, fresh: Vec<T>) {
        if fresh.is_empty() {
            return;
        }
        let mut items = self.items.write().await;
        let rest: Vec<T> = items
            .drain(..)
            .filter(|existing| !fresh.iter().any(|f| f.id() == existing.id()))
            .collect();
        *items = fresh;
        items.extend(rest);
        drop(items);
        self.bump();
    }

    /// Replace the entry with the same id. Returns `false` when no entry matched.
    pub async fn replace(&self, item: T) -> bool {
        let mut items = self.items.write().await;
        let Some(slot) = items.iter_mut().find(|i| i.id() == item.id()) else {
            return false;
        };
        *slot = item;
        drop(items);
        self.bump();
        true
    }

    /// Apply `update` to the entry with `id`. Returns `false` when no entry matched.
    pub async fn update<F>(&self, id: &str, update: F) -> bool
    where
        F: FnOnce(&mut T),
    {
        let mut items = self.items.write().await;
        let Some(slot) = items.iter_mut().find(|i| i.id() == id) else {
            return false;
        };
        update(slot);
        drop(items);
        self.bump();
        true
    }

    pub async fn remove(&self, id: &str) -> Option<T> {
        let mut items = self.items.write().await;
        let pos = items.iter().position(|i| i.id() == id)?;
        let removed = items.remove(pos);
        drop(items);
        self.bump();
        Some(removed)
    }
}

/// The stores one terminal session shares between its views.
#[derive(Clone, Default)]
pub struct Stores {
    pub documents: EntityStore<Document>,
    pub sessions: EntityStore<ChatSession>,
    pub conflicts: EntityStore<Conflict>,
}
