//! Conflict (relationship) status transitions.
//!
//! The backend is the source of truth: a successful transition replaces the
//! local record with whatever the server returned. An id is listed in the
//! `updating` set for exactly as long as its request is in flight, and a second
//! request for the same id is refused meanwhile. Different ids never block
//! each other.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::cli::api_client::ApiClient;
use crate::cli::error::ApiError;
use crate::cli::store::EntityStore;
use crate::models::{Conflict, ConflictStatus};

/// Result of a status transition request.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusChange {
    Applied(Conflict),
    /// Another transition for this id was still in flight; nothing was sent.
    InFlight,
}

#[derive(Clone)]
pub struct ConflictBoard {
    client: ApiClient,
    store: EntityStore<Conflict>,
    updating: Arc<Mutex<HashSet<String>>>,
}

/// Removes its id from the `updating` set when dropped.
struct UpdatingGuard {
    id: String,
    updating: Arc<Mutex<HashSet<String>>>,
}

impl Drop for UpdatingGuard {
    fn drop(&mut self) {
        if let Ok(mut set) = self.updating.lock() {
            set.remove(&self.id);
        }
    }
}

impl ConflictBoard {
    pub fn new(client: ApiClient, store: EntityStore<Conflict>) -> Self {
        Self {
            client,
            store,
            updating: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn store(&self) -> &EntityStore<Conflict> {
        &self.store
    }

    /// Reload all conflicts from the backend into the store.
    pub async fn refresh(&self) -> Result<Vec<Conflict>, ApiError> {
        let conflicts = self.client.list_conflicts().await?;
        self.store.set_all(conflicts.clone()).await;
        Ok(conflicts)
    }

    pub fn is_updating(&self, id: &str) -> bool {
        self.updating
            .lock()
            .map(|set| set.contains(id))
            .unwrap_or(false)
    }

    pub fn updating_ids(&self) -> Vec<String> {
        self.updating
            .lock()
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn begin(&self, id: &str) -> Option<UpdatingGuard> {
        let mut set = self.updating.lock().ok()?;
        if !set.insert(id.to_string()) {
            return None;
        }
        Some(UpdatingGuard {
            id: id.to_string(),
            updating: Arc::clone(&self.updating),
        })
    }

    #[tracing::instrument(name = "Set conflict status", skip(self))]
    pub async fn set_status(
        &self,
        id: &str,
        status: ConflictStatus,
    ) -> Result<StatusChange, ApiError> {
        let Some(_guard) = self.begin(id) else {
            tracing::debug!("status change already in flight");
            return Ok(StatusChange::InFlight);
        };

        let updated = self.client.update_conflict_status(id, status).await?;
        if !self.store.replace(updated.clone()).await {
            // Not loaded yet (e.g. a single-record view); keep it anyway.
            self.store.prepend(vec![updated.clone()]).await;
        }

        Ok(StatusChange::Applied(updated))
    }

    pub async fn resolve(&self, id: &str) -> Result<StatusChange, ApiError> {
        self.set_status(id, ConflictStatus::Resolved).await
    }

    pub async fn dismiss(&self, id: &str) -> Result<StatusChange, ApiError> {
        self.set_status(id, ConflictStatus::Dismissed).await
    }

    pub async fn reopen(&self, id: &str) -> Result<StatusChange, ApiError> {
        self.set_status(id, ConflictStatus::Active).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn board() -> ConflictBoard {
        let client = ApiClient::new("http://127.0.0.1:9", Duration::from_millis(50)).unwrap();
        ConflictBoard::new(client, EntityStore::new())
    }

    #[test]
    fn test_guard_blocks_same_id_and_clears_on_drop() {
        let board = board();
        let guard = board.begin("1").expect("first begin succeeds");
        assert!(board.is_updating("1"));
        assert!(board.begin("1").is_none());
        assert!(board.begin("2").is_some());
        drop(guard);
        assert!(!board.is_updating("1"));
    }

    #[tokio::test]
    async fn test_failed_request_clears_updating() {
        let board = board();
        let err = board.resolve("1").await.unwrap_err();
        assert_eq!(err.status, 0);
        assert!(!board.is_updating("1"));
        assert!(board.updating_ids().is_empty());
    }
}
