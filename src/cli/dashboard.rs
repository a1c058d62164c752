use serde::Serialize;

use crate::cli::api_client::ApiClient;
use crate::cli::error::ApiError;
use crate::cli::store::{EntityStore, Stores};
use crate::models::{
    Change, ChatSession, Conflict, ConflictStatus, ConflictType, Document, Entity,
};

/// Changes listed under "Recent Activity".
pub const RECENT_ACTIVITY_LIMIT: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_documents: usize,
    /// Number of chat sessions.
    pub memory_queries: usize,
    /// Active records of type `conflict`.
    pub conflicts_found: usize,
    /// Every relationship record, any type or status.
    pub relationships: usize,
}

/// Which of the four dashboard reads a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardSlice {
    Documents,
    Sessions,
    Conflicts,
    RecentChanges,
}

#[derive(Debug, Clone, Serialize)]
pub struct SliceFailure {
    pub slice: DashboardSlice,
    pub status: u16,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardSnapshot {
    pub stats: DashboardStats,
    pub recent_activity: Vec<Change>,
    /// Reads that failed and were treated as empty.
    pub failures: Vec<SliceFailure>,
}

impl DashboardStats {
    pub fn compute(
        documents: &[Document],
        sessions: &[ChatSession],
        conflicts: &[Conflict],
    ) -> Self {
        Self {
            total_documents: documents.len(),
            memory_queries: sessions.len(),
            conflicts_found: conflicts
                .iter()
                .filter(|c| c.kind == ConflictType::Conflict && c.status == ConflictStatus::Active)
                .count(),
            relationships: conflicts.len(),
        }
    }
}

fn or_empty<T>(
    slice: DashboardSlice,
    result: Result<Vec<T>, ApiError>,
    failures: &mut Vec<SliceFailure>,
) -> Vec<T> {
    match result {
        Ok(items) => items,
        Err(err) => {
            tracing::warn!(slice = ?slice, status = err.status, "dashboard read failed: {}", err);
            failures.push(SliceFailure {
                slice,
                status: err.status,
                message: err.message,
            });
            Vec::new()
        }
    }
}

/// Write a successful read into `store` and count from the store. A failed
/// read leaves the store as it was and counts as empty.
async fn load_into<T: Entity>(
    store: &EntityStore<T>,
    slice: DashboardSlice,
    result: Result<Vec<T>, ApiError>,
    failures: &mut Vec<SliceFailure>,
) -> Vec<T> {
    match result {
        Ok(items) => {
            store.set_all(items).await;
            store.snapshot().await
        }
        Err(err) => or_empty(slice, Err(err), failures),
    }
}

/// Load the dashboard into `stores`. The four reads run concurrently and a
/// failed read only empties its own slice.
#[tracing::instrument(name = "Load dashboard", skip(client, stores))]
pub async fn load_dashboard(client: &ApiClient, stores: &Stores) -> DashboardSnapshot {
    let (documents, sessions, conflicts, changes) = tokio::join!(
        client.list_documents(),
        client.chat_sessions(),
        client.list_conflicts(),
        client.recent_changes(),
    );

    let mut failures = Vec::new();
    let documents = load_into(
        &stores.documents,
        DashboardSlice::Documents,
        documents,
        &mut failures,
    )
    .await;
    let sessions = load_into(
        &stores.sessions,
        DashboardSlice::Sessions,
        sessions,
        &mut failures,
    )
    .await;
    let conflicts = load_into(
        &stores.conflicts,
        DashboardSlice::Conflicts,
        conflicts,
        &mut failures,
    )
    .await;
    let mut recent_activity = or_empty(DashboardSlice::RecentChanges, changes, &mut failures);
    recent_activity.truncate(RECENT_ACTIVITY_LIMIT);

    DashboardSnapshot {
        stats: DashboardStats::compute(&documents, &sessions, &conflicts),
        recent_activity,
        failures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConflictDocument, Severity};

    fn conflict(id: &str, kind: ConflictType, status: ConflictStatus) -> Conflict {
        Conflict {
            id: id.to_string(),
            kind,
            documents: vec![ConflictDocument {
                name: "Master Service Agreement".to_string(),
                section: None,
            }],
            description: "Liability caps differ".to_string(),
            severity: Severity::Medium,
            status,
        }
    }

    #[test]
    fn test_conflicts_found_counts_only_active_conflicts() {
        let conflicts = vec![
            conflict("1", ConflictType::Conflict, ConflictStatus::Active),
            conflict("2", ConflictType::Conflict, ConflictStatus::Resolved),
            conflict("3", ConflictType::Similarity, ConflictStatus::Active),
        ];
        let stats = DashboardStats::compute(&[], &[], &conflicts);
        assert_eq!(stats.conflicts_found, 1);
        assert_eq!(stats.relationships, 3);
        assert_eq!(stats.total_documents, 0);
    }

    #[tokio::test]
    async fn test_unreachable_backend_yields_empty_dashboard() {
        let client =
            ApiClient::new("http://127.0.0.1:9", std::time::Duration::from_millis(50)).unwrap();
        let snapshot = load_dashboard(&client, &Stores::default()).await;
        assert_eq!(snapshot.stats, DashboardStats::default());
        assert_eq!(snapshot.failures.len(), 4);
        assert!(snapshot.failures.iter().all(|f| f.status == 0));
    }
}
