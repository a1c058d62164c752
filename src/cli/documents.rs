//! Documents view state: the shared document list and the operations that
//! change it.

use crate::cli::api_client::ApiClient;
use crate::cli::error::ApiError;
use crate::cli::filters::DocumentFilter;
use crate::cli::scope::ScopeToken;
use crate::cli::store::EntityStore;
use crate::cli::upload::UploadWorkflow;
use crate::configuration::PollSettings;
use crate::models::Document;

#[derive(Clone)]
pub struct DocumentLibrary {
    client: ApiClient,
    store: EntityStore<Document>,
}

impl DocumentLibrary {
    pub fn new(client: ApiClient, store: EntityStore<Document>) -> Self {
        Self { client, store }
    }

    pub fn store(&self) -> &EntityStore<Document> {
        &self.store
    }

    /// Reload the full list from the backend.
    pub async fn refresh(&self) -> Result<Vec<Document>, ApiError> {
        let documents = self.client.list_documents().await?;
        self.store.set_all(documents.clone()).await;
        Ok(documents)
    }

    /// Current list narrowed by `filter`.
    pub async fn filtered(&self, filter: &DocumentFilter) -> Vec<Document> {
        self.store
            .snapshot()
            .await
            .into_iter()
            .filter(|d| filter.matches(d))
            .collect()
    }

    /// How many of `ids` the store shows in a terminal status.
    pub async fn settled(&self, ids: &[String]) -> usize {
        self.store
            .snapshot()
            .await
            .iter()
            .filter(|d| ids.contains(&d.id) && d.status.is_terminal())
            .count()
    }

    /// Delete on the backend, then drop the local entry.
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client.delete_document(id).await?;
        self.store.remove(id).await;
        Ok(())
    }

    /// Upload workflow writing into this library's list.
    pub fn uploader(&self, poll: PollSettings, token: ScopeToken) -> UploadWorkflow {
        UploadWorkflow::new(self.client.clone(), self.store.clone(), poll, token)
    }
}
