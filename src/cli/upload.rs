//! Document upload and per-document status polling.
//!
//! An upload filters the selected files down to PDF/DOCX, submits them as a
//! single request, merges the returned records into the head of the shared
//! document list, then starts one poll task for every document the backend
//! still reports as `processing`.
//!
//! Poll tasks never surface errors: terminal statuses, an exhausted attempt
//! budget, a failed tick and scope cancellation all end the task quietly with
//! a [`PollOutcome`] the caller may inspect or ignore.

use std::path::Path;

use futures::future::join_all;
use tokio::task::JoinHandle;

use crate::cli::api_client::ApiClient;
use crate::cli::error::ApiError;
use crate::cli::scope::ScopeToken;
use crate::cli::store::EntityStore;
use crate::configuration::PollSettings;
use crate::models::{Document, DocumentStatus, ACCEPTED_MIME_TYPES};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Files
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A file selected for upload, with its MIME type guessed from the name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime = mime_guess::from_path(&file_name)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Self {
            file_name,
            mime,
            bytes,
        }
    }

    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document")
            .to_string();
        Ok(Self::new(file_name, bytes))
    }

    pub fn is_accepted(&self) -> bool {
        ACCEPTED_MIME_TYPES.contains(&self.mime.as_str())
    }
}

/// Split files into (accepted, rejected), keeping the original order.
pub fn partition_accepted(files: Vec<UploadFile>) -> (Vec<UploadFile>, Vec<UploadFile>) {
    files.into_iter().partition(UploadFile::is_accepted)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Polling
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// How a document's poll loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Ready,
    Failed,
    /// Still `processing` after the full attempt budget.
    Exhausted { attempts: u32 },
    /// A status request failed; the loop stopped without retrying.
    Aborted(ApiError),
    /// The owning view went away; no result was applied after that.
    Cancelled,
}

/// Handle to one running poll loop.
#[derive(Debug)]
pub struct StatusPoll {
    pub document_id: String,
    handle: JoinHandle<PollOutcome>,
}

impl StatusPoll {
    pub async fn outcome(self) -> PollOutcome {
        self.handle.await.unwrap_or(PollOutcome::Cancelled)
    }
}

/// Poll `id` until it leaves `processing`, the budget runs out, a request
/// fails, or `token` is cancelled. Each response is written to `store`.
pub async fn poll_status(
    client: &ApiClient,
    store: &EntityStore<Document>,
    id: &str,
    settings: PollSettings,
    token: &ScopeToken,
) -> PollOutcome {
    let mut attempts = 0u32;

    while attempts < settings.max_attempts {
        tokio::select! {
            _ = token.cancelled() => return PollOutcome::Cancelled,
            _ = tokio::time::sleep(settings.interval()) => {}
        }

        attempts += 1;
        let report = tokio::select! {
            _ = token.cancelled() => return PollOutcome::Cancelled,
            res = client.document_status(id) => res,
        };

        let report = match report {
            Ok(report) => report,
            Err(err) => {
                tracing::debug!(document_id = %id, attempts, "status poll stopped: {}", err);
                return PollOutcome::Aborted(err);
            }
        };

        if token.is_cancelled() {
            return PollOutcome::Cancelled;
        }
        store.update(id, |doc| doc.status = report.status).await;

        match report.status {
            DocumentStatus::Ready => return PollOutcome::Ready,
            DocumentStatus::Error => return PollOutcome::Failed,
            DocumentStatus::Processing => {}
        }
    }

    tracing::debug!(document_id = %id, attempts, "status poll budget exhausted");
    PollOutcome::Exhausted { attempts }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// UploadWorkflow
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Result of one upload request.
#[derive(Debug, Default)]
pub struct UploadBatch {
    /// Records the backend created, in response order.
    pub documents: Vec<Document>,
    /// Files that were filtered out and never sent.
    pub rejected: Vec<UploadFile>,
    /// One poll per document that came back `processing`.
    pub polls: Vec<StatusPoll>,
}

impl UploadBatch {
    /// Wait for every poll loop of this batch.
    pub async fn wait(self) -> Vec<(String, PollOutcome)> {
        let ids: Vec<String> = self.polls.iter().map(|p| p.document_id.clone()).collect();
        let outcomes = join_all(self.polls.into_iter().map(StatusPoll::outcome)).await;
        ids.into_iter().zip(outcomes).collect()
    }
}

pub struct UploadWorkflow {
    client: ApiClient,
    store: EntityStore<Document>,
    poll: PollSettings,
    token: ScopeToken,
}

impl UploadWorkflow {
    pub fn new(
        client: ApiClient,
        store: EntityStore<Document>,
        poll: PollSettings,
        token: ScopeToken,
    ) -> Self {
        Self {
            client,
            store,
            poll,
            token,
        }
    }

    /// Upload the accepted subset of `files` and start polling.
    ///
    /// No request is made when nothing is accepted. On failure the store is
    /// left untouched and no polls start.
    pub async fn upload(&self, files: Vec<UploadFile>) -> Result<UploadBatch, ApiError> {
        let (accepted, rejected) = partition_accepted(files);
        for file in &rejected {
            tracing::warn!(file = %file.file_name, mime = %file.mime, "skipping unsupported file type");
        }

        if accepted.is_empty() {
            return Ok(UploadBatch {
                rejected,
                ..UploadBatch::default()
            });
        }

        let documents = self.client.upload_documents(accepted).await?;
        tracing::info!(count = documents.len(), "documents uploaded");
        self.store.prepend(documents.clone()).await;

        let polls = documents
            .iter()
            .filter(|doc| doc.status == DocumentStatus::Processing)
            .map(|doc| self.watch(&doc.id))
            .collect();

        Ok(UploadBatch {
            documents,
            rejected,
            polls,
        })
    }

    /// Start an independent poll loop for one document.
    pub fn watch(&self, id: &str) -> StatusPoll {
        let client = self.client.clone();
        let store = self.store.clone();
        let token = self.token.clone();
        let settings = self.poll;
        let document_id = id.to_string();
        let task_id = document_id.clone();

        let handle = tokio::spawn(async move {
            poll_status(&client, &store, &task_id, settings, &token).await
        });

        StatusPoll {
            document_id,
            handle,
        }
    }
}
