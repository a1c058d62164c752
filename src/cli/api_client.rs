//! Legal Memory backend API client
//!
//! Single chokepoint for every network call the client makes:
//! - Documents (upload, list, get, delete, processing status)
//! - Chat (query, sessions, session messages)
//! - History (recent changes, clause history, per-document changes)
//! - Conflicts (list, get, status transitions)
//! - Health probe
//!
//! Any non-2xx response or transport failure becomes an [`ApiError`]; nothing
//! is retried or cached here.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;

use crate::cli::error::ApiError;
use crate::cli::upload::UploadFile;
use crate::configuration::ApiSettings;
use crate::models::{
    Change, ChatMessage, ChatQuery, ChatReply, ChatSession, Conflict, ConflictStatus,
    ConflictStatusUpdate, Document, DocumentStatusReport,
};

/// Multipart field name the upload endpoint reads files from.
const UPLOAD_FIELD: &str = "files";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ApiClient: HTTP client for the Legal Memory backend
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::network)?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn from_settings(settings: &ApiSettings) -> Result<Self, ApiError> {
        Self::new(&settings.base_url, settings.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send `request`, turning transport failures and non-2xx codes into [`ApiError`].
    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let resp = request.send().await.map_err(|e| {
            tracing::debug!("backend unreachable: {:?}", e);
            ApiError::network(e)
        })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), body = %body, "backend returned error status");
            return Err(ApiError::http(status));
        }

        Ok(resp)
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let resp = self.execute(request).await?;
        resp.json::<T>()
            .await
            .map_err(|e| ApiError::network(format!("invalid response body: {e}")))
    }

    // ── Documents ────────────────────────────────────

    /// Upload files in one multipart request.
    ///
    /// No content-type header is set by hand; reqwest writes the multipart
    /// boundary itself.
    #[tracing::instrument(name = "Upload documents", skip(self, files), fields(count = files.len()))]
    pub async fn upload_documents(&self, files: Vec<UploadFile>) -> Result<Vec<Document>, ApiError> {
        let mut form = Form::new();
        for file in files {
            let part = Part::bytes(file.bytes)
                .file_name(file.file_name)
                .mime_str(&file.mime)
                .map_err(ApiError::network)?;
            form = form.part(UPLOAD_FIELD, part);
        }

        self.fetch_json(
            self.http
                .post(self.url("/documents/upload"))
                .multipart(form),
        )
        .await
    }

    #[tracing::instrument(name = "List documents", skip(self))]
    pub async fn list_documents(&self) -> Result<Vec<Document>, ApiError> {
        self.fetch_json(self.http.get(self.url("/documents/"))).await
    }

    #[tracing::instrument(name = "Get document", skip(self))]
    pub async fn get_document(&self, id: &str) -> Result<Document, ApiError> {
        let path = format!("/documents/{}", urlencoding::encode(id));
        self.fetch_json(self.http.get(self.url(&path))).await
    }

    /// Delete a document. The response body, if any, is ignored.
    #[tracing::instrument(name = "Delete document", skip(self))]
    pub async fn delete_document(&self, id: &str) -> Result<(), ApiError> {
        let path = format!("/documents/{}", urlencoding::encode(id));
        self.execute(self.http.delete(self.url(&path))).await?;
        Ok(())
    }

    #[tracing::instrument(name = "Get document status", skip(self))]
    pub async fn document_status(&self, id: &str) -> Result<DocumentStatusReport, ApiError> {
        let path = format!("/documents/{}/status", urlencoding::encode(id));
        self.fetch_json(self.http.get(self.url(&path))).await
    }

    // ── Chat ─────────────────────────────────────────

    /// Send a question. `session_id` is `None` for the first message of a conversation.
    #[tracing::instrument(name = "Chat query", skip(self, message))]
    pub async fn chat_query(
        &self,
        message: &str,
        session_id: Option<&str>,
    ) -> Result<ChatReply, ApiError> {
        let body = ChatQuery {
            message,
            session_id,
        };
        self.fetch_json(self.http.post(self.url("/chat/query")).json(&body))
            .await
    }

    #[tracing::instrument(name = "List chat sessions", skip(self))]
    pub async fn chat_sessions(&self) -> Result<Vec<ChatSession>, ApiError> {
        self.fetch_json(self.http.get(self.url("/chat/sessions"))).await
    }

    #[tracing::instrument(name = "List session messages", skip(self))]
    pub async fn chat_messages(&self, session_id: &str) -> Result<Vec<ChatMessage>, ApiError> {
        let path = format!("/chat/sessions/{}/messages", urlencoding::encode(session_id));
        self.fetch_json(self.http.get(self.url(&path))).await
    }

    // ── History ──────────────────────────────────────

    #[tracing::instrument(name = "Recent changes", skip(self))]
    pub async fn recent_changes(&self) -> Result<Vec<Change>, ApiError> {
        self.fetch_json(self.http.get(self.url("/history/recent"))).await
    }

    #[tracing::instrument(name = "Clause history", skip(self))]
    pub async fn clause_history(&self, clause_id: &str) -> Result<Vec<Change>, ApiError> {
        let path = format!("/history/clauses/{}", urlencoding::encode(clause_id));
        self.fetch_json(self.http.get(self.url(&path))).await
    }

    #[tracing::instrument(name = "Document changes", skip(self))]
    pub async fn document_changes(&self, document_id: &str) -> Result<Vec<Change>, ApiError> {
        let path = format!(
            "/history/documents/{}/changes",
            urlencoding::encode(document_id)
        );
        self.fetch_json(self.http.get(self.url(&path))).await
    }

    // ── Conflicts ────────────────────────────────────

    #[tracing::instrument(name = "List conflicts", skip(self))]
    pub async fn list_conflicts(&self) -> Result<Vec<Conflict>, ApiError> {
        self.fetch_json(self.http.get(self.url("/conflicts/"))).await
    }

    #[tracing::instrument(name = "Get conflict", skip(self))]
    pub async fn get_conflict(&self, id: &str) -> Result<Conflict, ApiError> {
        let path = format!("/conflicts/{}", urlencoding::encode(id));
        self.fetch_json(self.http.get(self.url(&path))).await
    }

    #[tracing::instrument(name = "Update conflict status", skip(self))]
    pub async fn update_conflict_status(
        &self,
        id: &str,
        status: ConflictStatus,
    ) -> Result<Conflict, ApiError> {
        let path = format!("/conflicts/{}/status", urlencoding::encode(id));
        self.fetch_json(
            self.http
                .patch(self.url(&path))
                .json(&ConflictStatusUpdate { status }),
        )
        .await
    }

    // ── Health ───────────────────────────────────────

    /// `true` when the backend answered at all; status code and body are ignored.
    pub async fn check_health(&self) -> bool {
        self.probe_health().await.is_ok()
    }

    /// Status code of `GET /health`, whatever it is. Only transport failures error.
    pub async fn probe_health(&self) -> Result<u16, ApiError> {
        let resp = self
            .http
            .get(self.url("/health"))
            .send()
            .await
            .map_err(ApiError::network)?;
        Ok(resp.status().as_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:8000/api/v1/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000/api/v1");
        assert_eq!(
            client.url("/documents/"),
            "http://localhost:8000/api/v1/documents/"
        );
    }
}
