//! Legal Memory chat: one conversation's transcript plus the session list.

use crate::cli::api_client::ApiClient;
use crate::cli::error::ApiError;
use crate::cli::store::EntityStore;
use crate::models::{ChatMessage, ChatSession};

/// Questions offered when a conversation is empty.
pub const EXAMPLE_QUERIES: [&str; 4] = [
    "Have we already agreed to something like this liability cap?",
    "What was our fallback the last time we negotiated termination rights?",
    "Are there any conflicts between our privacy policy and client contracts?",
    "Show me all documents that mention intellectual property clauses",
];

pub struct ChatConversation {
    client: ApiClient,
    session_id: Option<String>,
    messages: Vec<ChatMessage>,
    sessions: EntityStore<ChatSession>,
    last_error: Option<ApiError>,
}

impl ChatConversation {
    pub fn new(client: ApiClient, sessions: EntityStore<ChatSession>) -> Self {
        Self {
            client,
            session_id: None,
            messages: Vec::new(),
            sessions,
            last_error: None,
        }
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub async fn sessions(&self) -> Vec<ChatSession> {
        self.sessions.snapshot().await
    }

    /// Message of the error behind the last fallback reply.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_ref().map(|err| err.message.as_str())
    }

    pub fn take_error(&mut self) -> Option<ApiError> {
        self.last_error.take()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Forget the current transcript; the next message opens a new session.
    pub fn new_conversation(&mut self) {
        self.session_id = None;
        self.messages.clear();
        self.last_error = None;
    }

    pub async fn refresh_sessions(&self) -> Result<Vec<ChatSession>, ApiError> {
        let sessions = self.client.chat_sessions().await?;
        self.sessions.set_all(sessions.clone()).await;
        Ok(sessions)
    }

    /// Switch to an existing session and load its transcript.
    pub async fn open_session(&mut self, session_id: &str) -> Result<&[ChatMessage], ApiError> {
        let messages = self.client.chat_messages(session_id).await?;
        self.session_id = Some(session_id.to_string());
        self.messages = messages;
        self.last_error = None;
        Ok(&self.messages)
    }

    /// Send `input` and append the reply.
    ///
    /// Blank input is ignored and returns `None`. On failure a local
    /// assistant message describing the error is appended instead, and the
    /// error is kept in [`last_error`](Self::last_error).
    pub async fn send(&mut self, input: &str) -> Option<&ChatMessage> {
        let text = input.trim();
        if text.is_empty() {
            return None;
        }

        self.last_error = None;
        self.messages.push(ChatMessage::user(text));
        tracing::debug!(session_id = ?self.session_id, "sending chat query");

        match self.client.chat_query(text, self.session_id.as_deref()).await {
            Ok(reply) => {
                let is_new_session = self.session_id.as_deref() != Some(reply.session_id.as_str());
                self.messages.push(reply.message);

                if is_new_session {
                    tracing::info!(session_id = %reply.session_id, "started chat session");
                    self.session_id = Some(reply.session_id);
                    if let Err(err) = self.refresh_sessions().await {
                        tracing::warn!("failed to refresh chat sessions: {}", err);
                    }
                }
            }
            Err(err) => {
                tracing::warn!("chat query failed: {}", err);
                self.messages.push(ChatMessage::local_assistant(format!(
                    "Sorry, I couldn't process your question: {err}"
                )));
                self.last_error = Some(err);
            }
        }

        self.messages.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use std::time::Duration;

    fn offline() -> ChatConversation {
        let client = ApiClient::new("http://127.0.0.1:9", Duration::from_millis(50)).unwrap();
        ChatConversation::new(client, EntityStore::new())
    }

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let mut chat = offline();
        assert!(chat.send("   \n").await.is_none());
        assert!(chat.messages().is_empty());
    }

    #[tokio::test]
    async fn test_failure_appends_fallback_and_keeps_error() {
        let mut chat = offline();
        let reply = chat.send("  What is the notice period?  ").await.unwrap().clone();

        assert_eq!(reply.role, Role::Assistant);
        assert!(reply.content.contains("Network error"));

        let messages = chat.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[0].content, "What is the notice period?");
        assert!(chat.last_error().unwrap().starts_with("Network error"));
        assert!(chat.session_id().is_none());

        chat.new_conversation();
        assert!(chat.messages().is_empty());
        assert!(chat.last_error().is_none());
    }
}
