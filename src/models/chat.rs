use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// A document passage the assistant cited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceCitation {
    pub document: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    pub relevance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    #[serde(rename = "type", alias = "role")]
    pub role: Role,
    pub content: String,
    /// As sent by the backend; offsets are optional.
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<SourceCitation>>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self::local(Role::User, content.into())
    }

    /// Assistant message produced on this side, e.g. when the backend is unreachable.
    pub fn local_assistant(content: impl Into<String>) -> Self {
        Self::local(Role::Assistant, content.into())
    }

    fn local(role: Role, content: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            content,
            timestamp: Utc::now().to_rfc3339(),
            sources: None,
        }
    }

    /// `HH:MM` in local time, or the raw timestamp when it does not parse.
    pub fn display_time(&self) -> String {
        super::local_time(&self.timestamp, "%H:%M")
    }

    pub fn sources(&self) -> &[SourceCitation] {
        self.sources.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: String,
    pub name: String,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message: Option<String>,
    // Shape unconfirmed by the backend; kept for display only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_count: Option<u64>,
}

/// Body of `POST /chat/query`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatQuery<'a> {
    pub message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<&'a str>,
}

/// Response of `POST /chat/query`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub message: ChatMessage,
    pub session_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_omits_missing_session() {
        let body = serde_json::to_value(ChatQuery {
            message: "hello",
            session_id: None,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "message": "hello" }));

        let body = serde_json::to_value(ChatQuery {
            message: "hello",
            session_id: Some("s-1"),
        })
        .unwrap();
        assert_eq!(body["sessionId"], "s-1");
    }

    #[test]
    fn test_message_accepts_type_or_role_key() {
        let by_type: ChatMessage = serde_json::from_value(serde_json::json!({
            "id": "m1",
            "type": "assistant",
            "content": "Clause 4 conflicts with the policy.",
            "timestamp": "2024-05-01T10:00:00Z",
            "sources": [{ "document": "Privacy Policy v2.1", "page": 3, "relevance": 0.92 }]
        }))
        .unwrap();
        assert_eq!(by_type.role, Role::Assistant);
        assert_eq!(by_type.sources().len(), 1);
        assert_eq!(by_type.sources()[0].page, Some(3));

        let by_role: ChatMessage = serde_json::from_value(serde_json::json!({
            "id": "m2",
            "role": "user",
            "content": "hi",
            "timestamp": "2024-05-01T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(by_role.role, Role::User);
        assert!(by_role.sources().is_empty());
    }

    #[test]
    fn test_message_timestamp_without_offset_decodes() {
        let message: ChatMessage = serde_json::from_value(serde_json::json!({
            "id": "m3",
            "type": "assistant",
            "content": "Yes.",
            "timestamp": "2024-03-01T10:00:05.123456"
        }))
        .unwrap();
        assert_eq!(message.timestamp, "2024-03-01T10:00:05.123456");
        assert_eq!(message.display_time().len(), "10:00".len());
    }

    #[test]
    fn test_session_message_count_is_optional() {
        let s: ChatSession = serde_json::from_value(serde_json::json!({
            "id": "s1",
            "name": "Retention review",
            "createdAt": "2024-05-01T09:00:00Z"
        }))
        .unwrap();
        assert!(s.message_count.is_none());
        assert!(s.last_message.is_none());
    }
}
