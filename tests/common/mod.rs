#![allow(dead_code)]

use std::time::Duration;

use legalmem::cli::api_client::ApiClient;
use serde_json::{json, Value};
use wiremock::MockServer;

pub struct TestBackend {
    pub server: MockServer,
    pub client: ApiClient,
}

/// Mock backend plus a client pointed at it.
pub async fn spawn_backend() -> TestBackend {
    let server = MockServer::start().await;
    let client =
        ApiClient::new(&server.uri(), Duration::from_secs(5)).expect("Failed to build client");
    TestBackend { server, client }
}

/// Client pointed at a port nothing listens on.
pub fn unreachable_client() -> ApiClient {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    ApiClient::new(&format!("http://127.0.0.1:{}", port), Duration::from_secs(2))
        .expect("Failed to build client")
}

// ── Fixtures ─────────────────────────────────────────

pub fn document_json(id: &str, name: &str, status: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "type": "contract",
        "size": "1.2 MB",
        "uploadDate": "2024-03-12",
        "status": status
    })
}

pub fn status_json(status: &str) -> Value {
    json!({ "status": status })
}

pub fn session_json(id: &str, name: &str, last_message: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "createdAt": "2024-03-01T10:00:00Z",
        "lastMessage": last_message,
        "messageCount": 2
    })
}

pub fn message_json(id: &str, role: &str, content: &str) -> Value {
    json!({
        "id": id,
        "type": role,
        "content": content,
        "timestamp": "2024-03-01T10:00:00Z"
    })
}

pub fn change_json(id: &str, document: &str) -> Value {
    json!({
        "id": id,
        "document": document,
        "type": "analyzed",
        "description": "Clauses extracted",
        "timestamp": "2024-03-12T09:30:00Z"
    })
}

fn relationship(
    id: &str,
    kind: &str,
    a: (&str, &str),
    b: (&str, &str),
    description: &str,
    severity: &str,
) -> Value {
    json!({
        "id": id,
        "type": kind,
        "documents": [
            { "name": a.0, "section": a.1 },
            { "name": b.0, "section": b.1 }
        ],
        "description": description,
        "severity": severity,
        "status": "active"
    })
}

/// The three relationships shown on a freshly seeded backend.
pub fn sample_relationships() -> Vec<Value> {
    vec![
        relationship(
            "1",
            "conflict",
            ("Privacy Policy v2.1", "Data Retention"),
            ("Client Agreement - TechCorp", "Confidentiality"),
            "Data retention period in the privacy policy exceeds the limit agreed with the client.",
            "high",
        ),
        relationship(
            "2",
            "similarity",
            ("Employment Contract - Template", "IP Assignment"),
            ("Contractor Agreement - Smith", "Work Product"),
            "Similar intellectual property assignment language.",
            "low",
        ),
        relationship(
            "3",
            "reference",
            ("Master Service Agreement", "Liability"),
            ("SOW - Q4 Project", "Risk Allocation"),
            "Statement of work references the MSA liability cap.",
            "medium",
        ),
    ]
}

/// `sample_relationships()[index]` with its status replaced.
pub fn relationship_with_status(index: usize, status: &str) -> Value {
    let mut value = sample_relationships().remove(index);
    value["status"] = json!(status);
    value
}
