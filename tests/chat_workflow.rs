mod common;

use legalmem::cli::chat::ChatConversation;
use legalmem::cli::filters::filter_sessions;
use legalmem::cli::store::EntityStore;
use legalmem::models::Role;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn first_reply_adopts_session_and_refreshes_list() {
    let backend = common::spawn_backend().await;
    Mock::given(method("POST"))
        .and(path("/chat/query"))
        .and(body_json(json!({ "message": "Do we cap liability?" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": {
                "id": "m1",
                "type": "assistant",
                "content": "Yes, at twelve months of fees.",
                "timestamp": "2024-03-01T10:00:05Z",
                "sources": [{ "document": "Master Service Agreement", "page": 4, "relevance": 0.92 }]
            },
            "sessionId": "s-new"
        })))
        .expect(1)
        .mount(&backend.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/chat/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            common::session_json("s-new", "Liability", "Do we cap liability?")
        ])))
        .expect(1)
        .mount(&backend.server)
        .await;

    let mut chat = ChatConversation::new(backend.client.clone(), EntityStore::new());
    let reply = chat.send("Do we cap liability?").await.unwrap().clone();

    assert_eq!(reply.role, Role::Assistant);
    assert_eq!(reply.sources().len(), 1);
    assert_eq!(chat.session_id(), Some("s-new"));
    assert_eq!(chat.messages().len(), 2);
    assert_eq!(chat.messages()[0].role, Role::User);
    assert_eq!(chat.sessions().await.len(), 1);
    assert!(chat.last_error().is_none());
}

#[tokio::test]
async fn follow_up_sends_session_and_skips_refresh() {
    let backend = common::spawn_backend().await;
    Mock::given(method("POST"))
        .and(path("/chat/query"))
        .and(body_json(json!({ "message": "And termination?", "sessionId": "s1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": common::message_json("m3", "assistant", "Thirty days notice."),
            "sessionId": "s1"
        })))
        .expect(1)
        .mount(&backend.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/chat/sessions/s1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            common::message_json("m1", "user", "Do we cap liability?"),
            common::message_json("m2", "assistant", "Yes."),
        ])))
        .mount(&backend.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/chat/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&backend.server)
        .await;

    let mut chat = ChatConversation::new(backend.client.clone(), EntityStore::new());
    chat.open_session("s1").await.unwrap();
    chat.send("And termination?").await.unwrap();

    assert_eq!(chat.messages().len(), 4);
    assert_eq!(chat.messages()[3].content, "Thirty days notice.");
}

#[tokio::test]
async fn backend_error_becomes_assistant_message() {
    let backend = common::spawn_backend().await;
    Mock::given(method("POST"))
        .and(path("/chat/query"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&backend.server)
        .await;

    let mut chat = ChatConversation::new(backend.client.clone(), EntityStore::new());
    let reply = chat.send("Anything?").await.unwrap().clone();

    assert_eq!(reply.role, Role::Assistant);
    assert!(reply.content.contains("HTTP 502"));
    assert_eq!(chat.last_error(), Some("HTTP 502: Bad Gateway"));
    assert!(chat.session_id().is_none());

    let err = chat.take_error().unwrap();
    assert_eq!(err.status, 502);
    assert!(chat.last_error().is_none());
}

#[tokio::test]
async fn reply_timestamp_without_offset_is_accepted() {
    let backend = common::spawn_backend().await;
    Mock::given(method("POST"))
        .and(path("/chat/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": {
                "id": "m1",
                "type": "assistant",
                "content": "Yes.",
                "timestamp": "2024-03-01T10:00:05.123456"
            },
            "sessionId": "s1"
        })))
        .mount(&backend.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/chat/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&backend.server)
        .await;

    let mut chat = ChatConversation::new(backend.client.clone(), EntityStore::new());
    let reply = chat.send("Is the cap mutual?").await.unwrap().clone();

    assert_eq!(reply.content, "Yes.");
    assert_eq!(reply.role, Role::Assistant);
    assert_eq!(chat.session_id(), Some("s1"));
    assert!(chat.last_error().is_none());
}

#[tokio::test]
async fn new_session_lands_in_shared_store() {
    let backend = common::spawn_backend().await;
    Mock::given(method("POST"))
        .and(path("/chat/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": common::message_json("m1", "assistant", "Thirty days."),
            "sessionId": "s9"
        })))
        .mount(&backend.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/chat/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            common::session_json("s9", "Notice", "Notice period?")
        ])))
        .mount(&backend.server)
        .await;

    let sessions = EntityStore::new();
    let mut revisions = sessions.subscribe();
    let mut chat = ChatConversation::new(backend.client.clone(), sessions.clone());
    chat.send("Notice period?").await.unwrap();

    assert!(revisions.has_changed().unwrap());
    assert_eq!(sessions.get("s9").await.unwrap().name, "Notice");
}

#[tokio::test]
async fn session_search_is_case_insensitive() {
    let backend = common::spawn_backend().await;
    Mock::given(method("GET"))
        .and(path("/chat/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            common::session_json("s1", "Liability caps", "What is our cap?"),
            common::session_json("s2", "Termination", "Notice periods in the MSA"),
        ])))
        .mount(&backend.server)
        .await;

    let sessions = backend.client.chat_sessions().await.unwrap();
    let hits = filter_sessions(&sessions, "msa");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "s2");
    assert!(filter_sessions(&sessions, "indemnity").is_empty());
}
