//! Integration tests for the `legalmem` binary.

mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn legalmem_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("legalmem").expect("legalmem binary not found");
    cmd.current_dir(dir.path())
        .env_remove("LEGALMEM_API__BASE_URL")
        .env_remove("LEGALMEM_LOG_LEVEL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_views() {
    let dir = TempDir::new().unwrap();
    legalmem_cmd(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("documents"))
        .stdout(predicate::str::contains("relationships"))
        .stdout(predicate::str::contains("--api-url"));
}

#[test]
fn test_routes_prints_navigation_table() {
    let dir = TempDir::new().unwrap();
    legalmem_cmd(&dir)
        .arg("routes")
        .assert()
        .success()
        .stdout(predicate::str::contains("/legal-memory"))
        .stdout(predicate::str::contains("Relationships"));
}

#[test]
fn test_open_unknown_route_fails() {
    let dir = TempDir::new().unwrap();
    legalmem_cmd(&dir)
        .args(["open", "/settings"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown route '/settings'"));
}

#[test]
fn test_upload_without_pdf_or_docx_fails_before_request() {
    let dir = TempDir::new().unwrap();
    let notes = dir.path().join("notes.txt");
    std::fs::write(&notes, "meeting notes").unwrap();

    legalmem_cmd(&dir)
        .args(["--api-url", "http://127.0.0.1:1"])
        .args(["documents", "upload"])
        .arg(&notes)
        .assert()
        .failure()
        .stderr(predicate::str::contains("PDF or DOCX"))
        .stderr(predicate::str::contains("notes.txt"));
}

#[test]
fn test_unknown_relationship_type_is_rejected() {
    let dir = TempDir::new().unwrap();
    legalmem_cmd(&dir)
        .args(["relationships", "list", "--type", "contradiction"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown relationship type"));
}

#[test]
fn test_health_reports_unreachable_backend() {
    let dir = TempDir::new().unwrap();
    legalmem_cmd(&dir)
        .args(["--api-url", "http://127.0.0.1:1", "health"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Network error"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_dashboard_json_against_backend() {
    let server = MockServer::start().await;
    for (route, body) in [
        (
            "/documents/",
            json!([common::document_json("a", "Lease.pdf", "ready")]),
        ),
        ("/chat/sessions", json!([])),
        ("/conflicts/", Value::Array(common::sample_relationships())),
        ("/history/recent", json!([])),
    ] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;
    }

    let dir = TempDir::new().unwrap();
    let output = legalmem_cmd(&dir)
        .args(["--api-url", &server.uri(), "dashboard", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let snapshot: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(snapshot["stats"]["total_documents"], 1);
    assert_eq!(snapshot["stats"]["conflicts_found"], 1);
    assert_eq!(snapshot["stats"]["relationships"], 3);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_documents_list_empty_search_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/documents/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            common::document_json("a", "Lease.pdf", "ready")
        ])))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = legalmem_cmd(&dir)
        .args(["--api-url", &server.uri(), "documents", "list", "--search", "indemnity"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Documents (0)"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("No documents match your search."));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_chat_ask_reports_backend_failure_as_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/query"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = legalmem_cmd(&dir)
        .args(["--api-url", &server.uri(), "chat", "ask", "hi"])
        .output()
        .unwrap();
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: HTTP 500: Internal Server Error"), "{stderr}");
    assert!(!stderr.contains("Invalid argument"), "{stderr}");
    assert!(!stderr.contains("\"level\""), "log records leaked: {stderr}");
}
