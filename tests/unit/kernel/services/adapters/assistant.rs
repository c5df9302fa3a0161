use super::*;
use std::sync::mpsc;
use std::thread;

use tiny_http::{Header, Response, Server};

/// Serves `replies.len()` requests in order, reporting each request body.
fn stub_backend(replies: Vec<(u16, &'static str)>) -> (String, mpsc::Receiver<(String, String)>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let port = server.server_addr().to_ip().unwrap().port();
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for (status, body) in replies {
            let mut request = match server.recv() {
                Ok(request) => request,
                Err(_) => return,
            };
            let mut received = String::new();
            let _ = request.as_reader().read_to_string(&mut received);
            let _ = tx.send((request.url().to_string(), received));
            let response = Response::from_string(body)
                .with_status_code(status)
                .with_header(Header::from_bytes("Content-Type", "application/json").unwrap());
            let _ = request.respond(response);
        }
    });
    (format!("http://127.0.0.1:{port}/api"), rx)
}

fn assistant(base_url: String) -> HttpAssistant {
    HttpAssistant::new(&AssistantSettings {
        base_url,
        timeout_ms: 5_000,
    })
}

#[test]
fn generate_posts_camel_case_body() {
    let (base, rx) = stub_backend(vec![(200, r#"{"response":"```js\nok\n```"}"#)]);
    let bridge = assistant(base);

    let request = GenerateRequest::new("hi").with_context(Some("Active file: a.js\n".into()));
    let text = bridge.generate(&request).unwrap();
    assert_eq!(text, "```js\nok\n```");

    let (url, body) = rx.recv().unwrap();
    assert_eq!(url, "/api/ai/generate");
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["prompt"], "hi");
    assert_eq!(json["context"], "Active file: a.js\n");
    assert!(json.get("codeToModify").is_none());
}

#[test]
fn generate_sends_code_to_modify() {
    let (base, rx) = stub_backend(vec![(200, r#"{"response":"ok"}"#)]);
    let bridge = assistant(base);

    bridge
        .generate(&GenerateRequest::new("rewrite").with_code_to_modify("let a = 1;"))
        .unwrap();

    let (_, body) = rx.recv().unwrap();
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["codeToModify"], "let a = 1;");
}

#[test]
fn service_error_carries_status_and_details() {
    let (base, _rx) = stub_backend(vec![(
        500,
        r#"{"error":"Failed to generate AI response","details":"quota"}"#,
    )]);
    let bridge = assistant(base);

    let err = bridge.generate(&GenerateRequest::new("hi")).unwrap_err();
    assert_eq!(
        err,
        AssistantError::Service {
            status: 500,
            message: "Failed to generate AI response".to_string(),
            details: Some("quota".to_string()),
        }
    );
}

#[test]
fn ok_status_without_response_is_service_error() {
    let (base, _rx) = stub_backend(vec![(200, r#"{"error":"quota"}"#), (200, "{}")]);
    let bridge = assistant(base);

    for _ in 0..2 {
        match bridge.generate(&GenerateRequest::new("hi")) {
            Err(AssistantError::Service { status, message, .. }) => {
                assert_eq!(status, 200);
                assert!(message.starts_with("malformed response"));
            }
            other => panic!("unexpected result {other:?}"),
        }
    }
}

#[test]
fn unreachable_backend_is_network_error() {
    let bridge = assistant("http://127.0.0.1:9/api".to_string());
    assert!(matches!(
        bridge.generate(&GenerateRequest::new("hi")),
        Err(AssistantError::Network(_))
    ));
    assert!(!bridge.health());
}

#[test]
fn health_checks_status() {
    let (base, rx) = stub_backend(vec![(200, r#"{"status":"ok"}"#), (503, "{}")]);
    let bridge = assistant(base);

    assert!(bridge.health());
    assert!(!bridge.health());
    assert_eq!(rx.recv().unwrap().0, "/api/health");
}

#[test]
fn trailing_slash_is_trimmed() {
    let bridge = assistant("http://localhost:3001/api/".to_string());
    assert_eq!(bridge.base_url(), "http://localhost:3001/api");
}
