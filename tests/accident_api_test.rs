// Integration tests for the accident control client against a mock HTTP API
//
// The mock mirrors the simulation server: start/stop answer
// {"message": ...} and a 400 with a plain-text reason when the request does
// not match the current accident state.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;
use std::sync::{Arc, Mutex};
use storeview::control::{AccidentAction, AccidentClient, AccidentError, AccidentToggle};
use tokio::net::TcpListener;

#[derive(Default)]
struct MockServer {
    running: Mutex<bool>,
}

async fn start_accidents(State(server): State<Arc<MockServer>>) -> Response {
    let mut running = server.running.lock().unwrap();
    if *running {
        return (StatusCode::BAD_REQUEST, "Аварии уже запущены\n").into_response();
    }
    *running = true;
    Json(json!({"message": "Аварии запущены"})).into_response()
}

async fn stop_accidents(State(server): State<Arc<MockServer>>) -> Response {
    let mut running = server.running.lock().unwrap();
    if !*running {
        return (StatusCode::BAD_REQUEST, "Аварии не запущены\n").into_response();
    }
    *running = false;
    Json(json!({"message": "Аварии остановлены"})).into_response()
}

async fn spawn_server() -> String {
    let app = Router::new()
        .route("/api/accidents/start", post(start_accidents))
        .route("/api/accidents/stop", post(stop_accidents))
        .route("/broken/api/accidents/start", post(|| async { "not json" }))
        .with_state(Arc::new(MockServer::default()));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

// ── Success path ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_start_then_stop() {
    let base = spawn_server().await;
    let client = AccidentClient::new(&base);

    let message = client.send(AccidentAction::Start).await.unwrap();
    assert_eq!(message, "Аварии запущены");

    let message = client.send(AccidentAction::Stop).await.unwrap();
    assert_eq!(message, "Аварии остановлены");
}

// ── Server rejections surface as errors ──────────────────────────────────────

#[tokio::test]
async fn test_stop_when_not_running_is_rejected() {
    let base = spawn_server().await;
    let client = AccidentClient::new(&base);

    let err = client.send(AccidentAction::Stop).await.unwrap_err();
    match err {
        AccidentError::Rejected { status, body } => {
            assert_eq!(status, 400);
            assert_eq!(body.trim(), "Аварии не запущены");
        }
        other => panic!("Expected Rejected, got {:?}", other),
    }
}

#[tokio::test]
async fn test_double_start_is_rejected() {
    let base = spawn_server().await;
    let client = AccidentClient::new(&base);

    client.send(AccidentAction::Start).await.unwrap();
    let err = client.send(AccidentAction::Start).await.unwrap_err();
    assert!(matches!(err, AccidentError::Rejected { status: 400, .. }));
}

#[tokio::test]
async fn test_non_json_body_is_bad_body() {
    let base = spawn_server().await;
    let client = AccidentClient::new(&format!("{}/broken", base));

    let err = client.send(AccidentAction::Start).await.unwrap_err();
    assert!(matches!(err, AccidentError::BadBody(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_request_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = AccidentClient::new(&format!("http://{}", addr));
    let err = client.send(AccidentAction::Start).await.unwrap_err();
    assert!(matches!(err, AccidentError::Request(_)));
}

// ── Toggle only flips on success ─────────────────────────────────────────────

#[tokio::test]
async fn test_toggle_follows_server_outcome() {
    let base = spawn_server().await;
    let client = AccidentClient::new(&base);
    let mut toggle = AccidentToggle::new();

    let action = toggle.begin().unwrap();
    let result = client.send(action).await;
    toggle.finish(action, &result);
    assert_eq!(toggle.label(), "Stop accidents");

    // Another client stops accidents behind our back
    client.send(AccidentAction::Stop).await.unwrap();

    let action = toggle.begin().unwrap();
    assert_eq!(action, AccidentAction::Stop);
    let result = client.send(action).await;
    toggle.finish(action, &result);

    assert!(result.is_err());
    assert_eq!(toggle.label(), "Stop accidents");
}
