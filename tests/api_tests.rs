// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! End-to-end API tests over the assembled router

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use taskd::config::Settings;
use taskd::http::{router, AppState};
use taskd::llm::MockProvider;
use taskd::store::Database;

fn test_app() -> (TempDir, Router) {
    test_app_with_provider(MockProvider::with_response("mock answer"))
}

fn test_app_with_provider(provider: MockProvider) -> (TempDir, Router) {
    let temp = TempDir::new().expect("tempdir");
    let db = Database::new(temp.path().join("taskd.db"));
    db.init().expect("init schema");

    let mut settings = Settings::default();
    settings.auth.secret = Some("integration-test-secret".to_string());

    let state = AppState::build(settings, db, Arc::new(provider)).expect("state");
    (temp, router(state))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn register_and_login(app: &Router, email: &str) -> String {
    let (status, _) = send(
        app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({"email": email, "password": "hunter2pass", "name": "Tester"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({"email": email, "password": "hunter2pass"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["access_token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let (_temp, app) = test_app();
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let (_temp, app) = test_app();

    let (status, _) = send(&app, Method::GET, "/tasks", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::GET, "/tasks", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_token_rejected_as_access_token() {
    let (_temp, app) = test_app();
    register_and_login(&app, "refresh@example.com").await;

    let (_, body) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({"email": "refresh@example.com", "password": "hunter2pass"})),
    )
    .await;
    let refresh_token = body["refresh_token"].as_str().unwrap();

    let (status, _) = send(&app, Method::GET, "/tasks", Some(refresh_token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // But it does mint a new pair at the refresh endpoint
    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/refresh",
        None,
        Some(json!({"refresh_token": refresh_token})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["access_token"].is_string());
}

#[tokio::test]
async fn test_register_duplicate_email_is_client_error() {
    let (_temp, app) = test_app();
    register_and_login(&app, "dup@example.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({"email": "dup@example.com", "password": "hunter2pass"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .contains("Email already registered"));
}

#[tokio::test]
async fn test_me_returns_profile() {
    let (_temp, app) = test_app();
    let token = register_and_login(&app, "me@example.com").await;

    let (status, body) = send(&app, Method::GET, "/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "me@example.com");
    assert_eq!(body["name"], "Tester");
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_task_crud_lifecycle() {
    let (_temp, app) = test_app();
    let token = register_and_login(&app, "crud@example.com").await;

    let (status, task) = send(
        &app,
        Method::POST,
        "/tasks",
        Some(&token),
        Some(json!({"title": "buy milk", "description": "two liters"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = task["id"].as_str().unwrap().to_string();
    assert_eq!(task["completed"], false);

    let (status, listed) = send(&app, Method::GET, "/tasks", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/tasks/{id}"),
        Some(&token),
        Some(json!({"title": "buy oat milk"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "buy oat milk");

    let (status, toggled) = send(
        &app,
        Method::PATCH,
        &format!("/tasks/{id}/toggle"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(toggled["completed"], true);

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/tasks/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/tasks/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Task not found");
}

#[tokio::test]
async fn test_empty_update_is_bad_request() {
    let (_temp, app) = test_app();
    let token = register_and_login(&app, "empty@example.com").await;

    let (_, task) = send(
        &app,
        Method::POST,
        "/tasks",
        Some(&token),
        Some(json!({"title": "untouched"})),
    )
    .await;
    let id = task["id"].as_str().unwrap();

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/tasks/{id}"),
        Some(&token),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_tasks_are_isolated_between_users() {
    let (_temp, app) = test_app();
    let alice = register_and_login(&app, "alice@example.com").await;
    let bob = register_and_login(&app, "bob@example.com").await;

    let (_, task) = send(
        &app,
        Method::POST,
        "/tasks",
        Some(&alice),
        Some(json!({"title": "alice only"})),
    )
    .await;
    let id = task["id"].as_str().unwrap();

    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/tasks/{id}"),
        Some(&bob),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, listed) = send(&app, Method::GET, "/tasks", Some(&bob), None).await;
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_chat_commands_reconcile_with_task_api() {
    let (_temp, app) = test_app();
    let token = register_and_login(&app, "chat@example.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/chat",
        Some(&token),
        Some(json!({"query": "add task water the plants"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "Added task: 'water the plants'");

    let (_, listed) = send(&app, Method::GET, "/tasks", Some(&token), None).await;
    assert_eq!(listed[0]["title"], "water the plants");

    let (_, body) = send(
        &app,
        Method::POST,
        "/chat",
        Some(&token),
        Some(json!({"query": "complete task plants"})),
    )
    .await;
    assert_eq!(body["response"], "Task 'water the plants' marked as completed");

    let (_, listed) = send(&app, Method::GET, "/tasks", Some(&token), None).await;
    assert_eq!(listed[0]["completed"], true);
}

#[tokio::test]
async fn test_chat_fallback_uses_provider() {
    let (_temp, app) = test_app_with_provider(MockProvider::with_response("Paris."));
    let token = register_and_login(&app, "fallback@example.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/chat",
        Some(&token),
        Some(json!({"query": "capital of france?"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "Paris.");
}

#[tokio::test]
async fn test_chat_provider_failure_is_apology_not_error() {
    let (_temp, app) = test_app_with_provider(MockProvider::failing());
    let token = register_and_login(&app, "apology@example.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/chat",
        Some(&token),
        Some(json!({"query": "tell me a story"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["response"]
        .as_str()
        .unwrap()
        .contains("authentication issue"));
}

#[tokio::test]
async fn test_chat_persists_into_conversation() {
    let (_temp, app) = test_app();
    let token = register_and_login(&app, "persist@example.com").await;

    let (_, conversation) = send(
        &app,
        Method::POST,
        "/conversations",
        Some(&token),
        Some(json!({"title": "Errands"})),
    )
    .await;
    let conversation_id = conversation["id"].as_str().unwrap();

    let (status, _) = send(
        &app,
        Method::POST,
        "/chat",
        Some(&token),
        Some(json!({
            "query": "add task mow the lawn",
            "conversation_id": conversation_id,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, messages) = send(
        &app,
        Method::GET,
        &format!("/conversations/{conversation_id}/messages"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let messages = messages.as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "user");
    assert_eq!(messages[0]["content"], "add task mow the lawn");
    assert_eq!(messages[1]["role"], "assistant");
    assert_eq!(messages[1]["content"], "Added task: 'mow the lawn'");
}

#[tokio::test]
async fn test_conversation_delete_removes_messages() {
    let (_temp, app) = test_app();
    let token = register_and_login(&app, "convdel@example.com").await;

    let (_, conversation) = send(
        &app,
        Method::POST,
        "/conversations",
        Some(&token),
        Some(json!({})),
    )
    .await;
    let id = conversation["id"].as_str().unwrap();
    assert_eq!(conversation["title"], "New conversation");

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/conversations/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/conversations/{id}/messages"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_agent_listing_and_routing() {
    let (_temp, app) = test_app();
    let token = register_and_login(&app, "agent@example.com").await;

    let (status, body) = send(&app, Method::GET, "/agent/agents", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = body["agents"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec!["task_manager", "conversation", "analytics", "general_ai"]
    );

    let (status, body) = send(&app, Method::GET, "/agent/skills", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["skills"].as_array().unwrap().len(), 7);

    let (status, body) = send(
        &app,
        Method::POST,
        "/agent/chat",
        Some(&token),
        Some(json!({"query": "add task sweep the floor"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["agent"], "task_manager");
    assert_eq!(body["message"], "Added task: 'sweep the floor'");
}

#[tokio::test]
async fn test_tool_listing_and_call() {
    let (_temp, app) = test_app();
    let token = register_and_login(&app, "tools@example.com").await;

    let (status, body) = send(&app, Method::GET, "/tools", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = body["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            "create_task",
            "delete_task",
            "get_tasks",
            "toggle_task",
            "update_task"
        ]
    );

    let (status, result) = send(
        &app,
        Method::POST,
        "/tools/call",
        Some(&token),
        Some(json!({"tool": "create_task", "arguments": {"title": "via tool"}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["success"], true);
    assert_eq!(result["result"]["title"], "via tool");
}

#[tokio::test]
async fn test_unknown_tool_is_error_result_not_http_failure() {
    let (_temp, app) = test_app();
    let token = register_and_login(&app, "unknown@example.com").await;

    let (status, result) = send(
        &app,
        Method::POST,
        "/tools/call",
        Some(&token),
        Some(json!({"tool": "self_destruct", "arguments": {}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["success"], false);
    assert_eq!(result["error"], "Tool 'self_destruct' not found");
}
