// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! HTTP interface
//!
//! All routes speak JSON. Everything except `/health`, registration, login,
//! and refresh requires a bearer access token.

pub mod agent;
pub mod auth;
pub mod chat;
pub mod conversations;
pub mod error;
pub mod state;
pub mod tasks;

pub use state::AppState;

use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde_json::{json, Value};

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "features": {
            "tools": true,
            "skills": true,
            "subagents": true,
            "chat_persistence": true,
        },
    }))
}

/// Assemble the full application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/me", get(auth::me))
        .route("/tasks", get(tasks::list).post(tasks::create))
        .route(
            "/tasks/{id}",
            get(tasks::get).put(tasks::update).delete(tasks::delete),
        )
        .route("/tasks/{id}/toggle", patch(tasks::toggle))
        .route("/chat", post(chat::chat))
        .route(
            "/conversations",
            get(conversations::list).post(conversations::create),
        )
        .route(
            "/conversations/{id}",
            get(conversations::get).delete(conversations::delete),
        )
        .route(
            "/conversations/{id}/messages",
            get(conversations::messages).post(conversations::add_message),
        )
        .route("/agent/agents", get(agent::list_agents))
        .route("/agent/skills", get(agent::list_skills))
        .route("/agent/chat", post(agent::agent_chat))
        .route("/tools", get(agent::list_tools))
        .route("/tools/call", post(agent::call_tool))
        .with_state(state)
}
