// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Agent and tool endpoints

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::agent::{AgentRequest, AgentResponse};
use crate::auth::AuthUser;
use crate::error::Result;
use crate::http::AppState;
use crate::tools::{CallToolParams, ToolCallResult};

#[derive(Debug, Deserialize)]
pub struct AgentChatRequest {
    pub query: String,
}

/// List registered sub-agents
pub async fn list_agents(State(state): State<AppState>, _auth: AuthUser) -> Json<Value> {
    Json(json!({ "agents": state.orchestrator.list() }))
}

/// List registered skills
pub async fn list_skills(State(state): State<AppState>, _auth: AuthUser) -> Json<Value> {
    Json(json!({ "skills": state.skills.list() }))
}

/// Route a query through the orchestrator
pub async fn agent_chat(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<AgentChatRequest>,
) -> Result<Json<AgentResponse>> {
    let response = state
        .orchestrator
        .route(AgentRequest {
            query: body.query,
            user_id: auth.id,
        })
        .await;
    Ok(Json(response))
}

/// List available tools with their input schemas
pub async fn list_tools(State(state): State<AppState>, _auth: AuthUser) -> Json<Value> {
    Json(json!({ "tools": state.tools.definitions() }))
}

/// Invoke a tool by name
///
/// Unknown tools and argument failures come back as an unsuccessful result
/// with HTTP 200; only transport-level problems produce error statuses.
pub async fn call_tool(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CallToolParams>,
) -> Json<ToolCallResult> {
    Json(state.tools.call(&body.tool, auth.id, body.arguments).await)
}
