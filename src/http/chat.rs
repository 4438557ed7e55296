// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Chat endpoint

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::Result;
use crate::http::AppState;
use crate::store::conversations::{ConversationStore, MessageRole};
use crate::store::users::UserStore;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub query: String,
    /// When set, the exchange is appended to this conversation
    #[serde(default)]
    pub conversation_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<Uuid>,
}

pub async fn chat(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    let display_name = {
        let conn = state.db.connect()?;
        let user = UserStore::new(&conn).get(auth.id)?;
        user.name.unwrap_or(user.email)
    };

    let response = state
        .engine
        .handle(&state.db, auth.id, &display_name, &body.query)
        .await?;

    if let Some(conversation_id) = body.conversation_id {
        let conn = state.db.connect()?;
        let store = ConversationStore::new(&conn);
        store.add_message(auth.id, conversation_id, MessageRole::User, &body.query)?;
        store.add_message(auth.id, conversation_id, MessageRole::Assistant, &response)?;
    }

    Ok(Json(ChatResponse {
        response,
        conversation_id: body.conversation_id,
    }))
}
