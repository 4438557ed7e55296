// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Conversation and message handlers

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::Result;
use crate::http::AppState;
use crate::store::conversations::{Conversation, ConversationStore, Message, MessageRole};

#[derive(Debug, Deserialize)]
pub struct ConversationCreate {
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MessagePage {
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    50
}

#[derive(Debug, Deserialize)]
pub struct MessageCreate {
    pub role: MessageRole,
    pub content: String,
}

pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<ConversationCreate>,
) -> Result<Json<Conversation>> {
    let conn = state.db.connect()?;
    let conversation = ConversationStore::new(&conn).create(auth.id, body.title.as_deref())?;
    Ok(Json(conversation))
}

pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<Conversation>>> {
    let conn = state.db.connect()?;
    Ok(Json(ConversationStore::new(&conn).list(auth.id)?))
}

pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Conversation>> {
    let conn = state.db.connect()?;
    Ok(Json(ConversationStore::new(&conn).get(auth.id, id)?))
}

pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>> {
    let conn = state.db.connect()?;
    ConversationStore::new(&conn).delete(auth.id, id)?;
    Ok(Json(json!({ "deleted": true })))
}

pub async fn messages(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Query(page): Query<MessagePage>,
) -> Result<Json<Vec<Message>>> {
    let conn = state.db.connect()?;
    let messages = ConversationStore::new(&conn).messages(auth.id, id, page.limit, page.offset)?;
    Ok(Json(messages))
}

pub async fn add_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<MessageCreate>,
) -> Result<Json<Message>> {
    let conn = state.db.connect()?;
    let message = ConversationStore::new(&conn).add_message(auth.id, id, body.role, &body.content)?;
    Ok(Json(message))
}
