// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Task CRUD handlers

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::Result;
use crate::http::AppState;
use crate::store::tasks::{Task, TaskStore, TaskUpdate};

#[derive(Debug, Deserialize)]
pub struct TaskCreate {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

pub async fn list(State(state): State<AppState>, auth: AuthUser) -> Result<Json<Vec<Task>>> {
    let conn = state.db.connect()?;
    Ok(Json(TaskStore::new(&conn).list(auth.id)?))
}

pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<TaskCreate>,
) -> Result<Json<Task>> {
    let conn = state.db.connect()?;
    let task = TaskStore::new(&conn).create(
        auth.id,
        &body.title,
        body.description.as_deref(),
        body.completed,
    )?;
    Ok(Json(task))
}

pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Task>> {
    let conn = state.db.connect()?;
    Ok(Json(TaskStore::new(&conn).get(auth.id, id)?))
}

pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<TaskUpdate>,
) -> Result<Json<Task>> {
    let conn = state.db.connect()?;
    Ok(Json(TaskStore::new(&conn).update(auth.id, id, &body)?))
}

pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>> {
    let conn = state.db.connect()?;
    TaskStore::new(&conn).delete(auth.id, id)?;
    Ok(Json(json!({ "deleted": true })))
}

pub async fn toggle(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Task>> {
    let conn = state.db.connect()?;
    Ok(Json(TaskStore::new(&conn).toggle(auth.id, id)?))
}
