// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Registration, login, and token refresh handlers

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::{hash_password, verify_password, AuthUser, TokenPair, TokenService};
use crate::error::{Result, TaskdError};
use crate::http::AppState;
use crate::store::users::{User, UserStore};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Public view of a user
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
        }
    }
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<UserResponse>> {
    if body.password.len() < 8 {
        return Err(TaskdError::InvalidInput(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    let hash = hash_password(&body.password)?;
    let conn = state.db.connect()?;
    let user = UserStore::new(&conn).create(&body.email, &hash, body.name.as_deref())?;

    info!(user_id = %user.id, "user registered");
    Ok(Json(user.into()))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenPair>> {
    let conn = state.db.connect()?;
    let user = UserStore::new(&conn)
        .find_by_email(&body.email)?
        .ok_or_else(|| TaskdError::Unauthorized("Incorrect email or password".to_string()))?;

    if !verify_password(&body.password, &user.password_hash) {
        return Err(TaskdError::Unauthorized(
            "Incorrect email or password".to_string(),
        ));
    }

    let pair = state.tokens.issue_pair(user.id, &user.email)?;
    Ok(Json(pair))
}

pub async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> Result<Json<TokenPair>> {
    let claims = state.tokens.decode_refresh(&body.refresh_token)?;
    let user_id = TokenService::user_id(&claims)?;

    // Re-check the user still exists before minting new tokens
    let conn = state.db.connect()?;
    let user = UserStore::new(&conn)
        .get(user_id)
        .map_err(|_| TaskdError::Unauthorized("Invalid or expired token".to_string()))?;

    let pair = state.tokens.issue_pair(user.id, &user.email)?;
    Ok(Json(pair))
}

pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<UserResponse>> {
    let conn = state.db.connect()?;
    let user = UserStore::new(&conn).get(auth.id)?;
    Ok(Json(user.into()))
}
