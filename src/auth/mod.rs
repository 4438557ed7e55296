// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Authentication: password hashing, JWT tokens, bearer extraction

pub mod password;
pub mod token;

pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenPair, TokenService, TOKEN_TYPE_ACCESS, TOKEN_TYPE_REFRESH};

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::error::TaskdError;
use crate::http::AppState;

/// The authenticated caller, extracted from a bearer access token
///
/// Stateless: the token itself carries the user id and email, so no
/// database lookup happens during extraction.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = TaskdError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| TaskdError::Unauthorized("Not authenticated".to_string()))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| TaskdError::Unauthorized("Not authenticated".to_string()))?;

        let claims = state.tokens.decode_access(token)?;
        let id = TokenService::user_id(&claims)?;

        Ok(AuthUser {
            id,
            email: claims.email,
        })
    }
}
