// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! JWT issuance and validation
//!
//! HS256 tokens with a `type` claim distinguishing short-lived access
//! tokens from long-lived refresh tokens. A refresh token presented where
//! an access token is expected (or vice versa) is rejected.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, TaskdError};

/// Token kind, carried in the `type` claim
pub const TOKEN_TYPE_ACCESS: &str = "access";
/// Token kind, carried in the `type` claim
pub const TOKEN_TYPE_REFRESH: &str = "refresh";

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    /// User email
    pub email: String,
    /// Expiry, seconds since epoch
    pub exp: i64,
    /// "access" or "refresh"
    #[serde(rename = "type")]
    pub token_type: String,
}

/// Access/refresh token pair returned by the auth endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

/// Issues and validates JWTs for one signing secret
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    /// Create a service with the given secret and lifetimes
    pub fn new(secret: &str, access_ttl_minutes: i64, refresh_ttl_days: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl: Duration::minutes(access_ttl_minutes),
            refresh_ttl: Duration::days(refresh_ttl_days),
        }
    }

    fn issue(&self, user_id: Uuid, email: &str, token_type: &str, ttl: Duration) -> Result<String> {
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            exp: (Utc::now() + ttl).timestamp(),
            token_type: token_type.to_string(),
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| TaskdError::Unauthorized(format!("token issuance failed: {e}")))
    }

    /// Issue an access/refresh pair for a user
    pub fn issue_pair(&self, user_id: Uuid, email: &str) -> Result<TokenPair> {
        Ok(TokenPair {
            access_token: self.issue(user_id, email, TOKEN_TYPE_ACCESS, self.access_ttl)?,
            refresh_token: self.issue(user_id, email, TOKEN_TYPE_REFRESH, self.refresh_ttl)?,
            token_type: "bearer".to_string(),
            expires_in: self.access_ttl.num_seconds(),
        })
    }

    /// Decode and validate a token, checking signature and expiry
    pub fn decode(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| TaskdError::Unauthorized("Invalid or expired token".to_string()))
    }

    /// Decode a token, requiring the access type
    pub fn decode_access(&self, token: &str) -> Result<Claims> {
        let claims = self.decode(token)?;
        if claims.token_type != TOKEN_TYPE_ACCESS {
            return Err(TaskdError::Unauthorized("Invalid token type".to_string()));
        }
        Ok(claims)
    }

    /// Decode a token, requiring the refresh type
    pub fn decode_refresh(&self, token: &str) -> Result<Claims> {
        let claims = self.decode(token)?;
        if claims.token_type != TOKEN_TYPE_REFRESH {
            return Err(TaskdError::Unauthorized("Invalid token type".to_string()));
        }
        Ok(claims)
    }

    /// Parse the subject claim as a user id
    pub fn user_id(claims: &Claims) -> Result<Uuid> {
        Uuid::parse_str(&claims.sub)
            .map_err(|_| TaskdError::Unauthorized("Invalid token subject".to_string()))
    }
}
