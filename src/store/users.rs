// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! User storage

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use serde::Serialize;
use uuid::Uuid;

use super::{parse_datetime_from_db, parse_uuid_from_db};
use crate::error::{Result, TaskdError};

/// A registered user
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    /// Argon2id PHC string; never serialized in API responses
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// User store over a borrowed connection
pub struct UserStore<'c> {
    conn: &'c Connection,
}

fn user_from_row(row: &Row<'_>) -> std::result::Result<User, rusqlite::Error> {
    let id: String = row.get(0)?;
    let created_at: String = row.get(4)?;
    Ok(User {
        id: parse_uuid_from_db(&id, 0)?,
        email: row.get(1)?,
        password_hash: row.get(2)?,
        name: row.get(3)?,
        created_at: parse_datetime_from_db(&created_at, 4)?,
    })
}

impl<'c> UserStore<'c> {
    /// Create a store over an open connection
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Create a user; the email must not already be registered
    pub fn create(&self, email: &str, password_hash: &str, name: Option<&str>) -> Result<User> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(TaskdError::InvalidInput(
                "a valid email is required".to_string(),
            ));
        }

        if self.find_by_email(&email)?.is_some() {
            return Err(TaskdError::InvalidInput(
                "Email already registered".to_string(),
            ));
        }

        let user = User {
            id: Uuid::new_v4(),
            email,
            password_hash: password_hash.to_string(),
            name: name.map(str::to_string),
            created_at: Utc::now(),
        };

        self.conn.execute(
            "INSERT INTO users (id, email, password_hash, name, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                user.id.to_string(),
                user.email,
                user.password_hash,
                user.name,
                user.created_at.to_rfc3339(),
            ],
        )?;

        Ok(user)
    }

    /// Look up a user by email
    pub fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, email, password_hash, name, created_at FROM users WHERE email = ?1",
        )?;
        let mut rows = stmt.query_map(params![email.trim().to_lowercase()], user_from_row)?;
        match rows.next() {
            Some(user) => Ok(Some(user?)),
            None => Ok(None),
        }
    }

    /// Get a user by id
    pub fn get(&self, id: Uuid) -> Result<User> {
        let mut stmt = self.conn.prepare(
            "SELECT id, email, password_hash, name, created_at FROM users WHERE id = ?1",
        )?;
        stmt.query_row(params![id.to_string()], user_from_row)
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => {
                    TaskdError::NotFound("User not found".to_string())
                }
                other => other.into(),
            })
    }
}
