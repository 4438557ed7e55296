// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! SQLite-backed storage for tasks, users, and conversations
//!
//! Each request opens its own [`Connection`] through [`Database::connect`];
//! consistency for single-row mutations relies on SQLite's transaction
//! guarantees, with no in-process locking. UUIDs and timestamps are stored
//! as TEXT (RFC 3339 for timestamps).

pub mod conversations;
pub mod tasks;
pub mod users;

pub use conversations::{Conversation, ConversationStore, Message, MessageRole};
pub use tasks::{Task, TaskStore, TaskUpdate};
pub use users::{User, UserStore};

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use uuid::Uuid;

use crate::error::Result;

/// Handle to the SQLite database file
///
/// Cheap to clone; connections are opened per request.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    /// Create a handle for the database at the given path
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Open a new connection with foreign keys enabled
    ///
    /// Foreign keys must be enabled per connection for the
    /// conversation-to-message delete cascade to apply.
    pub fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(conn)
    }

    /// Create all tables and indices if they do not exist
    pub fn init(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = self.connect()?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                name TEXT,
                created_at TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS tasks (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT,
                completed INTEGER NOT NULL DEFAULT 0,
                user_id TEXT NOT NULL REFERENCES users(id),
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_tasks_user_id ON tasks(user_id);
            CREATE TABLE IF NOT EXISTS conversations (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id),
                title TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_conversations_user_id ON conversations(user_id);
            CREATE TABLE IF NOT EXISTS messages (
                id TEXT PRIMARY KEY,
                conversation_id TEXT NOT NULL
                    REFERENCES conversations(id) ON DELETE CASCADE,
                role TEXT NOT NULL,
                content TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_messages_conversation_id
                ON messages(conversation_id);",
        )?;
        Ok(())
    }
}

/// Parse a UUID from a database string, converting errors to rusqlite errors
pub(crate) fn parse_uuid_from_db(
    id: &str,
    column: usize,
) -> std::result::Result<Uuid, rusqlite::Error> {
    Uuid::parse_str(id).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Parse a DateTime from a database RFC3339 string, converting errors to rusqlite errors
pub(crate) fn parse_datetime_from_db(
    timestamp: &str,
    column: usize,
) -> std::result::Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                column,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })
}
