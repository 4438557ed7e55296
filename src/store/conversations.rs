// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Conversation and message storage for the persisted-chat surface
//!
//! Messages are ordered by creation time within a conversation; deleting a
//! conversation cascades to its messages (enforced by the schema's
//! `ON DELETE CASCADE` with per-connection foreign keys enabled).

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{parse_datetime_from_db, parse_uuid_from_db};
use crate::error::{Result, TaskdError};

/// A chat conversation owned by a user
#[derive(Debug, Clone, Serialize)]
pub struct Conversation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Message author role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

impl MessageRole {
    /// Database representation
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
            MessageRole::System => "system",
        }
    }

    fn parse(s: &str, column: usize) -> std::result::Result<Self, rusqlite::Error> {
        match s {
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            "system" => Ok(MessageRole::System),
            other => Err(rusqlite::Error::FromSqlConversionFailure(
                column,
                rusqlite::types::Type::Text,
                format!("unknown role: {other}").into(),
            )),
        }
    }
}

/// A single message within a conversation
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Conversation store over a borrowed connection
pub struct ConversationStore<'c> {
    conn: &'c Connection,
}

fn conversation_from_row(row: &Row<'_>) -> std::result::Result<Conversation, rusqlite::Error> {
    let id: String = row.get(0)?;
    let user_id: String = row.get(1)?;
    let created_at: String = row.get(3)?;
    let updated_at: String = row.get(4)?;
    Ok(Conversation {
        id: parse_uuid_from_db(&id, 0)?,
        user_id: parse_uuid_from_db(&user_id, 1)?,
        title: row.get(2)?,
        created_at: parse_datetime_from_db(&created_at, 3)?,
        updated_at: parse_datetime_from_db(&updated_at, 4)?,
    })
}

fn message_from_row(row: &Row<'_>) -> std::result::Result<Message, rusqlite::Error> {
    let id: String = row.get(0)?;
    let conversation_id: String = row.get(1)?;
    let role: String = row.get(2)?;
    let created_at: String = row.get(4)?;
    Ok(Message {
        id: parse_uuid_from_db(&id, 0)?,
        conversation_id: parse_uuid_from_db(&conversation_id, 1)?,
        role: MessageRole::parse(&role, 2)?,
        content: row.get(3)?,
        created_at: parse_datetime_from_db(&created_at, 4)?,
    })
}

impl<'c> ConversationStore<'c> {
    /// Create a store over an open connection
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Create a conversation for the given user
    pub fn create(&self, user_id: Uuid, title: Option<&str>) -> Result<Conversation> {
        let now = Utc::now();
        let conversation = Conversation {
            id: Uuid::new_v4(),
            user_id,
            title: title
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .unwrap_or("New conversation")
                .to_string(),
            created_at: now,
            updated_at: now,
        };

        self.conn.execute(
            "INSERT INTO conversations (id, user_id, title, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                conversation.id.to_string(),
                conversation.user_id.to_string(),
                conversation.title,
                conversation.created_at.to_rfc3339(),
                conversation.updated_at.to_rfc3339(),
            ],
        )?;

        Ok(conversation)
    }

    /// Get a conversation by id, if it belongs to the user
    pub fn get(&self, user_id: Uuid, id: Uuid) -> Result<Conversation> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, title, created_at, updated_at
             FROM conversations WHERE id = ?1 AND user_id = ?2",
        )?;
        stmt.query_row(
            params![id.to_string(), user_id.to_string()],
            conversation_from_row,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => {
                TaskdError::NotFound("Conversation not found".to_string())
            }
            other => other.into(),
        })
    }

    /// List a user's conversations, most recently updated first
    pub fn list(&self, user_id: Uuid) -> Result<Vec<Conversation>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, title, created_at, updated_at
             FROM conversations WHERE user_id = ?1 ORDER BY updated_at DESC",
        )?;
        let conversations = stmt
            .query_map(params![user_id.to_string()], conversation_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(conversations)
    }

    /// Delete a conversation owned by the user; messages cascade
    pub fn delete(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        let deleted = self.conn.execute(
            "DELETE FROM conversations WHERE id = ?1 AND user_id = ?2",
            params![id.to_string(), user_id.to_string()],
        )?;
        if deleted == 0 {
            return Err(TaskdError::NotFound("Conversation not found".to_string()));
        }
        Ok(())
    }

    /// Append a message to a conversation owned by the user
    ///
    /// Also bumps the conversation's `updated_at`.
    pub fn add_message(
        &self,
        user_id: Uuid,
        conversation_id: Uuid,
        role: MessageRole,
        content: &str,
    ) -> Result<Message> {
        // Ownership check doubles as the not-found path
        self.get(user_id, conversation_id)?;

        let message = Message {
            id: Uuid::new_v4(),
            conversation_id,
            role,
            content: content.to_string(),
            created_at: Utc::now(),
        };

        self.conn.execute(
            "INSERT INTO messages (id, conversation_id, role, content, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                message.id.to_string(),
                message.conversation_id.to_string(),
                message.role.as_str(),
                message.content,
                message.created_at.to_rfc3339(),
            ],
        )?;
        self.conn.execute(
            "UPDATE conversations SET updated_at = ?1 WHERE id = ?2",
            params![
                message.created_at.to_rfc3339(),
                conversation_id.to_string()
            ],
        )?;

        Ok(message)
    }

    /// Get messages for a conversation owned by the user, oldest first
    pub fn messages(
        &self,
        user_id: Uuid,
        conversation_id: Uuid,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Message>> {
        self.get(user_id, conversation_id)?;

        let mut stmt = self.conn.prepare(
            "SELECT id, conversation_id, role, content, created_at
             FROM messages WHERE conversation_id = ?1
             ORDER BY created_at ASC, rowid ASC
             LIMIT ?2 OFFSET ?3",
        )?;
        let messages = stmt
            .query_map(
                params![conversation_id.to_string(), limit, offset],
                message_from_row,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(messages)
    }

    /// Count messages in a conversation, ignoring ownership (test/diagnostic)
    pub fn message_count(&self, conversation_id: Uuid) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM messages WHERE conversation_id = ?1",
            params![conversation_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}
