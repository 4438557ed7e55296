// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Task storage
//!
//! All operations are scoped by the owning user: a task is visible and
//! mutable only through its owner's id.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{parse_datetime_from_db, parse_uuid_from_db};
use crate::error::{Result, TaskdError};

/// A to-do item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique id
    pub id: Uuid,
    /// Non-empty title
    pub title: String,
    /// Optional free-text description
    pub description: Option<String>,
    /// Completion flag
    pub completed: bool,
    /// Owning user
    pub user_id: Uuid,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Partial update for a task; unset fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

impl TaskUpdate {
    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.completed.is_none()
    }
}

/// Task store over a borrowed connection
pub struct TaskStore<'c> {
    conn: &'c Connection,
}

const TASK_COLUMNS: &str = "id, title, description, completed, user_id, created_at";

fn task_from_row(row: &Row<'_>) -> std::result::Result<Task, rusqlite::Error> {
    let id: String = row.get(0)?;
    let user_id: String = row.get(4)?;
    let created_at: String = row.get(5)?;
    Ok(Task {
        id: parse_uuid_from_db(&id, 0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        completed: row.get(3)?,
        user_id: parse_uuid_from_db(&user_id, 4)?,
        created_at: parse_datetime_from_db(&created_at, 5)?,
    })
}

impl<'c> TaskStore<'c> {
    /// Create a store over an open connection
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Create a task for the given user
    pub fn create(
        &self,
        user_id: Uuid,
        title: &str,
        description: Option<&str>,
        completed: bool,
    ) -> Result<Task> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TaskdError::InvalidInput(
                "title must not be empty".to_string(),
            ));
        }

        let task = Task {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: description.map(str::to_string),
            completed,
            user_id,
            created_at: Utc::now(),
        };

        self.conn.execute(
            "INSERT INTO tasks (id, title, description, completed, user_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                task.id.to_string(),
                task.title,
                task.description,
                task.completed,
                task.user_id.to_string(),
                task.created_at.to_rfc3339(),
            ],
        )?;

        Ok(task)
    }

    /// List all tasks for a user, newest first
    pub fn list(&self, user_id: Uuid) -> Result<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = ?1 ORDER BY created_at DESC"
        ))?;
        let tasks = stmt
            .query_map(params![user_id.to_string()], task_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    /// List the titles of a user's tasks in creation order
    ///
    /// Used as context for the LLM fallback prompt.
    pub fn titles(&self, user_id: Uuid) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT title FROM tasks WHERE user_id = ?1 ORDER BY created_at ASC, rowid ASC",
        )?;
        let titles = stmt
            .query_map(params![user_id.to_string()], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(titles)
    }

    /// Get a task by id, if it belongs to the user
    pub fn get(&self, user_id: Uuid, id: Uuid) -> Result<Task> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1 AND user_id = ?2"
        ))?;
        stmt.query_row(params![id.to_string(), user_id.to_string()], task_from_row)
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => {
                    TaskdError::NotFound("Task not found".to_string())
                }
                other => other.into(),
            })
    }

    /// Apply a partial update to a task owned by the user
    pub fn update(&self, user_id: Uuid, id: Uuid, update: &TaskUpdate) -> Result<Task> {
        if update.is_empty() {
            return Err(TaskdError::InvalidInput("No fields to update".to_string()));
        }
        if let Some(title) = &update.title {
            if title.trim().is_empty() {
                return Err(TaskdError::InvalidInput(
                    "title must not be empty".to_string(),
                ));
            }
        }

        // Read first so a missing row surfaces as NotFound before any write
        let mut task = self.get(user_id, id)?;

        if let Some(title) = &update.title {
            task.title = title.trim().to_string();
        }
        if let Some(description) = &update.description {
            task.description = Some(description.clone());
        }
        if let Some(completed) = update.completed {
            task.completed = completed;
        }

        self.conn.execute(
            "UPDATE tasks SET title = ?1, description = ?2, completed = ?3
             WHERE id = ?4 AND user_id = ?5",
            params![
                task.title,
                task.description,
                task.completed,
                id.to_string(),
                user_id.to_string(),
            ],
        )?;

        Ok(task)
    }

    /// Delete a task owned by the user
    pub fn delete(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        let deleted = self.conn.execute(
            "DELETE FROM tasks WHERE id = ?1 AND user_id = ?2",
            params![id.to_string(), user_id.to_string()],
        )?;
        if deleted == 0 {
            return Err(TaskdError::NotFound("Task not found".to_string()));
        }
        Ok(())
    }

    /// Flip the completion flag of a task owned by the user
    pub fn toggle(&self, user_id: Uuid, id: Uuid) -> Result<Task> {
        let updated = self.conn.execute(
            "UPDATE tasks SET completed = NOT completed WHERE id = ?1 AND user_id = ?2",
            params![id.to_string(), user_id.to_string()],
        )?;
        if updated == 0 {
            return Err(TaskdError::NotFound("Task not found".to_string()));
        }
        self.get(user_id, id)
    }

    /// Find the first of the user's tasks whose title contains the fragment,
    /// case-insensitively, in creation order
    pub fn find_by_title(&self, user_id: Uuid, fragment: &str) -> Result<Option<Task>> {
        let pattern = format!("%{}%", fragment.trim());
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks
             WHERE user_id = ?1 AND title LIKE ?2
             ORDER BY created_at ASC, rowid ASC
             LIMIT 1"
        ))?;
        let mut rows = stmt.query_map(params![user_id.to_string(), pattern], task_from_row)?;
        match rows.next() {
            Some(task) => Ok(Some(task?)),
            None => Ok(None),
        }
    }
}
