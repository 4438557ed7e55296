// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Built-in task tools

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::Result;
use crate::store::tasks::{Task, TaskStore, TaskUpdate};
use crate::store::Database;
use crate::tools::protocol::{ToolCallResult, ToolDefinition, ToolParameter};
use crate::tools::registry::{ToolHandler, ToolRegistry};

/// Registry with every built-in task tool registered
pub fn builtin_registry(db: Database) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(GetTasksTool { db: db.clone() }));
    registry.register(Arc::new(CreateTaskTool { db: db.clone() }));
    registry.register(Arc::new(UpdateTaskTool { db: db.clone() }));
    registry.register(Arc::new(DeleteTaskTool { db: db.clone() }));
    registry.register(Arc::new(ToggleTaskTool { db }));
    registry
}

fn to_result(outcome: Result<Value>) -> ToolCallResult {
    match outcome {
        Ok(value) => ToolCallResult::ok(value),
        Err(e) => ToolCallResult::err(e.to_string()),
    }
}

fn task_json(task: &Task) -> Result<Value> {
    Ok(serde_json::to_value(task)?)
}

fn parse_args<T: for<'de> Deserialize<'de>>(arguments: Value) -> std::result::Result<T, String> {
    // Treat an omitted arguments object as empty
    let arguments = if arguments.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        arguments
    };
    serde_json::from_value(arguments).map_err(|e| format!("Invalid arguments: {e}"))
}

fn parse_task_id(raw: &str) -> std::result::Result<Uuid, String> {
    Uuid::parse_str(raw).map_err(|_| format!("Invalid task_id: '{raw}'"))
}

/// Lists every task of the calling user
pub struct GetTasksTool {
    db: Database,
}

#[async_trait]
impl ToolHandler for GetTasksTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new("get_tasks", "Retrieve all tasks from the todo list", Vec::new())
    }

    async fn call(&self, user_id: Uuid, _arguments: Value) -> ToolCallResult {
        to_result(self.db.connect().and_then(|conn| {
            let tasks = TaskStore::new(&conn).list(user_id)?;
            Ok(serde_json::to_value(tasks)?)
        }))
    }
}

#[derive(Deserialize)]
struct CreateTaskArgs {
    title: String,
    #[serde(default)]
    description: Option<String>,
}

/// Creates a task
pub struct CreateTaskTool {
    db: Database,
}

#[async_trait]
impl ToolHandler for CreateTaskTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "create_task",
            "Create a new task",
            vec![
                ToolParameter::required("title", "string", "Task title"),
                ToolParameter::optional("description", "string", "Task description"),
            ],
        )
    }

    async fn call(&self, user_id: Uuid, arguments: Value) -> ToolCallResult {
        let args: CreateTaskArgs = match parse_args(arguments) {
            Ok(args) => args,
            Err(e) => return ToolCallResult::err(e),
        };
        to_result(self.db.connect().and_then(|conn| {
            let task = TaskStore::new(&conn).create(
                user_id,
                &args.title,
                args.description.as_deref(),
                false,
            )?;
            task_json(&task)
        }))
    }
}

#[derive(Deserialize)]
struct UpdateTaskArgs {
    task_id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// Updates title or description of a task
pub struct UpdateTaskTool {
    db: Database,
}

#[async_trait]
impl ToolHandler for UpdateTaskTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "update_task",
            "Update an existing task",
            vec![
                ToolParameter::required("task_id", "string", "Task ID"),
                ToolParameter::optional("title", "string", "New title"),
                ToolParameter::optional("description", "string", "New description"),
            ],
        )
    }

    async fn call(&self, user_id: Uuid, arguments: Value) -> ToolCallResult {
        let args: UpdateTaskArgs = match parse_args(arguments) {
            Ok(args) => args,
            Err(e) => return ToolCallResult::err(e),
        };
        let task_id = match parse_task_id(&args.task_id) {
            Ok(id) => id,
            Err(e) => return ToolCallResult::err(e),
        };
        let update = TaskUpdate {
            title: args.title,
            description: args.description,
            completed: None,
        };
        to_result(self.db.connect().and_then(|conn| {
            let task = TaskStore::new(&conn).update(user_id, task_id, &update)?;
            task_json(&task)
        }))
    }
}

#[derive(Deserialize)]
struct TaskIdArgs {
    task_id: String,
}

/// Deletes a task
pub struct DeleteTaskTool {
    db: Database,
}

#[async_trait]
impl ToolHandler for DeleteTaskTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "delete_task",
            "Delete a task",
            vec![ToolParameter::required("task_id", "string", "Task ID")],
        )
    }

    async fn call(&self, user_id: Uuid, arguments: Value) -> ToolCallResult {
        let args: TaskIdArgs = match parse_args(arguments) {
            Ok(args) => args,
            Err(e) => return ToolCallResult::err(e),
        };
        let task_id = match parse_task_id(&args.task_id) {
            Ok(id) => id,
            Err(e) => return ToolCallResult::err(e),
        };
        to_result(self.db.connect().and_then(|conn| {
            TaskStore::new(&conn).delete(user_id, task_id)?;
            Ok(serde_json::json!({"deleted": true}))
        }))
    }
}

/// Flips completion on a task
pub struct ToggleTaskTool {
    db: Database,
}

#[async_trait]
impl ToolHandler for ToggleTaskTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "toggle_task",
            "Toggle task completion status",
            vec![ToolParameter::required("task_id", "string", "Task ID")],
        )
    }

    async fn call(&self, user_id: Uuid, arguments: Value) -> ToolCallResult {
        let args: TaskIdArgs = match parse_args(arguments) {
            Ok(args) => args,
            Err(e) => return ToolCallResult::err(e),
        };
        let task_id = match parse_task_id(&args.task_id) {
            Ok(id) => id,
            Err(e) => return ToolCallResult::err(e),
        };
        to_result(self.db.connect().and_then(|conn| {
            let task = TaskStore::new(&conn).toggle(user_id, task_id)?;
            task_json(&task)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_util::{seed_user, test_database};

    #[tokio::test]
    async fn test_create_then_get_tasks() {
        let (_temp, db) = test_database();
        let user_id = seed_user(&db, "a@example.com");
        let registry = builtin_registry(db);

        let created = registry
            .call(
                "create_task",
                user_id,
                serde_json::json!({"title": "buy milk"}),
            )
            .await;
        assert!(created.success);
        assert_eq!(created.result.as_ref().unwrap()["title"], "buy milk");

        let listed = registry.call("get_tasks", user_id, Value::Null).await;
        assert!(listed.success);
        assert_eq!(listed.result.unwrap().as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_and_toggle_roundtrip() {
        let (_temp, db) = test_database();
        let user_id = seed_user(&db, "a@example.com");
        let registry = builtin_registry(db);

        let created = registry
            .call("create_task", user_id, serde_json::json!({"title": "draft"}))
            .await;
        let task_id = created.result.unwrap()["id"].as_str().unwrap().to_string();

        let updated = registry
            .call(
                "update_task",
                user_id,
                serde_json::json!({"task_id": task_id, "title": "final"}),
            )
            .await;
        assert!(updated.success);
        assert_eq!(updated.result.unwrap()["title"], "final");

        let toggled = registry
            .call("toggle_task", user_id, serde_json::json!({"task_id": task_id}))
            .await;
        assert!(toggled.success);
        assert_eq!(toggled.result.unwrap()["completed"], true);
    }

    #[tokio::test]
    async fn test_delete_missing_task_is_error_result() {
        let (_temp, db) = test_database();
        let user_id = seed_user(&db, "a@example.com");
        let registry = builtin_registry(db);

        let result = registry
            .call(
                "delete_task",
                user_id,
                serde_json::json!({"task_id": Uuid::new_v4().to_string()}),
            )
            .await;
        assert!(!result.success);
        assert!(result.error.unwrap().contains("not found"));
    }

    #[tokio::test]
    async fn test_malformed_arguments_are_error_results() {
        let (_temp, db) = test_database();
        let user_id = seed_user(&db, "a@example.com");
        let registry = builtin_registry(db);

        let missing_title = registry
            .call("create_task", user_id, serde_json::json!({}))
            .await;
        assert!(!missing_title.success);
        assert!(missing_title.error.unwrap().starts_with("Invalid arguments"));

        let bad_id = registry
            .call("toggle_task", user_id, serde_json::json!({"task_id": "xyz"}))
            .await;
        assert!(!bad_id.success);
        assert!(bad_id.error.unwrap().contains("Invalid task_id"));
    }

    #[tokio::test]
    async fn test_tools_are_user_scoped() {
        let (_temp, db) = test_database();
        let alice = seed_user(&db, "alice@example.com");
        let bob = seed_user(&db, "bob@example.com");
        let registry = builtin_registry(db);

        let created = registry
            .call("create_task", alice, serde_json::json!({"title": "secret"}))
            .await;
        let task_id = created.result.unwrap()["id"].as_str().unwrap().to_string();

        let stolen = registry
            .call("delete_task", bob, serde_json::json!({"task_id": task_id}))
            .await;
        assert!(!stolen.success);
    }
}
