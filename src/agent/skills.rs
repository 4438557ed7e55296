// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Skill-based capabilities
//!
//! A skill is one narrow capability with its own trigger keywords. The
//! registry matches a query against every skill's keywords and returns the
//! candidates sorted by priority, so broad skills like greeting can be
//! outranked by the task skills.

use async_trait::async_trait;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crate::store::tasks::{TaskStore, TaskUpdate};
use crate::store::Database;

/// Input handed to a skill
#[derive(Debug, Clone)]
pub struct SkillInput {
    pub query: String,
    pub user_id: Uuid,
}

/// Result of a skill execution
///
/// Failures are data, not errors: a skill that cannot act reports
/// `success: false` with a user-readable message.
#[derive(Debug, Clone, Serialize)]
pub struct SkillOutput {
    pub success: bool,
    pub message: String,
    pub data: Option<Value>,
    pub suggestions: Vec<String>,
}

impl SkillOutput {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
            suggestions: Vec::new(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            suggestions: Vec::new(),
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_suggestions(mut self, suggestions: &[&str]) -> Self {
        self.suggestions = suggestions.iter().map(|s| s.to_string()).collect();
        self
    }
}

/// One narrow capability with trigger keywords
#[async_trait]
pub trait Skill: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn keywords(&self) -> &[&str];

    /// Higher priority skills are preferred when several match
    fn priority(&self) -> i32 {
        0
    }

    /// True when any keyword appears in the query
    fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.keywords().iter().any(|kw| query.contains(kw))
    }

    async fn execute(&self, input: SkillInput) -> SkillOutput;
}

/// Summary of a skill, as exposed over the API
#[derive(Debug, Clone, Serialize)]
pub struct SkillInfo {
    pub name: String,
    pub description: String,
    pub keywords: Vec<String>,
}

/// Holds every registered skill in registration order
#[derive(Default)]
pub struct SkillRegistry {
    skills: Vec<Arc<dyn Skill>>,
}

impl SkillRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, skill: Arc<dyn Skill>) {
        self.skills.push(skill);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Skill>> {
        self.skills.iter().find(|s| s.name() == name).cloned()
    }

    /// Skills matching the query, highest priority first
    ///
    /// The sort is stable, so equal priorities keep registration order.
    pub fn matching(&self, query: &str) -> Vec<Arc<dyn Skill>> {
        let mut matched: Vec<_> = self
            .skills
            .iter()
            .filter(|s| s.matches(query))
            .cloned()
            .collect();
        matched.sort_by_key(|s| std::cmp::Reverse(s.priority()));
        matched
    }

    pub fn list(&self) -> Vec<SkillInfo> {
        self.skills
            .iter()
            .map(|s| SkillInfo {
                name: s.name().to_string(),
                description: s.description().to_string(),
                keywords: s.keywords().iter().map(|k| k.to_string()).collect(),
            })
            .collect()
    }

    /// Registry with all built-in skills
    pub fn builtin(db: Database) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(CreateTaskSkill::new(db.clone())));
        registry.register(Arc::new(ListTasksSkill::new(db.clone())));
        registry.register(Arc::new(DeleteTaskSkill::new(db.clone())));
        registry.register(Arc::new(UpdateTaskSkill::new(db.clone())));
        registry.register(Arc::new(ToggleTaskSkill::new(db)));
        registry.register(Arc::new(HelpSkill));
        registry.register(Arc::new(GreetingSkill));
        registry
    }
}

/// Creates a task from "add task <description>" phrasing
pub struct CreateTaskSkill {
    db: Database,
    pattern: Regex,
}

impl CreateTaskSkill {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            pattern: Regex::new(r"(?:add|create|new|make)\s+(?:a\s+)?task\s+(.+)").unwrap(),
        }
    }
}

#[async_trait]
impl Skill for CreateTaskSkill {
    fn name(&self) -> &str {
        "task_creation"
    }

    fn description(&self) -> &str {
        "Creates new tasks from natural language input"
    }

    fn keywords(&self) -> &[&str] {
        &["add task", "create task", "new task", "make task", "add a task"]
    }

    fn priority(&self) -> i32 {
        10
    }

    async fn execute(&self, input: SkillInput) -> SkillOutput {
        let query = input.query.to_lowercase();
        let Some(caps) = self.pattern.captures(&query) else {
            return SkillOutput::failed(
                "Please specify a task to add. Format: 'add task <description>'",
            )
            .with_suggestions(&["add task buy groceries", "create task finish report"]);
        };
        let title = caps[1].trim();

        let result = self.db.connect().and_then(|conn| {
            TaskStore::new(&conn).create(input.user_id, title, None, false)
        });
        match result {
            Ok(task) => SkillOutput::ok(format!("Added task: '{}'", task.title))
                .with_data(serde_json::to_value(&task).unwrap_or(Value::Null)),
            Err(e) => SkillOutput::failed(format!("Error adding task: {e}")),
        }
    }
}

/// Lists the caller's tasks with completion markers
pub struct ListTasksSkill {
    db: Database,
}

impl ListTasksSkill {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Skill for ListTasksSkill {
    fn name(&self) -> &str {
        "task_listing"
    }

    fn description(&self) -> &str {
        "Lists all tasks with their status"
    }

    fn keywords(&self) -> &[&str] {
        &["list tasks", "show tasks", "my tasks", "get tasks", "all tasks", "view tasks"]
    }

    fn priority(&self) -> i32 {
        10
    }

    async fn execute(&self, input: SkillInput) -> SkillOutput {
        let result = self
            .db
            .connect()
            .and_then(|conn| TaskStore::new(&conn).list(input.user_id));
        let tasks = match result {
            Ok(tasks) => tasks,
            Err(e) => return SkillOutput::failed(format!("Error retrieving tasks: {e}")),
        };

        if tasks.is_empty() {
            return SkillOutput::ok("No tasks found. Start by adding a new task!")
                .with_data(Value::Array(Vec::new()))
                .with_suggestions(&["add task buy groceries"]);
        }

        let mut message = String::from("**Your Tasks:**\n");
        for (i, task) in tasks.iter().enumerate() {
            let status = if task.completed { "[Done]" } else { "[Pending]" };
            message.push_str(&format!("{}. {} {}\n", i + 1, status, task.title));
        }
        SkillOutput::ok(message).with_data(serde_json::to_value(&tasks).unwrap_or(Value::Null))
    }
}

/// Deletes the first task whose title matches the given fragment
pub struct DeleteTaskSkill {
    db: Database,
    pattern: Regex,
}

impl DeleteTaskSkill {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            pattern: Regex::new(r"(?:delete|remove)\s+(?:task\s+)?(.+)").unwrap(),
        }
    }
}

#[async_trait]
impl Skill for DeleteTaskSkill {
    fn name(&self) -> &str {
        "task_deletion"
    }

    fn description(&self) -> &str {
        "Deletes tasks by description"
    }

    fn keywords(&self) -> &[&str] {
        &["delete task", "remove task", "delete", "remove"]
    }

    fn priority(&self) -> i32 {
        10
    }

    async fn execute(&self, input: SkillInput) -> SkillOutput {
        let query = input.query.to_lowercase();
        let Some(caps) = self.pattern.captures(&query) else {
            return SkillOutput::failed(
                "Please specify which task to delete. Format: 'delete task <description>'",
            )
            .with_suggestions(&["delete task grocery shopping"]);
        };
        let fragment = caps[1].trim();

        let conn = match self.db.connect() {
            Ok(conn) => conn,
            Err(e) => return SkillOutput::failed(format!("Error: {e}")),
        };
        let store = TaskStore::new(&conn);

        match store.find_by_title(input.user_id, fragment) {
            Ok(Some(task)) => match store.delete(input.user_id, task.id) {
                Ok(()) => SkillOutput::ok(format!("Deleted task: '{}'", task.title))
                    .with_data(serde_json::to_value(&task).unwrap_or(Value::Null)),
                Err(e) => SkillOutput::failed(format!("Error deleting task: {e}")),
            },
            Ok(None) => SkillOutput::failed(format!("Task containing '{fragment}' not found"))
                .with_suggestions(&["list tasks"]),
            Err(e) => SkillOutput::failed(format!("Error: {e}")),
        }
    }
}

/// Renames a task identified by a title fragment
pub struct UpdateTaskSkill {
    db: Database,
    pattern: Regex,
}

impl UpdateTaskSkill {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            pattern: Regex::new(r"(?:update|change|modify|edit|rename)\s+task\s+(.+?)\s+to\s+(.+)")
                .unwrap(),
        }
    }
}

#[async_trait]
impl Skill for UpdateTaskSkill {
    fn name(&self) -> &str {
        "task_update"
    }

    fn description(&self) -> &str {
        "Updates task titles and descriptions"
    }

    fn keywords(&self) -> &[&str] {
        &["update task", "change task", "modify task", "edit task", "rename task"]
    }

    fn priority(&self) -> i32 {
        10
    }

    async fn execute(&self, input: SkillInput) -> SkillOutput {
        let query = input.query.to_lowercase();
        let Some(caps) = self.pattern.captures(&query) else {
            return SkillOutput::failed(
                "Please specify the task to update. Format: 'update task <current> to <new>'",
            )
            .with_suggestions(&["update task old name to new name"]);
        };
        let current = caps[1].trim();
        let new_title = caps[2].trim();

        let conn = match self.db.connect() {
            Ok(conn) => conn,
            Err(e) => return SkillOutput::failed(format!("Error: {e}")),
        };
        let store = TaskStore::new(&conn);

        match store.find_by_title(input.user_id, current) {
            Ok(Some(task)) => {
                let update = TaskUpdate {
                    title: Some(new_title.to_string()),
                    ..Default::default()
                };
                match store.update(input.user_id, task.id, &update) {
                    Ok(updated) => {
                        SkillOutput::ok(format!("Updated task: '{current}' -> '{new_title}'"))
                            .with_data(serde_json::to_value(&updated).unwrap_or(Value::Null))
                    }
                    Err(e) => SkillOutput::failed(format!("Error updating task: {e}")),
                }
            }
            Ok(None) => SkillOutput::failed(format!("Task containing '{current}' not found"))
                .with_suggestions(&["list tasks"]),
            Err(e) => SkillOutput::failed(format!("Error: {e}")),
        }
    }
}

/// Flips completion on a task identified by a title fragment
pub struct ToggleTaskSkill {
    db: Database,
    pattern: Regex,
}

impl ToggleTaskSkill {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            pattern: Regex::new(
                r"(?:complete|finish|toggle|mark\s+done|mark\s+pending|done)\s+(?:task\s+)?(.+)",
            )
            .unwrap(),
        }
    }
}

#[async_trait]
impl Skill for ToggleTaskSkill {
    fn name(&self) -> &str {
        "task_toggle"
    }

    fn description(&self) -> &str {
        "Toggles task completion status"
    }

    fn keywords(&self) -> &[&str] {
        &[
            "complete task",
            "finish task",
            "mark done",
            "toggle task",
            "uncomplete task",
            "mark pending",
            "done",
        ]
    }

    fn priority(&self) -> i32 {
        10
    }

    async fn execute(&self, input: SkillInput) -> SkillOutput {
        let query = input.query.to_lowercase();
        let Some(caps) = self.pattern.captures(&query) else {
            return SkillOutput::failed(
                "Please specify which task to toggle. Format: 'complete task <description>'",
            )
            .with_suggestions(&["complete task grocery shopping"]);
        };
        let fragment = caps[1].trim();

        let conn = match self.db.connect() {
            Ok(conn) => conn,
            Err(e) => return SkillOutput::failed(format!("Error: {e}")),
        };
        let store = TaskStore::new(&conn);

        match store.find_by_title(input.user_id, fragment) {
            Ok(Some(task)) => match store.toggle(input.user_id, task.id) {
                Ok(updated) => {
                    let status = if updated.completed { "completed" } else { "pending" };
                    SkillOutput::ok(format!("Task '{}' marked as {status}", updated.title))
                        .with_data(serde_json::to_value(&updated).unwrap_or(Value::Null))
                }
                Err(e) => SkillOutput::failed(format!("Error toggling task: {e}")),
            },
            Ok(None) => SkillOutput::failed(format!("Task containing '{fragment}' not found"))
                .with_suggestions(&["list tasks"]),
            Err(e) => SkillOutput::failed(format!("Error: {e}")),
        }
    }
}

/// Lists available commands
pub struct HelpSkill;

#[async_trait]
impl Skill for HelpSkill {
    fn name(&self) -> &str {
        "help"
    }

    fn description(&self) -> &str {
        "Provides help and lists available commands"
    }

    fn keywords(&self) -> &[&str] {
        &["help", "commands", "what can you do", "how to", "usage"]
    }

    fn priority(&self) -> i32 {
        5
    }

    async fn execute(&self, _input: SkillInput) -> SkillOutput {
        let message = "**Task Management Assistant**\n\n\
            **Available Commands:**\n\
            - **Add Task:** \"add task <description>\"\n\
            - **List Tasks:** \"list tasks\" or \"show tasks\"\n\
            - **Delete Task:** \"delete task <description>\"\n\
            - **Update Task:** \"update task <old> to <new>\"\n\
            - **Complete Task:** \"complete task <description>\"\n\n\
            **Examples:**\n\
            - \"add task buy groceries\"\n\
            - \"list tasks\"\n\
            - \"delete task groceries\"\n\
            - \"update task groceries to buy organic groceries\"\n\
            - \"complete task groceries\"\n";
        SkillOutput::ok(message).with_suggestions(&["list tasks", "add task example"])
    }
}

/// Answers greetings
pub struct GreetingSkill;

#[async_trait]
impl Skill for GreetingSkill {
    fn name(&self) -> &str {
        "greeting"
    }

    fn description(&self) -> &str {
        "Responds to user greetings"
    }

    fn keywords(&self) -> &[&str] {
        &["hello", "hi", "hey", "good morning", "good afternoon", "good evening"]
    }

    fn priority(&self) -> i32 {
        1
    }

    async fn execute(&self, _input: SkillInput) -> SkillOutput {
        SkillOutput::ok(
            "Hello! I'm your task management assistant. How can I help you today?",
        )
        .with_suggestions(&["list tasks", "add task", "help"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_util::{seed_user, test_database};

    fn input(user_id: Uuid, query: &str) -> SkillInput {
        SkillInput {
            query: query.to_string(),
            user_id,
        }
    }

    #[tokio::test]
    async fn test_create_and_list_skills() {
        let (_temp, db) = test_database();
        let user_id = seed_user(&db, "a@example.com");
        let registry = SkillRegistry::builtin(db);

        let create = registry.get("task_creation").unwrap();
        let out = create.execute(input(user_id, "add task buy milk")).await;
        assert!(out.success);
        assert_eq!(out.message, "Added task: 'buy milk'");

        let list = registry.get("task_listing").unwrap();
        let out = list.execute(input(user_id, "list tasks")).await;
        assert!(out.success);
        assert!(out.message.contains("1. [Pending] buy milk"));
    }

    #[tokio::test]
    async fn test_delete_missing_task_fails_softly() {
        let (_temp, db) = test_database();
        let user_id = seed_user(&db, "a@example.com");
        let registry = SkillRegistry::builtin(db);

        let delete = registry.get("task_deletion").unwrap();
        let out = delete.execute(input(user_id, "delete task laundry")).await;
        assert!(!out.success);
        assert_eq!(out.message, "Task containing 'laundry' not found");
        assert_eq!(out.suggestions, vec!["list tasks"]);
    }

    #[tokio::test]
    async fn test_toggle_skill_reports_state() {
        let (_temp, db) = test_database();
        let user_id = seed_user(&db, "a@example.com");
        let registry = SkillRegistry::builtin(db);

        registry
            .get("task_creation")
            .unwrap()
            .execute(input(user_id, "add task buy milk"))
            .await;
        let out = registry
            .get("task_toggle")
            .unwrap()
            .execute(input(user_id, "complete task milk"))
            .await;
        assert!(out.success);
        assert_eq!(out.message, "Task 'buy milk' marked as completed");
    }

    #[tokio::test]
    async fn test_matching_sorts_by_priority() {
        let (_temp, db) = test_database();
        let registry = SkillRegistry::builtin(db);

        // "add task" matches the creation skill; nothing lower outranks it
        let matched = registry.matching("add task buy milk");
        assert_eq!(matched[0].name(), "task_creation");

        // "help" reaches the help skill only
        let matched = registry.matching("help");
        assert_eq!(matched[0].name(), "help");
    }

    #[tokio::test]
    async fn test_update_skill_requires_to_separator() {
        let (_temp, db) = test_database();
        let user_id = seed_user(&db, "a@example.com");
        let registry = SkillRegistry::builtin(db);

        let out = registry
            .get("task_update")
            .unwrap()
            .execute(input(user_id, "update task groceries"))
            .await;
        assert!(!out.success);
        assert!(out.message.contains("Format:"));
    }

    #[test]
    fn test_list_exposes_all_builtin_skills() {
        let (_temp, db) = test_database();
        let registry = SkillRegistry::builtin(db);
        let names: Vec<_> = registry.list().into_iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec![
                "task_creation",
                "task_listing",
                "task_deletion",
                "task_update",
                "task_toggle",
                "help",
                "greeting"
            ]
        );
    }
}
