// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Chat engine
//!
//! Classifies each message, executes recognized commands against the task
//! store, and defers everything else to the language model. The engine
//! always answers with text: store lookups that miss produce "not found"
//! phrasing, and provider failures produce an apology rather than an error.

use std::fmt::Write as _;
use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use crate::classifier::{Classifier, Command};
use crate::error::{ApiError, Result, TaskdError};
use crate::llm::{CompletionRequest, LlmProvider};
use crate::store::tasks::{TaskStore, TaskUpdate};
use crate::store::Database;

const SYSTEM_PROMPT: &str = "You are a helpful assistant integrated with a task \
management system. The user can ask you to manage their tasks using natural language.";

/// Drives one chat exchange end to end
pub struct ChatEngine {
    classifier: Classifier,
    provider: Arc<dyn LlmProvider>,
    max_tokens: u32,
    temperature: f32,
}

impl ChatEngine {
    pub fn new(provider: Arc<dyn LlmProvider>, max_tokens: u32, temperature: f32) -> Self {
        Self {
            classifier: Classifier::new(),
            provider,
            max_tokens,
            temperature,
        }
    }

    /// Answer one user message
    ///
    /// Never returns a provider error; the only error paths are storage
    /// failures. Connections are scoped so none is held across the
    /// provider await.
    pub async fn handle(
        &self,
        db: &Database,
        user_id: Uuid,
        display_name: &str,
        query: &str,
    ) -> Result<String> {
        match self.classifier.classify(query) {
            Command::Fallback => {
                let titles = {
                    let conn = db.connect()?;
                    TaskStore::new(&conn).titles(user_id)?
                };
                Ok(self.fallback(query, &titles).await)
            }
            Command::Greet | Command::Help => Ok(welcome_message(display_name)),
            Command::Usage(hint) => Ok(hint.message().to_string()),
            command => {
                let conn = db.connect()?;
                self.execute(&TaskStore::new(&conn), user_id, command)
            }
        }
    }

    /// Run a store-backed command
    fn execute(&self, store: &TaskStore<'_>, user_id: Uuid, command: Command) -> Result<String> {
        match command {
            Command::Add { title } => {
                let task = store.create(user_id, &title, None, false)?;
                Ok(format!("Added task: '{}'", task.title))
            }
            Command::List => {
                let tasks = store.list(user_id)?;
                if tasks.is_empty() {
                    return Ok("No tasks found".to_string());
                }
                let mut out = String::from("**Your Tasks:**\n");
                for (i, task) in tasks.iter().enumerate() {
                    let status = if task.completed { "[Done]" } else { "[Pending]" };
                    let _ = writeln!(out, "{}. {} {}", i + 1, status, task.title);
                }
                Ok(out)
            }
            Command::Update { target, new_title } => {
                match store.find_by_title(user_id, &target)? {
                    Some(task) => {
                        let old = task.title.clone();
                        let update = TaskUpdate {
                            title: Some(new_title.clone()),
                            ..Default::default()
                        };
                        store.update(user_id, task.id, &update)?;
                        Ok(format!("Updated task: '{old}' -> '{new_title}'"))
                    }
                    None => Ok(format!("Task with description '{target}' not found")),
                }
            }
            Command::Delete { target } => match store.find_by_title(user_id, &target)? {
                Some(task) => {
                    store.delete(user_id, task.id)?;
                    Ok(format!("Deleted task: '{}'", task.title))
                }
                None => Ok(format!("Task with description '{target}' not found")),
            },
            Command::Toggle { target } => match store.find_by_title(user_id, &target)? {
                Some(task) => {
                    let toggled = store.toggle(user_id, task.id)?;
                    let state = if toggled.completed { "completed" } else { "pending" };
                    Ok(format!("Task '{}' marked as {state}", toggled.title))
                }
                None => Ok(format!("Task with description '{target}' not found")),
            },
            // Handled in handle() before reaching the store
            Command::Greet | Command::Help | Command::Usage(_) | Command::Fallback => {
                unreachable!("non-store command dispatched to execute")
            }
        }
    }

    /// Defer an unrecognized message to the language model
    async fn fallback(&self, query: &str, titles: &[String]) -> String {
        let prompt = format!(
            "The user said: \"{query}\"\n\nCurrent tasks: {titles:?}\n\n\
             Please respond appropriately to the user's request. If they're asking \
             about tasks, you can inform them that they can add, delete, or mark \
             tasks as complete using natural language commands."
        );

        let request = CompletionRequest {
            system: Some(SYSTEM_PROMPT.to_string()),
            prompt,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        match self.provider.complete(request).await {
            Ok(response) => response.text,
            Err(err) => {
                warn!(provider = self.provider.name(), error = %err, "completion failed");
                apology_for(&err).to_string()
            }
        }
    }
}

/// Greeting and command overview
fn welcome_message(display_name: &str) -> String {
    format!(
        "Welcome {display_name}!\n\n\
         **Available Task Commands:**\n\
         - **Add Task:** Say \"add task [your task description]\"\n\
         - **Update Task:** Say \"update task [current description] to [new description]\"\n\
         - **Delete Task:** Say \"delete task [task description]\"\n\
         - **List Tasks:** Say \"list tasks\" or \"show tasks\"\n\n\
         You can also ask me general questions!\n\n\
         How can I assist you today?"
    )
}

/// User-readable text for a provider failure
fn apology_for(err: &TaskdError) -> &'static str {
    match err {
        TaskdError::Api(ApiError::AuthenticationFailed) => {
            "There's an authentication issue with the AI API key. \
             The key may be invalid or expired."
        }
        TaskdError::Api(ApiError::RateLimited(_)) | TaskdError::Api(ApiError::QuotaExceeded(_)) => {
            "You've exceeded the AI rate limit or quota. \
             Please check your account usage and billing."
        }
        TaskdError::Api(ApiError::Network(_)) | TaskdError::Api(ApiError::Timeout) => {
            "Unable to connect to the AI service. Please check your internet connection."
        }
        _ => "I'm having trouble processing your request right now. Please try again.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockProvider;
    use crate::store::test_util::{seed_user, test_database};

    fn engine(provider: MockProvider) -> ChatEngine {
        ChatEngine::new(Arc::new(provider), 200, 0.7)
    }

    async fn ask(engine: &ChatEngine, db: &Database, user_id: Uuid, query: &str) -> String {
        engine.handle(db, user_id, "Tester", query).await.unwrap()
    }

    #[tokio::test]
    async fn test_add_then_list() {
        let (_temp, db) = test_database();
        let user_id = seed_user(&db, "a@example.com");
        let engine = engine(MockProvider::default());

        let reply = ask(&engine, &db, user_id, "add task buy milk").await;
        assert_eq!(reply, "Added task: 'buy milk'");

        let listed = ask(&engine, &db, user_id, "show tasks").await;
        assert!(listed.starts_with("**Your Tasks:**"));
        assert!(listed.contains("1. [Pending] buy milk"));
    }

    #[tokio::test]
    async fn test_empty_list() {
        let (_temp, db) = test_database();
        let user_id = seed_user(&db, "a@example.com");
        let engine = engine(MockProvider::default());

        assert_eq!(ask(&engine, &db, user_id, "list tasks").await, "No tasks found");
    }

    #[tokio::test]
    async fn test_update_by_title_fragment() {
        let (_temp, db) = test_database();
        let user_id = seed_user(&db, "a@example.com");
        let engine = engine(MockProvider::default());

        ask(&engine, &db, user_id, "add task buy milk").await;
        let reply = ask(&engine, &db, user_id, "update task milk to buy oat milk").await;
        assert_eq!(reply, "Updated task: 'buy milk' -> 'buy oat milk'");
    }

    #[tokio::test]
    async fn test_delete_and_toggle_missing_target() {
        let (_temp, db) = test_database();
        let user_id = seed_user(&db, "a@example.com");
        let engine = engine(MockProvider::default());

        assert_eq!(
            ask(&engine, &db, user_id, "delete task laundry").await,
            "Task with description 'laundry' not found"
        );
        assert_eq!(
            ask(&engine, &db, user_id, "complete task laundry").await,
            "Task with description 'laundry' not found"
        );
    }

    #[tokio::test]
    async fn test_toggle_reports_new_state() {
        let (_temp, db) = test_database();
        let user_id = seed_user(&db, "a@example.com");
        let engine = engine(MockProvider::default());

        ask(&engine, &db, user_id, "add task buy milk").await;
        assert_eq!(
            ask(&engine, &db, user_id, "complete task milk").await,
            "Task 'buy milk' marked as completed"
        );
        assert_eq!(
            ask(&engine, &db, user_id, "complete task milk").await,
            "Task 'buy milk' marked as pending"
        );
    }

    #[tokio::test]
    async fn test_greeting_includes_name_and_commands() {
        let (_temp, db) = test_database();
        let user_id = seed_user(&db, "a@example.com");
        let engine = engine(MockProvider::default());

        let reply = ask(&engine, &db, user_id, "hello").await;
        assert!(reply.starts_with("Welcome Tester!"));
        assert!(reply.contains("**Available Task Commands:**"));
    }

    #[tokio::test]
    async fn test_fallback_uses_provider_and_task_context() {
        let (_temp, db) = test_database();
        let user_id = seed_user(&db, "a@example.com");
        let provider = MockProvider::with_response("It's sunny.");
        let engine = ChatEngine::new(Arc::new(provider.clone()), 200, 0.7);

        ask(&engine, &db, user_id, "add task buy milk").await;
        let reply = ask(&engine, &db, user_id, "what's the weather?").await;

        assert_eq!(reply, "It's sunny.");
        assert_eq!(provider.call_count(), 1);
        assert!(provider.recorded_requests()[0].prompt.contains("buy milk"));
    }

    #[tokio::test]
    async fn test_provider_failure_becomes_apology() {
        let (_temp, db) = test_database();
        let user_id = seed_user(&db, "a@example.com");
        let engine = engine(MockProvider::failing());

        let reply = ask(&engine, &db, user_id, "tell me a joke").await;
        assert!(reply.contains("authentication issue"));
    }

    #[tokio::test]
    async fn test_usage_hint_for_bare_verb() {
        let (_temp, db) = test_database();
        let user_id = seed_user(&db, "a@example.com");
        let engine = engine(MockProvider::default());

        let reply = ask(&engine, &db, user_id, "add task").await;
        assert!(reply.contains("Please specify a task to add"));
    }
}
