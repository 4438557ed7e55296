// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Sub-agents and the orchestrator
//!
//! Each sub-agent owns a domain keyword list. The orchestrator scores a
//! query against every agent and routes it to the highest-confidence one,
//! falling back to the default agent when no score clears the floor.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::agent::skills::{SkillInput, SkillRegistry};
use crate::llm::{CompletionRequest, LlmProvider};
use crate::store::tasks::TaskStore;
use crate::store::Database;

/// A routed request
#[derive(Debug, Clone)]
pub struct AgentRequest {
    pub query: String,
    pub user_id: Uuid,
}

/// Response from a sub-agent
#[derive(Debug, Clone, Serialize)]
pub struct AgentResponse {
    pub success: bool,
    pub message: String,
    pub data: Option<Value>,
    /// Name of the agent that produced the response
    pub agent: String,
    pub suggestions: Vec<String>,
}

impl AgentResponse {
    fn new(agent: &str, success: bool, message: impl Into<String>) -> Self {
        Self {
            success,
            message: message.into(),
            data: None,
            agent: agent.to_string(),
            suggestions: Vec::new(),
        }
    }

    fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    fn with_suggestions(mut self, suggestions: &[&str]) -> Self {
        self.suggestions = suggestions.iter().map(|s| s.to_string()).collect();
        self
    }
}

/// A specialized agent owning one domain
#[async_trait]
pub trait SubAgent: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;

    /// Keywords defining this agent's domain
    fn domains(&self) -> &[&str];

    /// Fraction of domain keywords present in the query, clamped to 1.0
    fn confidence(&self, query: &str) -> f64 {
        let domains = self.domains();
        if domains.is_empty() {
            return 0.0;
        }
        let query = query.to_lowercase();
        let matched = domains.iter().filter(|d| query.contains(*d)).count();
        (matched as f64 / domains.len() as f64).min(1.0)
    }

    async fn process(&self, request: AgentRequest) -> AgentResponse;
}

/// Summary of an agent, as exposed over the API
#[derive(Debug, Clone, Serialize)]
pub struct AgentInfo {
    pub name: String,
    pub description: String,
    pub domains: Vec<String>,
}

/// Drives the skill registry for task operations
pub struct TaskManagerAgent {
    registry: Arc<SkillRegistry>,
}

impl TaskManagerAgent {
    pub fn new(registry: Arc<SkillRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl SubAgent for TaskManagerAgent {
    fn name(&self) -> &str {
        "task_manager"
    }

    fn description(&self) -> &str {
        "Handles all task-related operations"
    }

    fn domains(&self) -> &[&str] {
        &[
            "task", "todo", "add", "delete", "update", "list", "complete", "create", "remove",
            "show", "done", "pending",
        ]
    }

    async fn process(&self, request: AgentRequest) -> AgentResponse {
        let matching = self.registry.matching(&request.query);
        let Some(skill) = matching.first() else {
            return AgentResponse::new(
                self.name(),
                false,
                "I couldn't understand that task command. Try 'help' for available commands.",
            )
            .with_suggestions(&["help", "list tasks"]);
        };

        debug!(skill = skill.name(), "task manager dispatching to skill");
        let output = skill
            .execute(SkillInput {
                query: request.query,
                user_id: request.user_id,
            })
            .await;

        AgentResponse {
            success: output.success,
            message: output.message,
            data: output.data,
            agent: self.name().to_string(),
            suggestions: output.suggestions,
        }
    }
}

/// Handles greetings, help, and thanks
pub struct ConversationAgent {
    registry: Arc<SkillRegistry>,
}

impl ConversationAgent {
    pub fn new(registry: Arc<SkillRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl SubAgent for ConversationAgent {
    fn name(&self) -> &str {
        "conversation"
    }

    fn description(&self) -> &str {
        "Handles general conversation, greetings, and help requests"
    }

    fn domains(&self) -> &[&str] {
        &[
            "hello", "hi", "hey", "help", "thanks", "thank you", "bye", "goodbye", "what", "who",
            "how",
        ]
    }

    async fn process(&self, request: AgentRequest) -> AgentResponse {
        let query = request.query.to_lowercase();
        let query = query.trim();

        let greetings = [
            "hello",
            "hi",
            "hey",
            "good morning",
            "good afternoon",
            "good evening",
        ];
        if greetings.iter().any(|g| query.contains(g)) {
            return AgentResponse::new(
                self.name(),
                true,
                "Hello! I'm your AI task management assistant. I can help you manage your \
                 tasks. What would you like to do?",
            )
            .with_suggestions(&["list tasks", "add task", "help"]);
        }

        if query.contains("help") || query.contains("command") {
            if let Some(skill) = self.registry.get("help") {
                let output = skill
                    .execute(SkillInput {
                        query: request.query.clone(),
                        user_id: request.user_id,
                    })
                    .await;
                return AgentResponse {
                    success: true,
                    message: output.message,
                    data: None,
                    agent: self.name().to_string(),
                    suggestions: output.suggestions,
                };
            }
        }

        if query.contains("thank") {
            return AgentResponse::new(
                self.name(),
                true,
                "You're welcome! Is there anything else I can help you with?",
            )
            .with_suggestions(&["list tasks", "add task"]);
        }

        AgentResponse::new(
            self.name(),
            true,
            format!(
                "I received your question: '{}'. While I specialize in task management, \
                 I'll do my best to help! For task-related commands, try 'help'.",
                request.query
            ),
        )
        .with_suggestions(&["help", "list tasks"])
    }
}

/// Reports task totals and completion rate
pub struct AnalyticsAgent {
    db: Database,
}

impl AnalyticsAgent {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SubAgent for AnalyticsAgent {
    fn name(&self) -> &str {
        "analytics"
    }

    fn description(&self) -> &str {
        "Provides insights and analytics about tasks"
    }

    fn domains(&self) -> &[&str] {
        &[
            "analytics", "stats", "statistics", "summary", "report", "how many", "count",
            "progress", "overview",
        ]
    }

    async fn process(&self, request: AgentRequest) -> AgentResponse {
        let result = self
            .db
            .connect()
            .and_then(|conn| TaskStore::new(&conn).list(request.user_id));
        let tasks = match result {
            Ok(tasks) => tasks,
            Err(e) => {
                return AgentResponse::new(
                    self.name(),
                    false,
                    format!("Error generating analytics: {e}"),
                )
            }
        };

        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.completed).count();
        let pending = total - completed;
        let completion_rate = if total > 0 {
            completed as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        let status = if pending == 0 && total > 0 {
            "Great job! All tasks are completed!".to_string()
        } else {
            format!("You have {pending} pending task(s) to work on.")
        };
        let report = format!(
            "**Task Analytics Report**\n\n\
             **Summary:**\n\
             - Total Tasks: {total}\n\
             - Completed: {completed}\n\
             - Pending: {pending}\n\
             - Completion Rate: {completion_rate:.1}%\n\n\
             **Status:**\n{status}\n"
        );

        AgentResponse::new(self.name(), true, report)
            .with_data(serde_json::json!({
                "total": total,
                "completed": completed,
                "pending": pending,
                "completion_rate": completion_rate,
            }))
            .with_suggestions(&["list tasks", "add task"])
    }
}

/// LLM-backed default agent for everything else
pub struct GeneralAgent {
    provider: Arc<dyn LlmProvider>,
    max_tokens: u32,
}

impl GeneralAgent {
    pub fn new(provider: Arc<dyn LlmProvider>, max_tokens: u32) -> Self {
        Self {
            provider,
            max_tokens,
        }
    }
}

#[async_trait]
impl SubAgent for GeneralAgent {
    fn name(&self) -> &str {
        "general_ai"
    }

    fn description(&self) -> &str {
        "Answers general questions using AI"
    }

    fn domains(&self) -> &[&str] {
        &[
            "what", "why", "how", "when", "where", "who", "explain", "tell me", "can you",
            "do you know", "weather", "news",
        ]
    }

    async fn process(&self, request: AgentRequest) -> AgentResponse {
        let completion = CompletionRequest {
            system: Some(
                "You are a helpful assistant integrated into a task management app. Keep \
                 responses concise (2-3 sentences). If the question is about tasks, remind \
                 the user they can use commands like 'add task', 'list tasks', etc."
                    .to_string(),
            ),
            prompt: request.query.clone(),
            max_tokens: self.max_tokens,
            temperature: 0.7,
        };

        match self.provider.complete(completion).await {
            Ok(response) => AgentResponse::new(self.name(), true, response.text)
                .with_suggestions(&["list tasks", "add task", "help"]),
            Err(e) => {
                debug!(error = %e, "general agent completion failed");
                AgentResponse::new(
                    self.name(),
                    true,
                    format!(
                        "I received your question: '{}'. I'm primarily a task management \
                         assistant. For task commands, type 'help'.",
                        request.query
                    ),
                )
                .with_suggestions(&["help", "list tasks", "add task"])
            }
        }
    }
}

/// Routes requests to the highest-confidence sub-agent
pub struct Orchestrator {
    agents: Vec<Arc<dyn SubAgent>>,
    default_agent: Arc<dyn SubAgent>,
    confidence_floor: f64,
}

impl Orchestrator {
    pub fn new(default_agent: Arc<dyn SubAgent>, confidence_floor: f64) -> Self {
        Self {
            agents: Vec::new(),
            default_agent,
            confidence_floor,
        }
    }

    pub fn register(&mut self, agent: Arc<dyn SubAgent>) {
        self.agents.push(agent);
    }

    /// Route a request to the best agent
    ///
    /// Ties keep the earliest-registered agent. A top score at or below the
    /// floor falls through to the default agent.
    pub async fn route(&self, request: AgentRequest) -> AgentResponse {
        let mut best: Option<(&Arc<dyn SubAgent>, f64)> = None;
        for agent in &self.agents {
            let score = agent.confidence(&request.query);
            if best.is_none() || score > best.map(|(_, s)| s).unwrap_or(0.0) {
                best = Some((agent, score));
            }
        }

        if let Some((agent, score)) = best {
            if score > self.confidence_floor {
                debug!(agent = agent.name(), score, "routing to sub-agent");
                return agent.process(request).await;
            }
        }

        debug!(agent = self.default_agent.name(), "routing to default agent");
        self.default_agent.process(request).await
    }

    pub fn list(&self) -> Vec<AgentInfo> {
        self.agents
            .iter()
            .map(|a| AgentInfo {
                name: a.name().to_string(),
                description: a.description().to_string(),
                domains: a.domains().iter().map(|d| d.to_string()).collect(),
            })
            .collect()
    }
}
