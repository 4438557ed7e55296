// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Agent layer
//!
//! Skills are narrow capabilities keyed by trigger keywords; sub-agents own
//! whole domains and score incoming queries by keyword overlap. The
//! orchestrator sits on top and routes each request to the most confident
//! sub-agent, defaulting to the LLM-backed general agent.

pub mod skills;
pub mod subagents;

pub use skills::{Skill, SkillInfo, SkillInput, SkillOutput, SkillRegistry};
pub use subagents::{
    AgentInfo, AgentRequest, AgentResponse, AnalyticsAgent, ConversationAgent, GeneralAgent,
    Orchestrator, SubAgent, TaskManagerAgent,
};

use std::sync::Arc;

use crate::llm::LlmProvider;
use crate::store::Database;

/// Build the orchestrator with all built-in agents registered
pub fn build_orchestrator(
    db: Database,
    provider: Arc<dyn LlmProvider>,
    confidence_floor: f64,
    max_tokens: u32,
) -> Orchestrator {
    let registry = Arc::new(SkillRegistry::builtin(db.clone()));
    build_orchestrator_with(db, provider, registry, confidence_floor, max_tokens)
}

/// Build the orchestrator over an existing skill registry
pub fn build_orchestrator_with(
    db: Database,
    provider: Arc<dyn LlmProvider>,
    registry: Arc<SkillRegistry>,
    confidence_floor: f64,
    max_tokens: u32,
) -> Orchestrator {
    let general = Arc::new(GeneralAgent::new(provider, max_tokens));

    let mut orchestrator = Orchestrator::new(general.clone(), confidence_floor);
    orchestrator.register(Arc::new(TaskManagerAgent::new(registry.clone())));
    orchestrator.register(Arc::new(ConversationAgent::new(registry)));
    orchestrator.register(Arc::new(AnalyticsAgent::new(db)));
    orchestrator.register(general);
    orchestrator
}
