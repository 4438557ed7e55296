// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Shared application state

use std::sync::Arc;

use crate::agent::{build_orchestrator_with, Orchestrator, SkillRegistry};
use crate::auth::TokenService;
use crate::chat::ChatEngine;
use crate::config::Settings;
use crate::error::Result;
use crate::llm::{LlmProvider, OpenAiProvider};
use crate::store::Database;
use crate::tools::builtin::builtin_registry;
use crate::tools::ToolRegistry;

/// Everything a request handler can reach
///
/// The database handle is a path; each request opens and releases its own
/// connection.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub db: Database,
    pub tokens: Arc<TokenService>,
    pub engine: Arc<ChatEngine>,
    pub skills: Arc<SkillRegistry>,
    pub orchestrator: Arc<Orchestrator>,
    pub tools: Arc<ToolRegistry>,
}

impl AppState {
    /// Build state from settings with the configured OpenAI-compatible
    /// provider
    pub fn from_settings(settings: Settings, db: Database) -> Result<Self> {
        let provider = Arc::new(OpenAiProvider::from_config(
            &settings.provider,
            settings.provider_api_key(),
        ));
        Self::build(settings, db, provider)
    }

    /// Build state with an explicit provider
    pub fn build(
        settings: Settings,
        db: Database,
        provider: Arc<dyn LlmProvider>,
    ) -> Result<Self> {
        let tokens = Arc::new(TokenService::new(
            &settings.jwt_secret()?,
            settings.auth.access_ttl_minutes,
            settings.auth.refresh_ttl_days,
        ));
        let engine = Arc::new(ChatEngine::new(
            provider.clone(),
            settings.provider.max_tokens,
            settings.provider.temperature,
        ));
        let skills = Arc::new(SkillRegistry::builtin(db.clone()));
        let orchestrator = Arc::new(build_orchestrator_with(
            db.clone(),
            provider,
            skills.clone(),
            f64::from(settings.agent.confidence_floor),
            settings.provider.max_tokens,
        ));
        let tools = Arc::new(builtin_registry(db.clone()));

        Ok(Self {
            settings: Arc::new(settings),
            db,
            tokens,
            engine,
            skills,
            orchestrator,
            tools,
        })
    }
}
