// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Tool registration and dispatch

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::tools::protocol::{ToolCallResult, ToolDefinition};

/// An executable tool
#[async_trait]
pub trait ToolHandler: Send + Sync {
    fn definition(&self) -> ToolDefinition;

    /// Execute with JSON arguments on behalf of a user
    ///
    /// Argument and execution failures come back as an error result, never
    /// as a panic or transport error.
    async fn call(&self, user_id: Uuid, arguments: Value) -> ToolCallResult;
}

/// Named tool collection
///
/// Iteration order is by tool name, so listings are stable.
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, handler: Arc<dyn ToolHandler>) {
        self.tools.insert(handler.definition().name, handler);
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.definition()).collect()
    }

    /// Dispatch a call; an unknown tool name yields an error result
    pub async fn call(&self, name: &str, user_id: Uuid, arguments: Value) -> ToolCallResult {
        let Some(handler) = self.tools.get(name) else {
            return ToolCallResult::err(format!("Tool '{name}' not found"));
        };
        debug!(tool = name, "invoking tool");
        handler.call(user_id, arguments).await
    }
}
