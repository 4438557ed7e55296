// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Provider abstraction for language model completions

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A single-turn completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Optional system prompt establishing the assistant's role
    pub system: Option<String>,
    /// The user's message
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Token accounting reported by the provider
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// A completed response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub text: String,
    /// Model that produced the response
    pub model: String,
    pub usage: Usage,
}

/// Abstraction over language model backends
///
/// Implementations must be safe to share behind an `Arc` across request
/// handlers.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name, for logging
    fn name(&self) -> &str;

    /// Run one completion
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;
}
