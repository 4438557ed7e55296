// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Mock LLM provider for testing
//!
//! A configurable in-memory implementation of [`LlmProvider`] so tests can
//! exercise the chat path without a network.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::{ApiError, Result, TaskdError};
use crate::llm::provider::{CompletionRequest, CompletionResponse, LlmProvider, Usage};

/// A mock provider returning a canned response or a canned failure
#[derive(Clone)]
pub struct MockProvider {
    response: Option<String>,
    call_count: Arc<AtomicUsize>,
    recorded_requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::with_response("mock response")
    }
}

impl MockProvider {
    /// Provider that answers every request with `text`
    pub fn with_response(text: impl Into<String>) -> Self {
        Self {
            response: Some(text.into()),
            call_count: Arc::new(AtomicUsize::new(0)),
            recorded_requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Provider that fails every request with an authentication error
    pub fn failing() -> Self {
        Self {
            response: None,
            call_count: Arc::new(AtomicUsize::new(0)),
            recorded_requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of completions requested so far
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Requests recorded in call order
    pub fn recorded_requests(&self) -> Vec<CompletionRequest> {
        self.recorded_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.recorded_requests.lock().unwrap().push(request);

        match &self.response {
            Some(text) => Ok(CompletionResponse {
                text: text.clone(),
                model: "mock-model".to_string(),
                usage: Usage::default(),
            }),
            None => Err(TaskdError::Api(ApiError::AuthenticationFailed)),
        }
    }
}
