// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! OpenAI-compatible chat completions provider
//!
//! Talks to any endpoint that speaks the OpenAI `/chat/completions` wire
//! format. The base URL is configurable, so local inference servers work
//! unchanged.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::settings::ProviderConfig;
use crate::error::{ApiError, Result, TaskdError};
use crate::llm::provider::{CompletionRequest, CompletionResponse, LlmProvider, Usage};

/// OpenAI-compatible provider
pub struct OpenAiProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    model: String,
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

impl OpenAiProvider {
    /// Create a provider from resolved settings
    pub fn from_config(config: &ProviderConfig, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        }
    }

    /// Map an error status to an API error
    fn parse_error(status: StatusCode, body: &str) -> ApiError {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::AuthenticationFailed,
            StatusCode::TOO_MANY_REQUESTS => {
                if body.contains("quota") || body.contains("billing") {
                    ApiError::QuotaExceeded(body.to_string())
                } else {
                    ApiError::RateLimited(60)
                }
            }
            _ => ApiError::ServerError {
                status: status.as_u16(),
                message: body.to_string(),
            },
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(TaskdError::Api(ApiError::AuthenticationFailed))?;

        let mut messages = Vec::new();
        if let Some(system) = request.system {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: request.prompt,
        });

        let body = ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        debug!(model = %self.model, "sending chat completion request");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| TaskdError::Api(ApiError::Network(e.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TaskdError::Api(Self::parse_error(status, &body)));
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|e| {
            TaskdError::Api(ApiError::InvalidResponse(format!(
                "failed to parse completion: {e}"
            )))
        })?;

        let text = parsed
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or_else(|| {
                TaskdError::Api(ApiError::InvalidResponse(
                    "response contained no choices".to_string(),
                ))
            })?;

        let usage = parsed.usage.unwrap_or(ChatUsage {
            prompt_tokens: 0,
            completion_tokens: 0,
        });

        Ok(CompletionResponse {
            text,
            model: parsed.model,
            usage: Usage {
                input_tokens: usage.prompt_tokens,
                output_tokens: usage.completion_tokens,
            },
        })
    }
}
