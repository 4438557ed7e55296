// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Language model integration

pub mod mock_provider;
pub mod provider;
pub mod providers;

pub use mock_provider::MockProvider;
pub use provider::{CompletionRequest, CompletionResponse, LlmProvider, Usage};
pub use providers::openai::OpenAiProvider;
