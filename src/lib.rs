// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Taskd - personal task management service with a natural-language command layer.
//!
//! This crate exposes the shared runtime used by the `taskd` server binary
//! (`src/main.rs`).
//!
//! Architecture highlights:
//! - `store`: SQLite-backed stores for tasks, users, and conversations
//! - `auth`: password hashing, JWT issuance/validation, bearer extraction
//! - `classifier`: ordered keyword/regex rules mapping chat input to commands
//! - `chat`: command execution, confirmation strings, LLM fallback
//! - `llm`: provider abstraction and the OpenAI-compatible implementation
//! - `agent`: skills registry and sub-agent orchestrator
//! - `tools`: CRUD operations exposed as schema-described callable tools
//! - `http`: axum router, handlers, and error mapping

pub mod agent;
pub mod auth;
pub mod chat;
pub mod classifier;
pub mod config;
pub mod error;
pub mod http;
pub mod llm;
pub mod store;
pub mod tools;

pub use error::{Result, TaskdError};
