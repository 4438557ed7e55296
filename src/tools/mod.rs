// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Tool-calling protocol
//!
//! Exposes task operations as named tools with JSON-schema argument
//! descriptions, callable over the HTTP API.

pub mod builtin;
pub mod protocol;
pub mod registry;

pub use protocol::{CallToolParams, ToolCallResult, ToolDefinition, ToolParameter};
pub use registry::{ToolHandler, ToolRegistry};
