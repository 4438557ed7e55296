// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Wire types for tool discovery and invocation

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// One declared argument of a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
    /// JSON-schema type name, e.g. "string" or "boolean"
    #[serde(rename = "type")]
    pub param_type: String,
    pub description: String,
    #[serde(default = "default_required")]
    pub required: bool,
}

fn default_required() -> bool {
    true
}

impl ToolParameter {
    pub fn required(name: &str, param_type: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            param_type: param_type.to_string(),
            description: description.to_string(),
            required: true,
        }
    }

    pub fn optional(name: &str, param_type: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            param_type: param_type.to_string(),
            description: description.to_string(),
            required: false,
        }
    }
}

/// A tool as advertised to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ToolParameter>,
    /// JSON schema derived from `parameters`
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

impl ToolDefinition {
    /// Build a definition, deriving the input schema from the parameters
    pub fn new(name: &str, description: &str, parameters: Vec<ToolParameter>) -> Self {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();
        for param in &parameters {
            properties.insert(
                param.name.clone(),
                json!({
                    "type": param.param_type,
                    "description": param.description,
                }),
            );
            if param.required {
                required.push(Value::String(param.name.clone()));
            }
        }

        Self {
            name: name.to_string(),
            description: description.to_string(),
            parameters,
            input_schema: json!({
                "type": "object",
                "properties": properties,
                "required": required,
            }),
        }
    }
}

/// Body of a tool-call request
#[derive(Debug, Clone, Deserialize)]
pub struct CallToolParams {
    pub tool: String,
    #[serde(default)]
    pub arguments: Value,
}

/// Outcome of one tool invocation
///
/// Invocation failures are carried in-band: the HTTP call itself succeeds
/// and the result reports the error text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallResult {
    pub success: bool,
    pub result: Option<Value>,
    pub error: Option<String>,
}

impl ToolCallResult {
    pub fn ok(result: Value) -> Self {
        Self {
            success: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_generation() {
        let def = ToolDefinition::new(
            "create_task",
            "Create a new task",
            vec![
                ToolParameter::required("title", "string", "Task title"),
                ToolParameter::optional("description", "string", "Task description"),
            ],
        );

        assert_eq!(def.input_schema["type"], "object");
        assert_eq!(def.input_schema["properties"]["title"]["type"], "string");
        assert_eq!(def.input_schema["required"], json!(["title"]));
    }

    #[test]
    fn test_empty_parameters_schema() {
        let def = ToolDefinition::new("get_tasks", "Retrieve all tasks", Vec::new());
        assert_eq!(def.input_schema["properties"], json!({}));
        assert_eq!(def.input_schema["required"], json!([]));
    }

    #[test]
    fn test_call_params_default_arguments() {
        let params: CallToolParams = serde_json::from_str(r#"{"tool": "get_tasks"}"#).unwrap();
        assert_eq!(params.tool, "get_tasks");
        assert!(params.arguments.is_null());
    }
}
