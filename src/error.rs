// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Error types for Taskd
//!
//! This module defines all error types used throughout the application.

use thiserror::Error;

/// Main error type for Taskd operations
#[derive(Error, Debug)]
pub enum TaskdError {
    /// API-related errors from the LLM provider
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Storage errors
    #[error("Store error: {0}")]
    Store(String),

    /// SQLite errors
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Entity lookup failures
    #[error("{0}")]
    NotFound(String),

    /// Authentication failures
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Agent routing errors
    #[error("Agent error: {0}")]
    Agent(String),

    /// Tool execution errors
    #[error("Tool execution failed: {0}")]
    ToolExecution(String),
}

/// Provider-specific error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Authentication failed (invalid or missing API key)
    #[error("Authentication failed: invalid API key")]
    AuthenticationFailed,

    /// Rate limited by the API
    #[error("Rate limited: retry after {0} seconds")]
    RateLimited(u32),

    /// Quota or billing exhausted
    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Network connectivity error
    #[error("Network error: {0}")]
    Network(String),

    /// Invalid response from API
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// API returned an error
    #[error("API error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Timeout waiting for response
    #[error("Request timed out")]
    Timeout,
}

/// Result type alias for Taskd operations
pub type Result<T> = std::result::Result<T, TaskdError>;

impl From<toml::de::Error> for TaskdError {
    fn from(err: toml::de::Error) -> Self {
        TaskdError::Toml(err.to_string())
    }
}

impl From<toml::ser::Error> for TaskdError {
    fn from(err: toml::ser::Error) -> Self {
        TaskdError::Toml(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display_is_bare_message() {
        let err = TaskdError::NotFound("Task not found".to_string());
        assert_eq!(err.to_string(), "Task not found");
    }

    #[test]
    fn test_unauthorized() {
        let err = TaskdError::Unauthorized("invalid token".to_string());
        assert!(err.to_string().contains("Unauthorized"));
        assert!(err.to_string().contains("invalid token"));
    }

    #[test]
    fn test_invalid_input() {
        let err = TaskdError::InvalidInput("title must not be empty".to_string());
        assert!(err.to_string().contains("Invalid input"));
    }

    #[test]
    fn test_config_error() {
        let err = TaskdError::Config("missing secret".to_string());
        assert!(err.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_tool_execution_error() {
        let err = TaskdError::ToolExecution("bad arguments".to_string());
        assert!(err.to_string().contains("Tool execution failed"));
    }

    #[test]
    fn test_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: TaskdError = io_err.into();
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_api_error_authentication_failed() {
        let err = ApiError::AuthenticationFailed;
        assert!(err.to_string().contains("Authentication failed"));
    }

    #[test]
    fn test_api_error_rate_limited() {
        let err = ApiError::RateLimited(60);
        assert!(err.to_string().contains("Rate limited"));
        assert!(err.to_string().contains("60"));
    }

    #[test]
    fn test_api_error_quota() {
        let err = ApiError::QuotaExceeded("billing hard limit reached".to_string());
        assert!(err.to_string().contains("Quota exceeded"));
    }

    #[test]
    fn test_api_error_server_error() {
        let err = ApiError::ServerError {
            status: 500,
            message: "internal server error".to_string(),
        };
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("internal server error"));
    }

    #[test]
    fn test_taskd_error_from_api_error() {
        let err: TaskdError = ApiError::Timeout.into();
        assert!(err.to_string().contains("API error"));
    }

    #[test]
    fn test_result_type_alias() {
        fn test_fn() -> Result<i32> {
            Ok(42)
        }

        assert_eq!(test_fn().unwrap(), 42);
    }
}
