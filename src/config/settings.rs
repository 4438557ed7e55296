// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Settings management for Taskd
//!
//! Settings are loaded from a TOML file (`--config`, falling back to
//! `~/.taskd/config.toml`) with serde defaults for every field, so an empty
//! or missing file yields a fully working development configuration.
//! Secrets (JWT signing key, provider API key) are resolved from the
//! environment by default and are never written back to disk.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, TaskdError};

/// Main settings structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// SQLite database settings
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Authentication and token settings
    #[serde(default)]
    pub auth: AuthConfig,

    /// LLM provider settings for the chat fallback
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Agent orchestration settings
    #[serde(default)]
    pub agent: AgentConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind, e.g. "127.0.0.1:8080"
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Default log filter when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// SQLite database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// JWT signing secret (if stored directly, not recommended)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,

    /// Environment variable name for the JWT signing secret
    #[serde(default = "default_secret_env")]
    pub secret_env: String,

    /// Access token lifetime in minutes
    #[serde(default = "default_access_ttl_minutes")]
    pub access_ttl_minutes: i64,

    /// Refresh token lifetime in days
    #[serde(default = "default_refresh_ttl_days")]
    pub refresh_ttl_days: i64,
}

/// LLM provider configuration (OpenAI-compatible chat completions)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key (if stored directly, not recommended)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Environment variable name for the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Model to use for fallback responses
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL for the API (for custom endpoints)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Maximum tokens in a fallback response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

/// Agent orchestration configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Minimum confidence score for a sub-agent to claim a query
    #[serde(default = "default_confidence_floor")]
    pub confidence_floor: f32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            log_level: default_log_level(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: None,
            secret_env: default_secret_env(),
            access_ttl_minutes: default_access_ttl_minutes(),
            refresh_ttl_days: default_refresh_ttl_days(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_env: default_api_key_env(),
            model: default_model(),
            base_url: default_base_url(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            confidence_floor: default_confidence_floor(),
        }
    }
}

fn default_bind_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_log_level() -> String {
    "taskd=info,tower_http=info".to_string()
}

fn default_db_path() -> PathBuf {
    Settings::taskd_home().join("taskd.db")
}

fn default_secret_env() -> String {
    "TASKD_JWT_SECRET".to_string()
}

fn default_access_ttl_minutes() -> i64 {
    30
}

fn default_refresh_ttl_days() -> i64 {
    7
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_max_tokens() -> u32 {
    200
}

fn default_temperature() -> f32 {
    0.7
}

fn default_confidence_floor() -> f32 {
    0.1
}

impl Settings {
    /// Directory for Taskd state (~/.taskd)
    pub fn taskd_home() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".taskd")
    }

    /// Default config file location (~/.taskd/config.toml)
    pub fn default_config_path() -> PathBuf {
        Self::taskd_home().join("config.toml")
    }

    /// Load settings from the given path, or from the default location.
    ///
    /// A missing file is not an error; defaults are used instead.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_config_path);

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Write a default config file at the given path
    pub fn write_default(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(&Settings::default())?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Resolve the JWT signing secret from config or environment
    pub fn jwt_secret(&self) -> Result<String> {
        if let Some(secret) = &self.auth.secret {
            return Ok(secret.clone());
        }
        std::env::var(&self.auth.secret_env).map_err(|_| {
            TaskdError::Config(format!(
                "JWT secret not configured: set {} or [auth] secret",
                self.auth.secret_env
            ))
        })
    }

    /// Resolve the provider API key from config or environment, if present
    pub fn provider_api_key(&self) -> Option<String> {
        self.provider
            .api_key
            .clone()
            .or_else(|| std::env::var(&self.provider.api_key_env).ok())
    }
}
