// SPDX-FileCopyrightText: 2026 Schediora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Schediora client.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level Schediora configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SchedioraConfig {
    /// Process-level settings.
    #[serde(default)]
    pub app: AppConfig,

    /// Backend API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Local token storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Refetch and AI job polling settings.
    #[serde(default)]
    pub polling: PollingConfig,
}

/// Process-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Backend API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Versioned base URL every endpoint path is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Hard per-request timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000/api/v1".to_string()
}

fn default_request_timeout_ms() -> u64 {
    12_000
}

/// Token storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database holding tokens and flags.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("schediora").join("schediora.db"))
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "schediora.db".to_string())
}

fn default_wal_mode() -> bool {
    true
}

/// Refetch intervals and AI job polling limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PollingConfig {
    /// Delay between AI job status polls, in milliseconds.
    #[serde(default = "default_ai_poll_interval_ms")]
    pub ai_poll_interval_ms: u64,

    /// Maximum number of AI job status polls before giving up.
    #[serde(default = "default_ai_max_poll_attempts")]
    pub ai_max_poll_attempts: u32,

    /// Background refetch interval for dashboard, tasks, and weekly AI status.
    #[serde(default = "default_refetch_interval_ms")]
    pub refetch_interval_ms: u64,

    /// Extra attempts for a failed background fetch before the error is shown.
    #[serde(default = "default_query_retries")]
    pub query_retries: u32,
}

impl PollingConfig {
    pub fn ai_poll_interval(&self) -> Duration {
        Duration::from_millis(self.ai_poll_interval_ms)
    }

    pub fn refetch_interval(&self) -> Duration {
        Duration::from_millis(self.refetch_interval_ms)
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            ai_poll_interval_ms: default_ai_poll_interval_ms(),
            ai_max_poll_attempts: default_ai_max_poll_attempts(),
            refetch_interval_ms: default_refetch_interval_ms(),
            query_retries: default_query_retries(),
        }
    }
}

fn default_ai_poll_interval_ms() -> u64 {
    2_000
}

fn default_ai_max_poll_attempts() -> u32 {
    45
}

fn default_refetch_interval_ms() -> u64 {
    15_000
}

fn default_query_retries() -> u32 {
    1
}
