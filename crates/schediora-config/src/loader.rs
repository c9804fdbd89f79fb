// SPDX-FileCopyrightText: 2026 Schediora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./schediora.toml` > `~/.config/schediora/schediora.toml`
//! > `/etc/schediora/schediora.toml` with environment variable overrides via
//! the `SCHEDIORA_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::SchedioraConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/schediora/schediora.toml` (system-wide)
/// 3. `~/.config/schediora/schediora.toml` (user XDG config)
/// 4. `./schediora.toml` (local directory)
/// 5. `SCHEDIORA_*` environment variables
pub fn load_config() -> Result<SchedioraConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<SchedioraConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SchedioraConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<SchedioraConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SchedioraConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the layered Figment before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(SchedioraConfig::default()))
        .merge(Toml::file("/etc/schediora/schediora.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("schediora/schediora.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("schediora.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `SCHEDIORA_API_REQUEST_TIMEOUT_MS` must map to
/// `api.request_timeout_ms`, not `api.request.timeout.ms`.
pub(crate) fn env_provider() -> Env {
    Env::prefixed("SCHEDIORA_").map(|key| {
        let lowered = key.as_str().to_ascii_lowercase();
        let key_str = lowered.as_str();
        let mapped = ["app_", "api_", "storage_", "polling_"]
            .iter()
            .find(|section| key_str.starts_with(*section))
            .map(|section| key_str.replacen(section, &section.replace('_', "."), 1))
            .unwrap_or_else(|| key_str.to_string());
        mapped.into()
    })
}
