// SPDX-FileCopyrightText: 2026 Schediora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as URL schemes, non-zero intervals, and non-empty paths.

use crate::diagnostic::ConfigError;
use crate::model::SchedioraConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every problem instead of failing on the first one.
pub fn validate_config(config: &SchedioraConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let base_url = config.api.base_url.trim();
    if base_url.is_empty() {
        fail("api.base_url must not be empty".to_string());
    } else if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        fail(format!(
            "api.base_url `{base_url}` must start with http:// or https://"
        ));
    }

    if config.api.request_timeout_ms == 0 {
        fail("api.request_timeout_ms must be greater than 0".to_string());
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    if config.polling.ai_poll_interval_ms == 0 {
        fail("polling.ai_poll_interval_ms must be greater than 0".to_string());
    }

    if config.polling.ai_max_poll_attempts == 0 {
        fail("polling.ai_max_poll_attempts must be at least 1".to_string());
    }

    if config.polling.refetch_interval_ms == 0 {
        fail("polling.refetch_interval_ms must be greater than 0".to_string());
    }

    let level = config.app.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        fail(format!(
            "app.log_level `{}` is not one of {}",
            config.app.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(config: &SchedioraConfig) -> Vec<String> {
        validate_config(config)
            .unwrap_err()
            .into_iter()
            .map(|e| e.to_string())
            .collect()
    }

    #[test]
    fn default_config_validates() {
        let config = SchedioraConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn non_http_base_url_fails_validation() {
        let mut config = SchedioraConfig::default();
        config.api.base_url = "ftp://example.com".to_string();
        let errors = messages(&config);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("api.base_url"));
    }

    #[test]
    fn zero_intervals_fail_validation() {
        let mut config = SchedioraConfig::default();
        config.api.request_timeout_ms = 0;
        config.polling.ai_poll_interval_ms = 0;
        config.polling.ai_max_poll_attempts = 0;
        config.polling.refetch_interval_ms = 0;
        let errors = messages(&config);
        assert_eq!(errors.len(), 4, "got: {errors:?}");
    }

    #[test]
    fn unknown_log_level_fails_validation() {
        let mut config = SchedioraConfig::default();
        config.app.log_level = "verbose".to_string();
        let errors = messages(&config);
        assert!(errors[0].contains("app.log_level"));
    }

    #[test]
    fn log_level_is_case_insensitive() {
        let mut config = SchedioraConfig::default();
        config.app.log_level = "DEBUG".to_string();
        assert!(validate_config(&config).is_ok());
    }
}
