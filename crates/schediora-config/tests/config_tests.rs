// SPDX-FileCopyrightText: 2026 Schediora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Schediora configuration system.

use schediora_config::diagnostic::ConfigError;
use schediora_config::model::SchedioraConfig;
use schediora_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_config() {
    let toml = r#"
[app]
log_level = "debug"

[api]
base_url = "https://schediora.example/api/v1"
request_timeout_ms = 5000

[storage]
database_path = "/tmp/schediora-test.db"
wal_mode = false

[polling]
ai_poll_interval_ms = 500
ai_max_poll_attempts = 10
refetch_interval_ms = 30000
query_retries = 0
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.app.log_level, "debug");
    assert_eq!(config.api.base_url, "https://schediora.example/api/v1");
    assert_eq!(config.api.request_timeout_ms, 5000);
    assert_eq!(config.storage.database_path, "/tmp/schediora-test.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.polling.ai_poll_interval_ms, 500);
    assert_eq!(config.polling.ai_max_poll_attempts, 10);
    assert_eq!(config.polling.refetch_interval_ms, 30000);
    assert_eq!(config.polling.query_retries, 0);
}

/// Missing optional sections use the client's built-in defaults.
#[test]
fn missing_optional_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.app.log_level, "info");
    assert_eq!(config.api.base_url, "http://127.0.0.1:8000/api/v1");
    assert_eq!(config.api.request_timeout_ms, 12_000);
    assert!(config.storage.database_path.ends_with("schediora.db"));
    assert!(config.storage.wal_mode);
    assert_eq!(config.polling.ai_poll_interval_ms, 2_000);
    assert_eq!(config.polling.ai_max_poll_attempts, 45);
    assert_eq!(config.polling.refetch_interval_ms, 15_000);
    assert_eq!(config.polling.query_retries, 1);
}

#[test]
fn duration_helpers_match_millisecond_fields() {
    let config = SchedioraConfig::default();
    assert_eq!(config.api.request_timeout().as_secs(), 12);
    assert_eq!(config.polling.ai_poll_interval().as_secs(), 2);
    assert_eq!(config.polling.refetch_interval().as_secs(), 15);
}

/// Unknown field in [api] is rejected by deny_unknown_fields.
#[test]
fn unknown_field_in_api_produces_error() {
    let toml = r#"
[api]
base_ulr = "http://localhost"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("base_ulr"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Unexpected top-level section is rejected.
#[test]
fn deny_unknown_fields_at_top_level() {
    let toml = r#"
[telemetry]
enabled = true
"#;

    let err = load_config_from_str(toml).expect_err("unknown section should be rejected");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("telemetry"),
        "got: {err_str}"
    );
}

/// Unknown key diagnostics carry a suggestion and the section's valid keys.
#[test]
fn diagnostic_error_suggests_correct_key() {
    let toml = r#"
[api]
base_ulr = "http://localhost"
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce errors");
    let has_unknown_key = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { key, suggestion, valid_keys, .. } if {
            key == "base_ulr"
                && suggestion.as_deref() == Some("base_url")
                && valid_keys.contains("request_timeout_ms")
        })
    });
    assert!(has_unknown_key, "got: {errors:?}");
}

/// A string where a number belongs is reported as an invalid type.
#[test]
fn diagnostic_invalid_type_message() {
    let toml = r#"
[polling]
ai_max_poll_attempts = "many"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject invalid type");
    let mentions_key = errors.iter().any(|e| match e {
        ConfigError::InvalidType { key, .. } => key.contains("ai_max_poll_attempts"),
        other => other.to_string().contains("ai_max_poll_attempts"),
    });
    assert!(mentions_key, "got: {errors:?}");
}

/// Semantic validation runs after a successful parse.
#[test]
fn validation_rejects_zero_poll_attempts() {
    let toml = r#"
[polling]
ai_max_poll_attempts = 0
"#;

    let errors = load_and_validate_str(toml).expect_err("zero attempts should fail");
    assert!(errors.iter().any(|e| {
        matches!(e, ConfigError::Validation { message } if message.contains("ai_max_poll_attempts"))
    }));
}

/// ConfigError renders through miette with code and help.
#[test]
fn config_error_renders_with_miette() {
    use miette::{Diagnostic, GraphicalReportHandler};

    let error = ConfigError::UnknownKey {
        key: "base_ulr".to_string(),
        suggestion: Some("base_url".to_string()),
        valid_keys: "base_url, request_timeout_ms".to_string(),
        span: None,
        src: None,
    };

    assert!(error.code().is_some(), "should have diagnostic code");
    let help = error.help().expect("should have help text").to_string();
    assert!(help.contains("did you mean `base_url`"), "got: {help}");

    let mut buf = String::new();
    GraphicalReportHandler::new()
        .render_report(&mut buf, &error)
        .expect("should render without error");
    assert!(buf.contains("base_ulr"));
}

/// SCHEDIORA_* env vars override file values, keeping underscores inside key names.
#[test]
fn env_vars_override_file_values() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "schediora.toml",
            r#"
[api]
base_url = "http://from-file/api/v1"

[polling]
ai_poll_interval_ms = 700
"#,
        )?;
        jail.set_env("SCHEDIORA_API_BASE_URL", "http://from-env/api/v1");
        jail.set_env("SCHEDIORA_POLLING_AI_MAX_POLL_ATTEMPTS", "3");

        let config = schediora_config::load_config_from_path(std::path::Path::new(
            "schediora.toml",
        ))
        .expect("config should load");

        assert_eq!(config.api.base_url, "http://from-env/api/v1");
        assert_eq!(config.polling.ai_max_poll_attempts, 3);
        assert_eq!(config.polling.ai_poll_interval_ms, 700);
        Ok(())
    });
}

/// Upper-case env keys map into every section, including multi-word keys.
#[test]
fn env_vars_map_into_every_section() {
    figment::Jail::expect_with(|jail| {
        jail.set_env("SCHEDIORA_APP_LOG_LEVEL", "debug");
        jail.set_env("SCHEDIORA_API_REQUEST_TIMEOUT_MS", "3000");
        jail.set_env("SCHEDIORA_STORAGE_WAL_MODE", "false");
        jail.set_env("SCHEDIORA_POLLING_REFETCH_INTERVAL_MS", "1000");

        let config = schediora_config::load_and_validate()
            .map_err(|errors| format!("{errors:?}"))?;

        assert_eq!(config.app.log_level, "debug");
        assert_eq!(config.api.request_timeout_ms, 3000);
        assert!(!config.storage.wal_mode);
        assert_eq!(config.polling.refetch_interval_ms, 1000);
        Ok(())
    });
}
