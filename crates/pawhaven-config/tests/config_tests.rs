// SPDX-FileCopyrightText: 2026 Pawhaven Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Pawhaven configuration system.

use pawhaven_config::diagnostic::ConfigError;
use pawhaven_config::model::{ApprovalMode, PawhavenConfig, PetDeletePolicy};
use pawhaven_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_pawhaven_config() {
    let toml = r#"
[server]
host = "0.0.0.0"
port = 9090
log_level = "debug"

[storage]
database_path = "/tmp/pawhaven-test.db"
wal_mode = false

[media]
root_dir = "/var/lib/pawhaven/uploads"
public_url_prefix = "https://cdn.example.org/pets"
max_upload_bytes = 1048576
allowed_content_types = ["image/png"]

[lifecycle]
enforce_terminal_states = true
approval_mode = "two_step"
pet_delete_policy = "cascade"
reconcile_interval_secs = 0

[dashboard]
recent_per_source = 4
recent_limit = 5

[[auth.tokens]]
token = "admin-token"
user_id = "0b6f2d8e-7c1a-4f3b-9e5d-2a4c6e8f0b1d"
admin = true
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.server.log_level, "debug");
    assert_eq!(config.storage.database_path, "/tmp/pawhaven-test.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.media.public_url_prefix, "https://cdn.example.org/pets");
    assert_eq!(config.media.max_upload_bytes, 1_048_576);
    assert_eq!(config.media.allowed_content_types, vec!["image/png"]);
    assert!(config.lifecycle.enforce_terminal_states);
    assert_eq!(config.lifecycle.approval_mode, ApprovalMode::TwoStep);
    assert_eq!(config.lifecycle.pet_delete_policy, PetDeletePolicy::Cascade);
    assert_eq!(config.lifecycle.reconcile_interval_secs, 0);
    assert_eq!(config.dashboard.recent_per_source, 4);
    assert_eq!(config.dashboard.recent_limit, 5);
    assert_eq!(config.auth.tokens.len(), 1);
    assert!(config.auth.tokens[0].admin);
}

/// Empty TOML falls back to compiled defaults.
#[test]
fn missing_optional_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.server.log_level, "info");
    assert_eq!(config.storage.database_path, "pawhaven.db");
    assert!(config.storage.wal_mode);
    assert_eq!(config.media.root_dir, "uploads");
    assert_eq!(config.media.public_url_prefix, "/media");
    assert_eq!(config.media.max_upload_bytes, 5 * 1024 * 1024);
    assert_eq!(config.media.allowed_content_types.len(), 4);
    assert!(!config.lifecycle.enforce_terminal_states);
    assert_eq!(config.lifecycle.approval_mode, ApprovalMode::Atomic);
    assert_eq!(config.lifecycle.pet_delete_policy, PetDeletePolicy::Reject);
    assert_eq!(config.lifecycle.reconcile_interval_secs, 300);
    assert_eq!(config.dashboard.recent_per_source, 2);
    assert_eq!(config.dashboard.recent_limit, 3);
    assert!(config.auth.tokens.is_empty());
}

/// Unknown field in [server] is rejected.
#[test]
fn unknown_field_in_server_produces_error() {
    let err = load_config_from_str("[server]\nprot = 80\n").expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("prot"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Unexpected top-level section is rejected by deny_unknown_fields.
#[test]
fn deny_unknown_fields_at_top_level() {
    let err = load_config_from_str("[logging]\nlevel = \"debug\"\n")
        .expect_err("unknown top-level section should be rejected");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("logging"),
        "error should mention unknown field, got: {err_str}"
    );
}

/// Dotted keys (what the env provider produces) override TOML values.
#[test]
fn dotted_override_wins_over_toml() {
    use figment::{
        Figment,
        providers::{Format, Serialized, Toml},
    };

    let config: PawhavenConfig = Figment::new()
        .merge(Serialized::defaults(PawhavenConfig::default()))
        .merge(Toml::string("[storage]\ndatabase_path = \"from-toml.db\"\n"))
        .merge(("storage.database_path", "from-env.db"))
        .extract()
        .expect("should merge override");

    assert_eq!(config.storage.database_path, "from-env.db");
}

/// Missing config files are silently skipped (Figment's Toml::file() behavior).
#[test]
fn missing_config_files_silently_skipped() {
    use figment::{
        Figment,
        providers::{Format, Serialized, Toml},
    };

    let config: PawhavenConfig = Figment::new()
        .merge(Serialized::defaults(PawhavenConfig::default()))
        .merge(Toml::file("/nonexistent/path/pawhaven.toml"))
        .extract()
        .expect("missing file should be silently skipped");

    assert_eq!(config.server.port, 8080);
}

/// `PAWHAVEN_*` variables override compiled defaults through the full loader.
#[test]
#[serial_test::serial]
fn env_vars_override_defaults() {
    // SAFETY: env mutation is confined to #[serial] tests.
    unsafe { std::env::set_var("PAWHAVEN_SERVER_PORT", "9393") };
    unsafe { std::env::set_var("PAWHAVEN_LIFECYCLE_APPROVAL_MODE", "two_step") };
    let result = pawhaven_config::load_config();
    unsafe { std::env::remove_var("PAWHAVEN_SERVER_PORT") };
    unsafe { std::env::remove_var("PAWHAVEN_LIFECYCLE_APPROVAL_MODE") };

    let config = result.expect("env overrides should load");
    assert_eq!(config.server.port, 9393);
    assert_eq!(config.lifecycle.approval_mode, ApprovalMode::TwoStep);
}

/// Env var names map onto dotted keys at the first section underscore only.
#[test]
fn env_key_mapping_keeps_underscored_field_names() {
    use pawhaven_config::loader::map_env_key;

    assert_eq!(
        map_env_key("lifecycle_reconcile_interval_secs"),
        "lifecycle.reconcile_interval_secs"
    );
    assert_eq!(
        map_env_key("dashboard_recent_per_source"),
        "dashboard.recent_per_source"
    );
}

// ============================================================================
// Diagnostic tests
// ============================================================================

/// A typo in a section key produces an UnknownKey diagnostic with a suggestion.
#[test]
fn typo_produces_unknown_key_with_suggestion() {
    let errors = load_and_validate_str("[storage]\ndatabse_path = \"x.db\"\n")
        .expect_err("typo should be rejected");
    assert!(
        errors.iter().any(|e| matches!(
            e,
            ConfigError::UnknownKey { key, suggestion: Some(s), .. }
                if key == "databse_path" && s == "database_path"
        )),
        "expected a suggestion for databse_path, got: {errors:?}"
    );
}

/// An unsupported enum value names the accepted variants.
#[test]
fn unknown_approval_mode_lists_variants() {
    let errors = load_and_validate_str("[lifecycle]\napproval_mode = \"eventual\"\n")
        .expect_err("unknown variant should be rejected");
    let rendered: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
    assert!(
        rendered.iter().any(|m| m.contains("eventual")),
        "got: {rendered:?}"
    );
}

/// A wrong value type produces an InvalidType diagnostic naming the key.
#[test]
fn wrong_type_produces_invalid_type() {
    let errors = load_and_validate_str("[server]\nport = \"eighty\"\n")
        .expect_err("string port should be rejected");
    assert!(
        errors.iter().any(|e| matches!(e, ConfigError::InvalidType { key, .. } if key.contains("port"))),
        "got: {errors:?}"
    );
}

/// A token entry without user_id is a missing key.
#[test]
fn token_without_user_id_is_missing_key() {
    let errors = load_and_validate_str("[[auth.tokens]]\ntoken = \"t\"\n")
        .expect_err("user_id is required");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::MissingKey { key } if key.contains("user_id"))),
        "got: {errors:?}"
    );
}

/// Semantic validation runs after a successful parse and reports all failures.
#[test]
fn validation_collects_multiple_errors() {
    let toml = r#"
[storage]
database_path = ""

[media]
max_upload_bytes = 0
"#;
    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert_eq!(errors.len(), 2, "got: {errors:?}");
    assert!(errors.iter().all(|e| matches!(e, ConfigError::Validation { .. })));
}
