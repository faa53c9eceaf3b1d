// SPDX-FileCopyrightText: 2026 Pawhaven Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that serde attributes cannot express,
//! such as host syntax, non-empty paths, and token uniqueness.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::PawhavenConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns every failed check, not just the first.
pub fn validate_config(config: &PawhavenConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::validation("server.host must not be empty"));
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::validation(format!(
                "server.host `{host}` is not a valid IP address or hostname"
            )));
        }
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::validation(
            "storage.database_path must not be empty",
        ));
    }

    if config.media.root_dir.trim().is_empty() {
        errors.push(ConfigError::validation("media.root_dir must not be empty"));
    }

    if config.media.max_upload_bytes == 0 {
        errors.push(ConfigError::validation(
            "media.max_upload_bytes must be greater than 0",
        ));
    }

    if config.dashboard.recent_per_source < 1 {
        errors.push(ConfigError::validation(
            "dashboard.recent_per_source must be at least 1",
        ));
    }

    if config.dashboard.recent_limit < 1 {
        errors.push(ConfigError::validation(
            "dashboard.recent_limit must be at least 1",
        ));
    }

    let mut seen_tokens = HashSet::new();
    for (i, entry) in config.auth.tokens.iter().enumerate() {
        if entry.token.trim().is_empty() {
            errors.push(ConfigError::validation(format!(
                "auth.tokens[{i}].token must not be empty"
            )));
        } else if !seen_tokens.insert(entry.token.as_str()) {
            errors.push(ConfigError::validation(format!(
                "auth.tokens[{i}] duplicates an earlier token"
            )));
        }

        if uuid::Uuid::parse_str(entry.user_id.trim()).is_err() {
            errors.push(ConfigError::validation(format!(
                "auth.tokens[{i}].user_id `{}` is not a valid UUID",
                entry.user_id
            )));
        }
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
    use crate::model::TokenConfig;

    fn has_message(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    fn token(token: &str, user_id: &str) -> TokenConfig {
        TokenConfig {
            token: token.to_string(),
            user_id: user_id.to_string(),
            admin: false,
        }
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&PawhavenConfig::default()).is_ok());
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = PawhavenConfig::default();
        config.storage.database_path = "  ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "database_path"));
    }

    #[test]
    fn bad_host_fails_validation() {
        let mut config = PawhavenConfig::default();
        config.server.host = "not a host!".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "server.host"));
    }

    #[test]
    fn zero_dashboard_limits_fail_validation() {
        let mut config = PawhavenConfig::default();
        config.dashboard.recent_per_source = 0;
        config.dashboard.recent_limit = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "recent_per_source"));
        assert!(has_message(&errors, "recent_limit"));
    }

    #[test]
    fn duplicate_and_malformed_tokens_are_all_reported() {
        let mut config = PawhavenConfig::default();
        let user = "6f1c2a34-5b6d-4e7f-8a9b-0c1d2e3f4a5b";
        config.auth.tokens = vec![token("abc", user), token("abc", user), token("", "nope")];
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "duplicates an earlier token"));
        assert!(has_message(&errors, "tokens[2].token must not be empty"));
        assert!(has_message(&errors, "not a valid UUID"));
        assert_eq!(errors.len(), 3);
    }
}
