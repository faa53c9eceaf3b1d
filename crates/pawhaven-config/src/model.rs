// SPDX-FileCopyrightText: 2026 Pawhaven Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Pawhaven service.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Pawhaven configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PawhavenConfig {
    /// HTTP listener and logging settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Image upload settings.
    #[serde(default)]
    pub media: MediaConfig,

    /// Status machine and approval behavior.
    #[serde(default)]
    pub lifecycle: LifecycleConfig,

    /// Admin dashboard aggregation settings.
    #[serde(default)]
    pub dashboard: DashboardConfig,

    /// Bearer token table.
    #[serde(default)]
    pub auth: AuthConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind the HTTP listener to.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
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
    "pawhaven.db".to_string()
}

fn default_wal_mode() -> bool {
    true
}

/// Image upload configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MediaConfig {
    /// Directory uploaded files are written under.
    #[serde(default = "default_media_root")]
    pub root_dir: String,

    /// URL prefix the stored files are served from.
    #[serde(default = "default_public_url_prefix")]
    pub public_url_prefix: String,

    /// Largest accepted upload in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Accepted MIME types.
    #[serde(default = "default_allowed_content_types")]
    pub allowed_content_types: Vec<String>,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            root_dir: default_media_root(),
            public_url_prefix: default_public_url_prefix(),
            max_upload_bytes: default_max_upload_bytes(),
            allowed_content_types: default_allowed_content_types(),
        }
    }
}

fn default_media_root() -> String {
    "uploads".to_string()
}

fn default_public_url_prefix() -> String {
    "/media".to_string()
}

fn default_max_upload_bytes() -> usize {
    5 * 1024 * 1024
}

fn default_allowed_content_types() -> Vec<String> {
    ["image/jpeg", "image/png", "image/webp", "image/gif"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// How an application approval reaches the pet listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalMode {
    /// One store transaction when the store supports it.
    #[default]
    Atomic,
    /// Application write, then pet write, tracked by the compensation log.
    TwoStep,
}

/// What happens to applications when their listing is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PetDeletePolicy {
    /// Refuse to delete a listing that still has applications.
    #[default]
    Reject,
    /// Delete the listing's applications along with it.
    Cascade,
}

/// Status machine configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LifecycleConfig {
    /// Refuse transitions out of `rejected`/`reunited` and application
    /// transitions out of a decided state.
    #[serde(default)]
    pub enforce_terminal_states: bool,

    #[serde(default)]
    pub approval_mode: ApprovalMode,

    #[serde(default)]
    pub pet_delete_policy: PetDeletePolicy,

    /// Seconds between compensation reconciler passes. `0` disables the loop.
    #[serde(default = "default_reconcile_interval_secs")]
    pub reconcile_interval_secs: u64,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            enforce_terminal_states: false,
            approval_mode: ApprovalMode::default(),
            pet_delete_policy: PetDeletePolicy::default(),
            reconcile_interval_secs: default_reconcile_interval_secs(),
        }
    }
}

fn default_reconcile_interval_secs() -> u64 {
    300
}

/// Dashboard aggregation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DashboardConfig {
    /// Recent items fetched from each source collection.
    #[serde(default = "default_recent_per_source")]
    pub recent_per_source: usize,

    /// Recent activities kept after the cross-source merge.
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            recent_per_source: default_recent_per_source(),
            recent_limit: default_recent_limit(),
        }
    }
}

fn default_recent_per_source() -> usize {
    2
}

fn default_recent_limit() -> usize {
    3
}

/// Bearer token table resolved into sessions by the gateway.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    #[serde(default)]
    pub tokens: Vec<TokenConfig>,
}

/// A single bearer token entry.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TokenConfig {
    pub token: String,

    /// UUID of the user the token authenticates as.
    pub user_id: String,

    #[serde(default)]
    pub admin: bool,
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("token", &"[REDACTED]")
            .field("user_id", &self.user_id)
            .field("admin", &self.admin)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_debug_redacts_secret() {
        let entry = TokenConfig {
            token: "s3cret".to_string(),
            user_id: "00000000-0000-0000-0000-000000000001".to_string(),
            admin: true,
        };
        let debug = format!("{entry:?}");
        assert!(!debug.contains("s3cret"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn lifecycle_enums_use_snake_case() {
        let config: LifecycleConfig = toml::from_str(
            "approval_mode = \"two_step\"\npet_delete_policy = \"cascade\"\n",
        )
        .unwrap();
        assert_eq!(config.approval_mode, ApprovalMode::TwoStep);
        assert_eq!(config.pet_delete_policy, PetDeletePolicy::Cascade);
        assert!(!config.enforce_terminal_states);
    }
}
