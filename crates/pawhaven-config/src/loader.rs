// SPDX-FileCopyrightText: 2026 Pawhaven Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./pawhaven.toml` > `~/.config/pawhaven/pawhaven.toml` >
//! `/etc/pawhaven/pawhaven.toml` with environment variable overrides via `PAWHAVEN_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::PawhavenConfig;

/// Top-level config sections, used to map env var names onto dotted keys.
const SECTIONS: &[&str] = &["server", "storage", "media", "lifecycle", "dashboard", "auth"];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/pawhaven/pawhaven.toml` (system-wide)
/// 3. `~/.config/pawhaven/pawhaven.toml` (user XDG config)
/// 4. `./pawhaven.toml` (local directory)
/// 5. `PAWHAVEN_*` environment variables
pub fn load_config() -> Result<PawhavenConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<PawhavenConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PawhavenConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<PawhavenConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PawhavenConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(PawhavenConfig::default()))
        .merge(Toml::file("/etc/pawhaven/pawhaven.toml"))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file("pawhaven.toml"))
        .merge(env_provider())
}

/// `~/.config/pawhaven/pawhaven.toml`, when a config dir exists.
pub fn user_config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|d| d.join("pawhaven/pawhaven.toml"))
}

/// Create the environment variable provider with explicit section mapping.
///
/// Only the first underscore after a known section name becomes a dot, so
/// `PAWHAVEN_STORAGE_DATABASE_PATH` maps to `storage.database_path`.
fn env_provider() -> Env {
    Env::prefixed("PAWHAVEN_").map(|key| map_env_key(key.as_str()).into())
}

/// Map a lowercased, prefix-stripped env var name onto a dotted config key.
pub fn map_env_key(key: &str) -> String {
    for section in SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}
