// SPDX-FileCopyrightText: 2026 Pawhaven Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bearer-token session resolution.
//!
//! Tokens come from the `[auth].tokens` table. Only their SHA-256 digests are
//! kept in memory. A request without an `Authorization` header is anonymous;
//! a header carrying an unknown token is rejected with 401 before any
//! handler runs.

use std::collections::HashMap;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use sha2::{Digest, Sha256};

use pawhaven_config::model::AuthConfig;
use pawhaven_core::{AdapterType, AuthAdapter, HealthStatus, PawhavenError, PluginAdapter, Session};

use crate::error::ApiError;
use crate::server::GatewayState;

/// [`AuthAdapter`] backed by the static token table.
pub struct StaticTokenAuth {
    sessions: HashMap<String, Session>,
}

impl std::fmt::Debug for StaticTokenAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenAuth")
            .field("tokens", &self.sessions.len())
            .finish()
    }
}

fn digest(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

impl StaticTokenAuth {
    pub fn from_config(config: &AuthConfig) -> Result<Self, PawhavenError> {
        let mut sessions = HashMap::with_capacity(config.tokens.len());
        for entry in &config.tokens {
            let user_id = uuid::Uuid::parse_str(entry.user_id.trim()).map_err(|_| {
                PawhavenError::Config(format!(
                    "auth token user_id is not a UUID: {}",
                    entry.user_id
                ))
            })?;
            let session = if entry.admin {
                Session::admin(user_id)
            } else {
                Session::user(user_id)
            };
            sessions.insert(digest(&entry.token), session);
        }
        Ok(Self { sessions })
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[async_trait]
impl PluginAdapter for StaticTokenAuth {
    fn name(&self) -> &str {
        "static-token"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Auth
    }

    async fn health_check(&self) -> Result<HealthStatus, PawhavenError> {
        if self.sessions.is_empty() {
            return Ok(HealthStatus::Degraded(
                "no auth tokens configured".to_string(),
            ));
        }
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), PawhavenError> {
        Ok(())
    }
}

#[async_trait]
impl AuthAdapter for StaticTokenAuth {
    async fn authenticate(&self, token: &str) -> Result<Session, PawhavenError> {
        self.sessions
            .get(&digest(token))
            .copied()
            .ok_or(PawhavenError::Unauthenticated)
    }
}

/// The session resolved from the request's bearer token.
#[derive(Debug, Clone, Copy)]
pub struct CurrentSession(pub Session);

impl FromRequestParts<GatewayState> for CurrentSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &GatewayState,
    ) -> Result<Self, Self::Rejection> {
        let Some(header) = parts.headers.get(AUTHORIZATION) else {
            return Ok(Self(Session::anonymous()));
        };
        let token = header
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(PawhavenError::Unauthenticated)?;
        let session = state.auth.authenticate(token).await?;
        Ok(Self(session))
    }
}
