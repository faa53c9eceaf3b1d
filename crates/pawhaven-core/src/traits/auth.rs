// SPDX-FileCopyrightText: 2026 Pawhaven Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication adapter trait for resolving callers into sessions.

use async_trait::async_trait;

use crate::error::PawhavenError;
use crate::session::Session;
use crate::traits::adapter::PluginAdapter;

/// Adapter that resolves a bearer token into a [`Session`].
#[async_trait]
pub trait AuthAdapter: PluginAdapter {
    /// Returns the session for `token`, or `Unauthenticated` if it is unknown.
    async fn authenticate(&self, token: &str) -> Result<Session, PawhavenError>;
}
