// SPDX-FileCopyrightText: 2026 Pawhaven Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Media adapter trait for image uploads.

use async_trait::async_trait;

use crate::error::PawhavenError;
use crate::traits::adapter::PluginAdapter;

/// Adapter for file storage backends.
///
/// The returned URL is stored verbatim as `image_url` on the owning record.
#[async_trait]
pub trait MediaAdapter: PluginAdapter {
    /// Stores `bytes` and returns a publicly resolvable URL.
    async fn upload(&self, bytes: Vec<u8>, content_type: &str) -> Result<String, PawhavenError>;
}
