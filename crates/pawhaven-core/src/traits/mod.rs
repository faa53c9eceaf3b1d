// SPDX-FileCopyrightText: 2026 Pawhaven Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the Pawhaven backends.
//!
//! All adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod auth;
pub mod media;
pub mod storage;

pub use adapter::PluginAdapter;
pub use auth::AuthAdapter;
pub use media::MediaAdapter;
pub use storage::StorageAdapter;
