// SPDX-FileCopyrightText: 2026 Pawhaven Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Pawhaven, the pet recovery and adoption service.
//!
//! This crate provides the record types, status enums, the explicit
//! [`Session`] passed into every lifecycle operation, the error taxonomy,
//! and the adapter traits that storage, auth, and media backends implement.

pub mod error;
pub mod session;
pub mod traits;
pub mod types;

pub use error::PawhavenError;
pub use session::Session;
pub use types::{
    AdapterType, ApplicationStatus, Collection, HealthStatus, ListingStatus, ReportKind,
    ReportStatus,
};

pub use traits::{AuthAdapter, MediaAdapter, PluginAdapter, StorageAdapter};

/// Parse a record identifier, rejecting anything that is not a UUID.
///
/// Used before any write so a malformed id fails fast instead of issuing a
/// request that can only match zero rows.
pub fn parse_record_id(label: &str, raw: &str) -> Result<uuid::Uuid, PawhavenError> {
    uuid::Uuid::parse_str(raw.trim())
        .map_err(|_| PawhavenError::Validation(format!("invalid {label} ID format: {raw}")))
}
