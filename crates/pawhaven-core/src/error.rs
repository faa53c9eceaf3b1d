// SPDX-FileCopyrightText: 2026 Pawhaven Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for Pawhaven.

use thiserror::Error;
use uuid::Uuid;

use crate::types::Collection;

/// The primary error type used across adapter traits and lifecycle operations.
#[derive(Debug, Error)]
pub enum PawhavenError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// A required field is missing or malformed. Raised before any store call.
    #[error("validation error: {0}")]
    Validation(String),

    /// A write was attempted without an authenticated session.
    #[error("authentication required")]
    Unauthenticated,

    /// An authenticated, non-admin session attempted an admin-only operation.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// A read by id found nothing.
    #[error("{collection} record not found: {id}")]
    NotFound { collection: Collection, id: Uuid },

    /// An update or delete matched no record.
    #[error("no {collection} record matched id {id}")]
    ZeroRows { collection: Collection, id: Uuid },

    /// A status transition rejected by terminal-state enforcement.
    #[error("invalid status transition from `{from}` to `{to}`")]
    InvalidTransition { from: String, to: String },

    /// The operation conflicts with existing data (e.g. deleting a referenced pet).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Storage backend errors (connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Step one of an application approval failed; the pet was not touched.
    #[error("failed to update application {application_id}: {source}")]
    ApplicationUpdate {
        application_id: Uuid,
        source: Box<PawhavenError>,
    },

    /// Step two of an application approval failed after the application was
    /// already approved. The pet is still listed as available.
    #[error("application {application_id} approved but pet {pet_id} could not be marked unavailable: {source}")]
    PetUpdate {
        application_id: Uuid,
        pet_id: Uuid,
        source: Box<PawhavenError>,
    },

    /// Media upload errors (rejected content type, I/O failure).
    #[error("media error: {message}")]
    Media {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl PawhavenError {
    /// Wrap any error as a storage failure.
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Storage {
            source: Box::new(err),
        }
    }

    /// Short machine-readable name of the variant, used in API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Validation(_) => "validation",
            Self::Unauthenticated => "unauthenticated",
            Self::Forbidden(_) => "forbidden",
            Self::NotFound { .. } => "not_found",
            Self::ZeroRows { .. } => "zero_rows",
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::Conflict(_) => "conflict",
            Self::Storage { .. } => "storage",
            Self::ApplicationUpdate { .. } => "application_update",
            Self::PetUpdate { .. } => "pet_update",
            Self::Media { .. } => "media",
            Self::Internal(_) => "internal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_rows_is_distinct_from_storage() {
        let id = Uuid::new_v4();
        let zero = PawhavenError::ZeroRows {
            collection: Collection::AdoptionApplications,
            id,
        };
        let storage = PawhavenError::storage(std::io::Error::other("connection reset"));
        assert_eq!(zero.kind(), "zero_rows");
        assert_eq!(storage.kind(), "storage");
        assert!(zero.to_string().contains("adoption_applications"));
        assert!(storage.to_string().contains("connection reset"));
    }

    #[test]
    fn pet_update_message_names_both_records() {
        let application_id = Uuid::new_v4();
        let pet_id = Uuid::new_v4();
        let err = PawhavenError::PetUpdate {
            application_id,
            pet_id,
            source: Box::new(PawhavenError::Internal("boom".into())),
        };
        let msg = err.to_string();
        assert!(msg.contains(&application_id.to_string()));
        assert!(msg.contains(&pet_id.to_string()));
        assert!(msg.contains("boom"));
    }
}
