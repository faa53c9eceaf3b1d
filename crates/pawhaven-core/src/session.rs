// SPDX-FileCopyrightText: 2026 Pawhaven Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The caller identity passed explicitly into every lifecycle operation.

use uuid::Uuid;

use crate::error::PawhavenError;

/// Who is calling: an optional authenticated user and an admin flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Session {
    pub user_id: Option<Uuid>,
    pub is_admin: bool,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn user(user_id: Uuid) -> Self {
        Self {
            user_id: Some(user_id),
            is_admin: false,
        }
    }

    pub fn admin(user_id: Uuid) -> Self {
        Self {
            user_id: Some(user_id),
            is_admin: true,
        }
    }

    /// Returns the user id, or `Unauthenticated` for an anonymous session.
    pub fn require_user(&self) -> Result<Uuid, PawhavenError> {
        self.user_id.ok_or(PawhavenError::Unauthenticated)
    }

    /// Succeeds only for an authenticated administrator.
    pub fn require_admin(&self) -> Result<Uuid, PawhavenError> {
        let user_id = self.require_user()?;
        if !self.is_admin {
            return Err(PawhavenError::Forbidden(
                "administrator access required".to_string(),
            ));
        }
        Ok(user_id)
    }
}
