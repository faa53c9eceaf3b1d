// SPDX-FileCopyrightText: 2026 Pawhaven Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping from [`PawhavenError`] to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use pawhaven_core::PawhavenError;

/// JSON error body: `{ "error": ..., "kind": ... }`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: &'static str,
}

/// A lifecycle error on its way out of a handler.
#[derive(Debug)]
pub struct ApiError(pub PawhavenError);

impl From<PawhavenError> for ApiError {
    fn from(err: PawhavenError) -> Self {
        Self(err)
    }
}

/// HTTP status for an error variant.
pub fn status_for(err: &PawhavenError) -> StatusCode {
    match err {
        PawhavenError::Validation(_) => StatusCode::BAD_REQUEST,
        PawhavenError::Unauthenticated => StatusCode::UNAUTHORIZED,
        PawhavenError::Forbidden(_) => StatusCode::FORBIDDEN,
        PawhavenError::NotFound { .. } | PawhavenError::ZeroRows { .. } => StatusCode::NOT_FOUND,
        PawhavenError::InvalidTransition { .. } | PawhavenError::Conflict(_) => {
            StatusCode::CONFLICT
        }
        PawhavenError::Storage { .. } => StatusCode::BAD_GATEWAY,
        // Step one failed and nothing changed; report what step one hit.
        PawhavenError::ApplicationUpdate { source, .. } => status_for(source),
        PawhavenError::PetUpdate { .. }
        | PawhavenError::Media { .. }
        | PawhavenError::Config(_)
        | PawhavenError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status.is_server_error() {
            tracing::error!(kind = self.0.kind(), error = %self.0, "request failed");
        } else {
            tracing::debug!(kind = self.0.kind(), error = %self.0, "request rejected");
        }
        let body = ErrorResponse {
            error: self.0.to_string(),
            kind: self.0.kind(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pawhaven_core::Collection;
    use uuid::Uuid;

    #[test]
    fn client_errors_map_to_4xx() {
        let id = Uuid::new_v4();
        assert_eq!(
            status_for(&PawhavenError::Validation("pet_name is required".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&PawhavenError::Unauthenticated),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_for(&PawhavenError::Forbidden("admin".into())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_for(&PawhavenError::ZeroRows {
                collection: Collection::LostPets,
                id
            }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&PawhavenError::Conflict("has applications".into())),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn application_update_takes_its_source_status() {
        let id = Uuid::new_v4();
        let zero = PawhavenError::ApplicationUpdate {
            application_id: id,
            source: Box::new(PawhavenError::ZeroRows {
                collection: Collection::AdoptionApplications,
                id,
            }),
        };
        assert_eq!(status_for(&zero), StatusCode::NOT_FOUND);

        let transport = PawhavenError::ApplicationUpdate {
            application_id: id,
            source: Box::new(PawhavenError::storage(std::io::Error::other("reset"))),
        };
        assert_eq!(status_for(&transport), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn partial_approval_is_a_server_error() {
        let err = PawhavenError::PetUpdate {
            application_id: Uuid::new_v4(),
            pet_id: Uuid::new_v4(),
            source: Box::new(PawhavenError::storage(std::io::Error::other("reset"))),
        };
        let response = ApiError(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
