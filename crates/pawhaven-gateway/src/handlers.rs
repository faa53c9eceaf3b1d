// SPDX-FileCopyrightText: 2026 Pawhaven Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Public and signed-in request handlers.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Extension, Path, Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use serde::Serialize;
use uuid::Uuid;

use pawhaven_core::types::{
    AdoptionApplication, AdoptionPet, ContactMessage, FoundPetReport, LostPetReport,
    NewApplication, NewContactMessage, NewFoundReport, NewLostReport, PetRecord,
};
use pawhaven_core::{HealthStatus, MediaAdapter, PluginAdapter, ReportKind, parse_record_id};
use pawhaven_lifecycle::{ListingFilter, ReportFilter};

use crate::auth::CurrentSession;
use crate::error::ApiError;
use crate::server::GatewayState;

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: &'static str,
    pub uptime_secs: u64,
}

/// Response body for POST /v1/uploads.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

/// Parses a path id, rejecting anything that is not a UUID with 400.
pub(crate) fn record_id(label: &str, raw: &str) -> Result<Uuid, ApiError> {
    Ok(parse_record_id(label, raw)?)
}

/// GET /health. 503 when the store is unreachable.
pub async fn get_health(State(state): State<GatewayState>) -> (StatusCode, Json<HealthResponse>) {
    let (code, status) = match state.storage.health_check().await {
        Ok(HealthStatus::Healthy) => (StatusCode::OK, "healthy".to_string()),
        Ok(HealthStatus::Degraded(reason)) => (StatusCode::OK, format!("degraded: {reason}")),
        Ok(HealthStatus::Unhealthy(reason)) => (
            StatusCode::SERVICE_UNAVAILABLE,
            format!("unhealthy: {reason}"),
        ),
        Err(e) => (StatusCode::SERVICE_UNAVAILABLE, format!("unhealthy: {e}")),
    };
    (
        code,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            uptime_secs: state.start_time.elapsed().as_secs(),
        }),
    )
}

/// GET /v1/{lost-pets|found-pets}. Approved reports only.
pub async fn list_reports(
    State(state): State<GatewayState>,
    Extension(kind): Extension<ReportKind>,
    Query(filter): Query<ReportFilter>,
) -> Result<Json<Vec<PetRecord>>, ApiError> {
    let reports = state
        .services
        .reports
        .list_public_reports(kind, &filter)
        .await?;
    Ok(Json(reports))
}

/// GET /v1/{lost-pets|found-pets}/{id}.
pub async fn get_report(
    State(state): State<GatewayState>,
    Extension(kind): Extension<ReportKind>,
    Path(id): Path<String>,
) -> Result<Json<PetRecord>, ApiError> {
    let id = record_id("report", &id)?;
    let report = state.services.reports.public_report(kind, id).await?;
    Ok(Json(report))
}

pub async fn submit_lost_report(
    State(state): State<GatewayState>,
    CurrentSession(session): CurrentSession,
    Json(input): Json<NewLostReport>,
) -> Result<(StatusCode, Json<LostPetReport>), ApiError> {
    let report = state
        .services
        .reports
        .submit_lost_report(&session, input)
        .await?;
    Ok((StatusCode::CREATED, Json(report)))
}

pub async fn submit_found_report(
    State(state): State<GatewayState>,
    CurrentSession(session): CurrentSession,
    Json(input): Json<NewFoundReport>,
) -> Result<(StatusCode, Json<FoundPetReport>), ApiError> {
    let report = state
        .services
        .reports
        .submit_found_report(&session, input)
        .await?;
    Ok((StatusCode::CREATED, Json(report)))
}

/// GET /v1/reunited. Lost and found reunions, most recent first.
pub async fn list_reunited(
    State(state): State<GatewayState>,
    Query(filter): Query<ReportFilter>,
) -> Result<Json<Vec<PetRecord>>, ApiError> {
    Ok(Json(state.services.reports.list_reunited(&filter).await?))
}

pub async fn list_available_pets(
    State(state): State<GatewayState>,
    Query(filter): Query<ListingFilter>,
) -> Result<Json<Vec<AdoptionPet>>, ApiError> {
    Ok(Json(
        state.services.listings.list_available_pets(&filter).await?,
    ))
}

pub async fn get_available_pet(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Result<Json<AdoptionPet>, ApiError> {
    let id = record_id("pet", &id)?;
    Ok(Json(state.services.listings.available_pet(id).await?))
}

/// POST /v1/adoption-pets/{id}/applications.
pub async fn submit_application(
    State(state): State<GatewayState>,
    CurrentSession(session): CurrentSession,
    Path(pet_id): Path<String>,
    Json(input): Json<NewApplication>,
) -> Result<(StatusCode, Json<AdoptionApplication>), ApiError> {
    let pet_id = record_id("pet", &pet_id)?;
    let application = state
        .services
        .adoption
        .submit_application(&session, pet_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(application)))
}

/// POST /v1/contact. Open to anonymous callers.
pub async fn submit_contact(
    State(state): State<GatewayState>,
    Json(input): Json<NewContactMessage>,
) -> Result<(StatusCode, Json<ContactMessage>), ApiError> {
    let message = state.services.contact.submit_message(input).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// POST /v1/uploads. Raw image body; the type comes from `Content-Type`.
pub async fn upload_media(
    State(state): State<GatewayState>,
    CurrentSession(session): CurrentSession,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let user_id = session.require_user()?;
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let url = state.media.upload(body.to_vec(), content_type).await?;
    tracing::info!(%user_id, %url, "image uploaded");
    Ok((StatusCode::CREATED, Json(UploadResponse { url })))
}
