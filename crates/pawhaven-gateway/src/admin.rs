// SPDX-FileCopyrightText: 2026 Pawhaven Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Admin console handlers. Every service call here checks the session for
//! administrator access itself.

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use pawhaven_core::types::{
    AdoptionApplication, AdoptionPet, ContactMessage, PetFields, PetRecord,
};
use pawhaven_core::{ApplicationStatus, ListingStatus, ReportKind, ReportStatus};
use pawhaven_lifecycle::{DashboardStats, PetFilter, parse_status};

use crate::auth::CurrentSession;
use crate::error::ApiError;
use crate::handlers::record_id;
use crate::server::GatewayState;

#[derive(Debug, Deserialize)]
pub struct StatusBody {
    pub status: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReuniteBody {
    #[serde(default)]
    pub story: String,
}

#[derive(Debug, Deserialize)]
pub struct ApproveBody {
    pub pet_id: String,
}

/// Response body for GET /v1/admin/messages.
#[derive(Debug, Serialize)]
pub struct MessageList {
    pub unread: u64,
    pub messages: Vec<ContactMessage>,
}

#[derive(Debug, Serialize)]
pub struct ReplyLinkResponse {
    pub url: String,
}

pub async fn dashboard(
    State(state): State<GatewayState>,
    CurrentSession(session): CurrentSession,
) -> Result<Json<DashboardStats>, ApiError> {
    Ok(Json(state.services.dashboard.stats(&session).await?))
}

/// GET /v1/admin/{lost-pets|found-pets}. Every status, newest first.
pub async fn list_reports(
    State(state): State<GatewayState>,
    Extension(kind): Extension<ReportKind>,
    CurrentSession(session): CurrentSession,
    Query(filter): Query<PetFilter>,
) -> Result<Json<Vec<PetRecord>>, ApiError> {
    let reports = state
        .services
        .reports
        .list_all_reports(&session, kind, &filter)
        .await?;
    Ok(Json(reports))
}

pub async fn set_report_status(
    State(state): State<GatewayState>,
    Extension(kind): Extension<ReportKind>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
    Json(body): Json<StatusBody>,
) -> Result<StatusCode, ApiError> {
    let id = record_id("report", &id)?;
    let status: ReportStatus = parse_status("report", &body.status)?;
    state
        .services
        .reports
        .set_report_status(&session, kind, id, status)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn mark_reunited(
    State(state): State<GatewayState>,
    Extension(kind): Extension<ReportKind>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
    Json(body): Json<ReuniteBody>,
) -> Result<StatusCode, ApiError> {
    let id = record_id("report", &id)?;
    state
        .services
        .reports
        .mark_reunited(&session, kind, id, &body.story)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_pets(
    State(state): State<GatewayState>,
    CurrentSession(session): CurrentSession,
    Query(filter): Query<PetFilter>,
) -> Result<Json<Vec<AdoptionPet>>, ApiError> {
    Ok(Json(
        state
            .services
            .listings
            .list_all_pets(&session, &filter)
            .await?,
    ))
}

pub async fn add_pet(
    State(state): State<GatewayState>,
    CurrentSession(session): CurrentSession,
    Json(fields): Json<PetFields>,
) -> Result<(StatusCode, Json<AdoptionPet>), ApiError> {
    let pet = state.services.listings.add_pet(&session, fields).await?;
    Ok((StatusCode::CREATED, Json(pet)))
}

pub async fn edit_pet(
    State(state): State<GatewayState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
    Json(fields): Json<PetFields>,
) -> Result<StatusCode, ApiError> {
    let id = record_id("pet", &id)?;
    state
        .services
        .listings
        .edit_pet(&session, id, fields)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_pet(
    State(state): State<GatewayState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = record_id("pet", &id)?;
    state.services.listings.delete_pet(&session, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_listing_status(
    State(state): State<GatewayState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
    Json(body): Json<StatusBody>,
) -> Result<StatusCode, ApiError> {
    let id = record_id("pet", &id)?;
    let status: ListingStatus = parse_status("listing", &body.status)?;
    state
        .services
        .listings
        .set_listing_status(&session, id, status)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/admin/applications. Accepts an extra `status` query parameter.
pub async fn list_applications(
    State(state): State<GatewayState>,
    CurrentSession(session): CurrentSession,
    Query(filter): Query<PetFilter>,
    Query(status): Query<ApplicationStatusQuery>,
) -> Result<Json<Vec<AdoptionApplication>>, ApiError> {
    let status: Option<ApplicationStatus> = match status.status.as_deref() {
        None | Some("") | Some("all") => None,
        Some(raw) => Some(parse_status("application", raw)?),
    };
    let mut applications = state
        .services
        .adoption
        .list_applications(&session, &filter)
        .await?;
    if let Some(status) = status {
        applications.retain(|a| a.status == status);
    }
    Ok(Json(applications))
}

#[derive(Debug, Default, Deserialize)]
pub struct ApplicationStatusQuery {
    #[serde(default)]
    pub status: Option<String>,
}

/// POST /v1/admin/applications/{id}/approve. Ids are checked by the service.
pub async fn approve_application(
    State(state): State<GatewayState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
    Json(body): Json<ApproveBody>,
) -> Result<StatusCode, ApiError> {
    state
        .services
        .adoption
        .approve_application(&session, &id, &body.pet_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn reject_application(
    State(state): State<GatewayState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = record_id("application", &id)?;
    state
        .services
        .adoption
        .reject_application(&session, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_messages(
    State(state): State<GatewayState>,
    CurrentSession(session): CurrentSession,
    Query(filter): Query<PetFilter>,
) -> Result<Json<MessageList>, ApiError> {
    let contact = &state.services.contact;
    let messages = contact.list_messages(&session, &filter).await?;
    let unread = contact.unread_count(&session).await?;
    Ok(Json(MessageList { unread, messages }))
}

pub async fn mark_read(
    State(state): State<GatewayState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = record_id("message", &id)?;
    state.services.contact.mark_read(&session, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn reply_link(
    State(state): State<GatewayState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
) -> Result<Json<ReplyLinkResponse>, ApiError> {
    let id = record_id("message", &id)?;
    let url = state.services.contact.reply_link_for(&session, id).await?;
    Ok(Json(ReplyLinkResponse { url }))
}
