// SPDX-FileCopyrightText: 2026 Pawhaven Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::extract::{DefaultBodyLimit, Extension};
use axum::routing::{get, post, put};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use pawhaven_config::model::{MediaConfig, ServerConfig};
use pawhaven_core::{AuthAdapter, MediaAdapter, PawhavenError, ReportKind, StorageAdapter};
use pawhaven_lifecycle::Services;

use crate::{admin, handlers};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct GatewayState {
    pub services: Services,
    pub auth: Arc<dyn AuthAdapter>,
    pub media: Arc<dyn MediaAdapter>,
    pub storage: Arc<dyn StorageAdapter>,
    pub start_time: Instant,
}

fn public_report_routes(kind: ReportKind) -> Router<GatewayState> {
    let root = match kind {
        ReportKind::Lost => get(handlers::list_reports).post(handlers::submit_lost_report),
        ReportKind::Found => get(handlers::list_reports).post(handlers::submit_found_report),
    };
    Router::new()
        .route("/", root)
        .route("/{id}", get(handlers::get_report))
        .layer(Extension(kind))
}

fn admin_report_routes(kind: ReportKind) -> Router<GatewayState> {
    Router::new()
        .route("/", get(admin::list_reports))
        .route("/{id}/status", put(admin::set_report_status))
        .route("/{id}/reunite", post(admin::mark_reunited))
        .layer(Extension(kind))
}

/// Builds the full route table.
///
/// Uploaded files are served back from `media.public_url_prefix`.
pub fn build_router(state: GatewayState, media: &MediaConfig) -> Router {
    let api = Router::new()
        .route("/health", get(handlers::get_health))
        .nest("/v1/lost-pets", public_report_routes(ReportKind::Lost))
        .nest("/v1/found-pets", public_report_routes(ReportKind::Found))
        .route("/v1/reunited", get(handlers::list_reunited))
        .route("/v1/adoption-pets", get(handlers::list_available_pets))
        .route("/v1/adoption-pets/{id}", get(handlers::get_available_pet))
        .route(
            "/v1/adoption-pets/{id}/applications",
            post(handlers::submit_application),
        )
        .route("/v1/contact", post(handlers::submit_contact))
        .route(
            "/v1/uploads",
            post(handlers::upload_media).layer(DefaultBodyLimit::max(media.max_upload_bytes)),
        );

    let admin = Router::new()
        .route("/dashboard", get(admin::dashboard))
        .nest("/lost-pets", admin_report_routes(ReportKind::Lost))
        .nest("/found-pets", admin_report_routes(ReportKind::Found))
        .route(
            "/adoption-pets",
            get(admin::list_pets).post(admin::add_pet),
        )
        .route(
            "/adoption-pets/{id}",
            put(admin::edit_pet).delete(admin::delete_pet),
        )
        .route("/adoption-pets/{id}/status", put(admin::set_listing_status))
        .route("/applications", get(admin::list_applications))
        .route(
            "/applications/{id}/approve",
            post(admin::approve_application),
        )
        .route("/applications/{id}/reject", post(admin::reject_application))
        .route("/messages", get(admin::list_messages))
        .route("/messages/{id}/read", post(admin::mark_read))
        .route("/messages/{id}/reply-link", get(admin::reply_link));

    let mut app = api.nest("/v1/admin", admin).with_state(state);

    let prefix = media.public_url_prefix.trim_end_matches('/');
    if prefix.starts_with('/') && prefix.len() > 1 {
        app = app.nest_service(prefix, ServeDir::new(&media.root_dir));
    }

    app.layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Binds `host:port` and serves until `shutdown` is cancelled.
pub async fn start_server(
    server: &ServerConfig,
    app: Router,
    shutdown: CancellationToken,
) -> Result<(), PawhavenError> {
    let addr = format!("{}:{}", server.host, server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| PawhavenError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| PawhavenError::Internal(format!("gateway server error: {e}")))?;

    tracing::info!("gateway stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_state_is_clone() {
        fn assert_clone<T: Clone + Send + Sync + 'static>() {}
        assert_clone::<GatewayState>();
    }
}
