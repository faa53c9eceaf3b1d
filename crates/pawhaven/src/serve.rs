// SPDX-FileCopyrightText: 2026 Pawhaven Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `pawhaven serve` and `pawhaven reconcile` command implementations.
//!
//! `serve` opens the SQLite store, wires the lifecycle services into the
//! HTTP gateway, and runs the approval reconciler in the background until
//! a shutdown signal arrives.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use pawhaven_config::PawhavenConfig;
use pawhaven_core::{PawhavenError, StorageAdapter};
use pawhaven_gateway::{GatewayState, StaticTokenAuth, build_router, start_server};
use pawhaven_lifecycle::{ReconcileReport, Services};
use pawhaven_storage::{LocalMediaStore, SqliteStorage};

use crate::shutdown;

async fn open_storage(config: &PawhavenConfig) -> Result<Arc<dyn StorageAdapter>, PawhavenError> {
    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    info!(path = %config.storage.database_path, "storage initialized");
    Ok(Arc::new(storage))
}

/// Runs the `pawhaven serve` command.
pub async fn run_serve(config: PawhavenConfig) -> Result<(), PawhavenError> {
    init_tracing(&config.server.log_level);
    info!(version = env!("CARGO_PKG_VERSION"), "starting pawhaven serve");

    let storage = open_storage(&config).await?;
    let auth = StaticTokenAuth::from_config(&config.auth)?;
    if auth.is_empty() {
        warn!("no auth tokens configured, only anonymous routes are usable");
    }
    let services = Services::new(storage.clone(), &config);
    let cancel = shutdown::install_signal_handler();

    let reconciler_task = match config.lifecycle.reconcile_interval_secs {
        0 => {
            info!("approval reconciler disabled");
            None
        }
        secs => {
            let reconciler = services.reconciler.clone();
            let token = cancel.clone();
            info!(interval_secs = secs, "approval reconciler started");
            Some(tokio::spawn(async move {
                reconciler.run(Duration::from_secs(secs), token).await;
            }))
        }
    };

    let state = GatewayState {
        services,
        auth: Arc::new(auth),
        media: Arc::new(LocalMediaStore::new(&config.media)),
        storage: storage.clone(),
        start_time: Instant::now(),
    };
    let app = build_router(state, &config.media);
    let served = start_server(&config.server, app, cancel.clone()).await;

    // The server may also stop on a bind error; take the reconciler down with it.
    cancel.cancel();
    if let Some(task) = reconciler_task {
        if let Err(e) = task.await {
            warn!(error = %e, "reconciler task ended abnormally");
        }
    }
    storage.close().await?;
    info!("pawhaven stopped");
    served
}

/// Runs a single reconciler pass (`pawhaven reconcile`).
pub async fn run_reconcile(config: PawhavenConfig) -> Result<ReconcileReport, PawhavenError> {
    init_tracing(&config.server.log_level);

    let storage = open_storage(&config).await?;
    let services = Services::new(storage.clone(), &config);
    let report = services.reconciler.run_once().await;
    storage.close().await?;

    let report = report?;
    info!(
        examined = report.examined,
        repaired = report.repaired,
        cleared = report.cleared,
        deferred = report.deferred,
        failed = report.failed,
        "reconcile pass complete"
    );
    Ok(report)
}

/// Initialize the tracing subscriber with the configured log level.
/// `RUST_LOG` takes precedence when set.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pawhaven={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
