// SPDX-FileCopyrightText: 2026 Pawhaven Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A migrated SQLite store in a temporary directory.

use std::sync::Arc;

use pawhaven_config::model::StorageConfig;
use pawhaven_core::{PawhavenError, StorageAdapter};
use pawhaven_storage::SqliteStorage;

/// Owns the temp directory so the database outlives the test body.
pub struct TempSqlite {
    pub storage: Arc<SqliteStorage>,
    _dir: tempfile::TempDir,
}

impl TempSqlite {
    pub async fn new() -> Result<Self, PawhavenError> {
        let dir = tempfile::TempDir::new().map_err(PawhavenError::storage)?;
        let db_path = dir.path().join("test.db");
        let storage = SqliteStorage::new(StorageConfig {
            database_path: db_path.to_string_lossy().to_string(),
            wal_mode: true,
        });
        storage.initialize().await?;
        Ok(Self {
            storage: Arc::new(storage),
            _dir: dir,
        })
    }

    pub fn path(&self) -> &std::path::Path {
        self._dir.path()
    }
}
