// SPDX-FileCopyrightText: 2026 Pawhaven Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Compensation log for two-step application approvals.

use pawhaven_core::PawhavenError;
use rusqlite::params;
use uuid::Uuid;

use crate::database::{Database, map_tr_err};
use crate::models::{Compensation, RowExt, format_ts};

pub async fn record(db: &Database, entry: &Compensation) -> Result<(), PawhavenError> {
    let e = entry.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO approval_compensations (id, application_id, pet_id, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    e.id.to_string(),
                    e.application_id.to_string(),
                    e.pet_id.to_string(),
                    format_ts(e.created_at),
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Remove an entry. Clearing an unknown id is not an error.
pub async fn clear(db: &Database, id: Uuid) -> Result<(), PawhavenError> {
    db.connection()
        .call(move |conn| {
            conn.execute(
                "DELETE FROM approval_compensations WHERE id = ?1",
                params![id.to_string()],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// All pending entries, oldest first.
pub async fn list(db: &Database) -> Result<Vec<Compensation>, PawhavenError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, application_id, pet_id, created_at
                 FROM approval_compensations ORDER BY created_at ASC, rowid ASC",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok(Compensation {
                    id: row.get_uuid(0)?,
                    application_id: row.get_uuid(1)?,
                    pet_id: row.get_uuid(2)?,
                    created_at: row.get_ts(3)?,
                })
            })?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::tempdir;

    #[tokio::test]
    async fn record_list_clear() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("comp.db").to_str().unwrap())
            .await
            .unwrap();
        let entry = Compensation {
            id: Uuid::new_v4(),
            application_id: Uuid::new_v4(),
            pet_id: Uuid::new_v4(),
            created_at: Utc::now(),
        };
        record(&db, &entry).await.unwrap();

        let pending = list(&db).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].application_id, entry.application_id);

        clear(&db, entry.id).await.unwrap();
        clear(&db, entry.id).await.unwrap();
        assert!(list(&db).await.unwrap().is_empty());
        db.close().await.unwrap();
    }
}
