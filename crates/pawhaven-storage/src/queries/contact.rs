// SPDX-FileCopyrightText: 2026 Pawhaven Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Contact message operations.

use pawhaven_core::PawhavenError;
use pawhaven_core::types::{Collection, ListQuery};
use rusqlite::{Row, params, params_from_iter};
use tracing::debug;
use uuid::Uuid;

use crate::database::{Database, map_tr_err};
use crate::models::{ContactMessage, RowExt, format_ts};

const COLUMNS: &str = "id, name, email, subject, message, read, created_at";

fn from_row(row: &Row<'_>) -> rusqlite::Result<ContactMessage> {
    Ok(ContactMessage {
        id: row.get_uuid(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        subject: row.get(3)?,
        message: row.get(4)?,
        read: row.get(5)?,
        created_at: row.get_ts(6)?,
    })
}

pub async fn insert(db: &Database, message: &ContactMessage) -> Result<(), PawhavenError> {
    let m = message.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                &format!("INSERT INTO contact_messages ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"),
                params![
                    m.id.to_string(),
                    m.name,
                    m.email,
                    m.subject,
                    m.message,
                    m.read,
                    format_ts(m.created_at),
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// List messages; `query.status` may be `read` or `unread`.
pub async fn list(db: &Database, query: &ListQuery) -> Result<Vec<ContactMessage>, PawhavenError> {
    let (sql, values) = super::list_sql(
        &format!("SELECT {COLUMNS} FROM contact_messages"),
        Collection::ContactMessages,
        None,
        query,
    )?;
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(values), from_row)?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
        .await
        .map_err(map_tr_err)
}

/// Set `read = 1`. Matches the row even when it is already read.
pub async fn mark_read(db: &Database, id: Uuid) -> Result<usize, PawhavenError> {
    let rows = db
        .connection()
        .call(move |conn| {
            Ok(conn.execute(
                "UPDATE contact_messages SET read = 1 WHERE id = ?1",
                params![id.to_string()],
            )?)
        })
        .await
        .map_err(map_tr_err)?;
    debug!(%id, rows, "contact message marked read");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::count;
    use chrono::Utc;
    use tempfile::tempdir;

    #[tokio::test]
    async fn mark_read_is_idempotent_and_filters_follow() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("contact.db").to_str().unwrap())
            .await
            .unwrap();
        let message = ContactMessage {
            id: Uuid::new_v4(),
            name: "Lee".to_string(),
            email: "lee@example.com".to_string(),
            subject: "Volunteering".to_string(),
            message: "How can I help?".to_string(),
            read: false,
            created_at: Utc::now(),
        };
        insert(&db, &message).await.unwrap();
        assert_eq!(
            count(&db, Collection::ContactMessages, Some("unread"))
                .await
                .unwrap(),
            1
        );

        assert_eq!(mark_read(&db, message.id).await.unwrap(), 1);
        assert_eq!(mark_read(&db, message.id).await.unwrap(), 1);

        let read = list(&db, &ListQuery::with_status("read")).await.unwrap();
        assert_eq!(read.len(), 1);
        assert!(read[0].read);
        assert_eq!(
            count(&db, Collection::ContactMessages, Some("unread"))
                .await
                .unwrap(),
            0
        );
        assert_eq!(mark_read(&db, Uuid::new_v4()).await.unwrap(), 0);
        db.close().await.unwrap();
    }
}
