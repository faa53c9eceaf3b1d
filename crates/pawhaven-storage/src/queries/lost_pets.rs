// SPDX-FileCopyrightText: 2026 Pawhaven Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lost-pet report operations.

use pawhaven_core::PawhavenError;
use pawhaven_core::types::{Collection, ListQuery};
use rusqlite::{Row, params, params_from_iter};
use uuid::Uuid;

use crate::database::{Database, map_tr_err};
use crate::models::{LostPetReport, RowExt, format_date, format_ts};

const COLUMNS: &str = "id, pet_name, pet_type, breed, color, description, last_seen_location,
     last_seen_date, contact_name, contact_phone, contact_email, image_url, status,
     created_at, reunite_story, reunite_date, user_id";

fn from_row(row: &Row<'_>) -> rusqlite::Result<LostPetReport> {
    Ok(LostPetReport {
        id: row.get_uuid(0)?,
        pet_name: row.get(1)?,
        pet_type: row.get(2)?,
        breed: row.get(3)?,
        color: row.get(4)?,
        description: row.get(5)?,
        last_seen_location: row.get(6)?,
        last_seen_date: row.get_date(7)?,
        contact_name: row.get(8)?,
        contact_phone: row.get(9)?,
        contact_email: row.get(10)?,
        image_url: row.get(11)?,
        status: row.get_enum(12)?,
        created_at: row.get_ts(13)?,
        reunite_story: row.get(14)?,
        reunite_date: row.get_opt_ts(15)?,
        user_id: row.get_uuid(16)?,
    })
}

/// Insert a new report.
pub async fn insert(db: &Database, report: &LostPetReport) -> Result<(), PawhavenError> {
    let r = report.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                &format!(
                    "INSERT INTO lost_pets ({COLUMNS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)"
                ),
                params![
                    r.id.to_string(),
                    r.pet_name,
                    r.pet_type,
                    r.breed,
                    r.color,
                    r.description,
                    r.last_seen_location,
                    format_date(r.last_seen_date),
                    r.contact_name,
                    r.contact_phone,
                    r.contact_email,
                    r.image_url,
                    r.status.to_string(),
                    format_ts(r.created_at),
                    r.reunite_story,
                    r.reunite_date.map(format_ts),
                    r.user_id.to_string(),
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Get a report by ID.
pub async fn get(db: &Database, id: Uuid) -> Result<Option<LostPetReport>, PawhavenError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM lost_pets WHERE id = ?1"))?;
            match stmt.query_row(params![id.to_string()], from_row) {
                Ok(report) => Ok(Some(report)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// List reports matching `query`.
pub async fn list(db: &Database, query: &ListQuery) -> Result<Vec<LostPetReport>, PawhavenError> {
    let (sql, values) = super::list_sql(
        &format!("SELECT {COLUMNS} FROM lost_pets"),
        Collection::LostPets,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::update_report_status;
    use chrono::{NaiveDate, TimeZone, Utc};
    use pawhaven_core::types::{ReportKind, ReportStatus, ReportStatusUpdate};
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    fn make_report(name: &str, minute: u32) -> LostPetReport {
        LostPetReport {
            id: Uuid::new_v4(),
            pet_name: Some(name.to_string()),
            pet_type: "Dog".to_string(),
            breed: Some("Beagle".to_string()),
            color: None,
            description: None,
            last_seen_location: "Riverside Park".to_string(),
            last_seen_date: NaiveDate::from_ymd_opt(2026, 4, 2).unwrap(),
            contact_name: "Jo".to_string(),
            contact_phone: None,
            contact_email: Some("jo@example.com".to_string()),
            image_url: None,
            status: ReportStatus::Pending,
            created_at: Utc.with_ymd_and_hms(2026, 4, 2, 9, minute, 0).unwrap(),
            reunite_story: None,
            reunite_date: None,
            user_id: Uuid::new_v4(),
        }
    }

    #[tokio::test]
    async fn insert_and_get_roundtrips() {
        let (db, _dir) = setup_db().await;
        let report = make_report("Max", 0);
        insert(&db, &report).await.unwrap();

        let fetched = get(&db, report.id).await.unwrap().unwrap();
        assert_eq!(fetched, report);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn get_missing_returns_none() {
        let (db, _dir) = setup_db().await;
        assert!(get(&db, Uuid::new_v4()).await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn list_filters_by_status_and_orders_newest_first() {
        let (db, _dir) = setup_db().await;
        let a = make_report("A", 1);
        let b = make_report("B", 2);
        let c = make_report("C", 3);
        for r in [&a, &b, &c] {
            insert(&db, r).await.unwrap();
        }
        update_report_status(
            &db,
            ReportKind::Lost,
            b.id,
            &ReportStatusUpdate::status(ReportStatus::Approved),
        )
        .await
        .unwrap();

        let all = list(&db, &ListQuery::all()).await.unwrap();
        let names: Vec<_> = all.iter().map(|r| r.pet_name.clone().unwrap()).collect();
        assert_eq!(names, vec!["C", "B", "A"]);

        let approved = list(&db, &ListQuery::with_status(ReportStatus::Approved))
            .await
            .unwrap();
        assert_eq!(approved.len(), 1);
        assert_eq!(approved[0].id, b.id);

        let newest = list(&db, &ListQuery::newest(2)).await.unwrap();
        assert_eq!(newest.len(), 2);
        assert_eq!(newest[0].id, c.id);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn update_status_reports_zero_rows_for_unknown_id() {
        let (db, _dir) = setup_db().await;
        let rows = update_report_status(
            &db,
            ReportKind::Lost,
            Uuid::new_v4(),
            &ReportStatusUpdate::status(ReportStatus::Approved),
        )
        .await
        .unwrap();
        assert_eq!(rows, 0);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn reunion_fields_written_and_cleared() {
        let (db, _dir) = setup_db().await;
        let report = make_report("Max", 0);
        insert(&db, &report).await.unwrap();

        let at = Utc.with_ymd_and_hms(2026, 4, 5, 18, 0, 0).unwrap();
        update_report_status(
            &db,
            ReportKind::Lost,
            report.id,
            &ReportStatusUpdate::reunited("Found at the park".to_string(), at),
        )
        .await
        .unwrap();
        let reunited = get(&db, report.id).await.unwrap().unwrap();
        assert_eq!(reunited.status, ReportStatus::Reunited);
        assert_eq!(reunited.reunite_story.as_deref(), Some("Found at the park"));
        assert_eq!(reunited.reunite_date, Some(at));

        update_report_status(
            &db,
            ReportKind::Lost,
            report.id,
            &ReportStatusUpdate::status(ReportStatus::Pending),
        )
        .await
        .unwrap();
        let reverted = get(&db, report.id).await.unwrap().unwrap();
        assert_eq!(reverted.status, ReportStatus::Pending);
        assert!(reverted.reunite_story.is_none());
        assert!(reverted.reunite_date.is_none());
        db.close().await.unwrap();
    }
}
