// SPDX-FileCopyrightText: 2026 Pawhaven Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adoption listing operations.

use pawhaven_core::PawhavenError;
use pawhaven_core::types::{Collection, ListQuery, ListingStatus, PetFields};
use rusqlite::{Row, params, params_from_iter};
use tracing::debug;
use uuid::Uuid;

use crate::database::{Database, is_foreign_key_violation, map_tr_err};
use crate::models::{AdoptionPet, RowExt, format_ts, non_blank};

const COLUMNS: &str =
    "id, pet_name, pet_type, breed, age, color, description, location, image_url, status, created_at";

fn from_row(row: &Row<'_>) -> rusqlite::Result<AdoptionPet> {
    Ok(AdoptionPet {
        id: row.get_uuid(0)?,
        pet_name: row.get(1)?,
        pet_type: row.get(2)?,
        breed: row.get(3)?,
        age: row.get(4)?,
        color: row.get(5)?,
        description: row.get(6)?,
        location: row.get(7)?,
        image_url: row.get(8)?,
        status: row.get_enum(9)?,
        created_at: row.get_ts(10)?,
    })
}

pub async fn insert(db: &Database, pet: &AdoptionPet) -> Result<(), PawhavenError> {
    let p = pet.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                &format!(
                    "INSERT INTO adoption_pets ({COLUMNS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
                ),
                params![
                    p.id.to_string(),
                    p.pet_name,
                    p.pet_type,
                    p.breed,
                    p.age,
                    p.color,
                    p.description,
                    p.location,
                    p.image_url,
                    p.status.to_string(),
                    format_ts(p.created_at),
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

pub async fn get(db: &Database, id: Uuid) -> Result<Option<AdoptionPet>, PawhavenError> {
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {COLUMNS} FROM adoption_pets WHERE id = ?1"))?;
            match stmt.query_row(params![id.to_string()], from_row) {
                Ok(pet) => Ok(Some(pet)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

pub async fn list(db: &Database, query: &ListQuery) -> Result<Vec<AdoptionPet>, PawhavenError> {
    let (sql, values) = super::list_sql(
        &format!("SELECT {COLUMNS} FROM adoption_pets"),
        Collection::AdoptionPets,
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

/// Overwrite the mutable fields of a listing. Status and created_at are untouched.
pub async fn update_fields(
    db: &Database,
    id: Uuid,
    fields: &PetFields,
) -> Result<usize, PawhavenError> {
    let f = fields.clone();
    let rows = db
        .connection()
        .call(move |conn| {
            Ok(conn.execute(
                "UPDATE adoption_pets
                 SET pet_name = ?1, pet_type = ?2, breed = ?3, age = ?4, color = ?5,
                     description = ?6, location = ?7, image_url = ?8
                 WHERE id = ?9",
                params![
                    f.pet_name.trim(),
                    f.pet_type.trim(),
                    non_blank(&f.breed),
                    non_blank(&f.age),
                    non_blank(&f.color),
                    non_blank(&f.description),
                    f.location.trim(),
                    non_blank(&f.image_url),
                    id.to_string(),
                ],
            )?)
        })
        .await
        .map_err(map_tr_err)?;
    debug!(%id, rows, "listing fields written");
    Ok(rows)
}

pub async fn update_status(
    db: &Database,
    id: Uuid,
    status: ListingStatus,
) -> Result<usize, PawhavenError> {
    let rows = db
        .connection()
        .call(move |conn| {
            Ok(conn.execute(
                "UPDATE adoption_pets SET status = ?1 WHERE id = ?2",
                params![status.to_string(), id.to_string()],
            )?)
        })
        .await
        .map_err(map_tr_err)?;
    debug!(%id, %status, rows, "listing status written");
    Ok(rows)
}

/// Hard-delete a listing. Fails with a constraint error while applications reference it.
/// Delete a listing. Fails with `Conflict` while applications still reference it.
pub async fn delete(db: &Database, id: Uuid) -> Result<usize, PawhavenError> {
    let deleted = db
        .connection()
        .call(move |conn| {
            Ok(conn.execute(
                "DELETE FROM adoption_pets WHERE id = ?1",
                params![id.to_string()],
            ))
        })
        .await
        .map_err(map_tr_err)?;

    deleted.map_err(|e| {
        if is_foreign_key_violation(&e) {
            PawhavenError::Conflict(format!("pet {id} is referenced by adoption applications"))
        } else {
            PawhavenError::storage(e)
        }
    })
}

/// Delete a listing and its applications in one transaction.
pub async fn delete_cascade(db: &Database, id: Uuid) -> Result<usize, PawhavenError> {
    let (applications, pets) = db
        .connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let applications = tx.execute(
                "DELETE FROM adoption_applications WHERE pet_id = ?1",
                params![id.to_string()],
            )?;
            let pets = tx.execute(
                "DELETE FROM adoption_pets WHERE id = ?1",
                params![id.to_string()],
            )?;
            if pets == 0 {
                // Nothing to cascade from; keep the applications.
                tx.rollback()?;
                return Ok((0, 0));
            }
            tx.commit()?;
            Ok((applications, pets))
        })
        .await
        .map_err(map_tr_err)?;
    debug!(%id, applications, pets, "listing deleted with applications");
    Ok(pets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("pets.db").to_str().unwrap())
            .await
            .unwrap();
        (db, dir)
    }

    fn make_pet(name: &str) -> AdoptionPet {
        AdoptionPet {
            id: Uuid::new_v4(),
            pet_name: name.to_string(),
            pet_type: "Rabbit".to_string(),
            breed: None,
            age: Some("2 years".to_string()),
            color: Some("White".to_string()),
            description: None,
            location: "North Shelter".to_string(),
            image_url: None,
            status: ListingStatus::Available,
            created_at: Utc.with_ymd_and_hms(2026, 2, 1, 8, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn edit_overwrites_fields_but_not_status() {
        let (db, _dir) = setup_db().await;
        let pet = make_pet("Clover");
        insert(&db, &pet).await.unwrap();
        update_status(&db, pet.id, ListingStatus::Unavailable)
            .await
            .unwrap();

        let fields = PetFields {
            pet_name: "Clover II".to_string(),
            pet_type: "Rabbit".to_string(),
            breed: "  ".to_string(),
            age: "3 years".to_string(),
            location: "South Shelter".to_string(),
            ..PetFields::default()
        };
        assert_eq!(update_fields(&db, pet.id, &fields).await.unwrap(), 1);

        let fetched = get(&db, pet.id).await.unwrap().unwrap();
        assert_eq!(fetched.pet_name, "Clover II");
        assert_eq!(fetched.age.as_deref(), Some("3 years"));
        assert!(fetched.breed.is_none());
        assert!(fetched.color.is_none());
        assert_eq!(fetched.status, ListingStatus::Unavailable);
        assert_eq!(fetched.created_at, pet.created_at);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn writes_to_unknown_id_match_zero_rows() {
        let (db, _dir) = setup_db().await;
        let missing = Uuid::new_v4();
        assert_eq!(
            update_status(&db, missing, ListingStatus::Available)
                .await
                .unwrap(),
            0
        );
        assert_eq!(delete(&db, missing).await.unwrap(), 0);
        assert_eq!(delete_cascade(&db, missing).await.unwrap(), 0);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn list_available_only() {
        let (db, _dir) = setup_db().await;
        let a = make_pet("A");
        let b = make_pet("B");
        insert(&db, &a).await.unwrap();
        insert(&db, &b).await.unwrap();
        update_status(&db, b.id, ListingStatus::Unavailable)
            .await
            .unwrap();

        let available = list(&db, &ListQuery::with_status(ListingStatus::Available))
            .await
            .unwrap();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].id, a.id);
        db.close().await.unwrap();
    }
}
