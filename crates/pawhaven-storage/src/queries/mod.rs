// SPDX-FileCopyrightText: 2026 Pawhaven Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for CRUD operations on each collection.

pub mod adoption_pets;
pub mod applications;
pub mod compensation;
pub mod contact;
pub mod found_pets;
pub mod lost_pets;

use pawhaven_core::PawhavenError;
use pawhaven_core::types::{Collection, ListQuery, ReportKind, ReportStatusUpdate, SortOrder};
use rusqlite::{params, params_from_iter};
use tracing::debug;
use uuid::Uuid;

use crate::database::{Database, map_tr_err};
use crate::models::format_ts;

/// A status filter translated to a column predicate.
pub(crate) struct StatusFilter {
    pub clause: &'static str,
    pub value: String,
}

/// Translate a wire-form status into a predicate for `collection`.
///
/// Contact messages have a boolean `read` column instead of a status.
pub(crate) fn status_filter(
    collection: Collection,
    status: &str,
) -> Result<StatusFilter, PawhavenError> {
    match collection {
        Collection::ContactMessages => {
            let value = match status {
                "read" => "1",
                "unread" => "0",
                other => {
                    return Err(PawhavenError::Validation(format!(
                        "unknown contact message filter `{other}`"
                    )));
                }
            };
            Ok(StatusFilter {
                clause: "read = ?1",
                value: value.to_string(),
            })
        }
        _ => Ok(StatusFilter {
            clause: "status = ?1",
            value: status.to_string(),
        }),
    }
}

/// Append `WHERE`, `ORDER BY created_at`, and `LIMIT` for a list query.
///
/// `alias` prefixes the columns when the select joins another table.
/// Returns the SQL and the bound parameters.
pub(crate) fn list_sql(
    select: &str,
    collection: Collection,
    alias: Option<&str>,
    query: &ListQuery,
) -> Result<(String, Vec<String>), PawhavenError> {
    let prefix = alias.map(|a| format!("{a}.")).unwrap_or_default();
    let mut sql = select.to_string();
    let mut params = Vec::new();

    if let Some(status) = &query.status {
        let filter = status_filter(collection, status)?;
        sql.push_str(&format!(" WHERE {prefix}{}", filter.clause));
        params.push(filter.value);
    }

    let direction = match query.order {
        SortOrder::Ascending => "ASC",
        SortOrder::Descending => "DESC",
    };
    sql.push_str(&format!(
        " ORDER BY {prefix}created_at {direction}, {prefix}rowid {direction}"
    ));

    if let Some(limit) = query.limit {
        sql.push_str(&format!(" LIMIT {limit}"));
    }

    Ok((sql, params))
}

/// Count rows in a collection, optionally matching a status.
pub async fn count(
    db: &Database,
    collection: Collection,
    status: Option<&str>,
) -> Result<u64, PawhavenError> {
    let mut sql = format!("SELECT COUNT(*) FROM {collection}");
    let mut params = Vec::new();
    if let Some(status) = status {
        let filter = status_filter(collection, status)?;
        sql.push_str(&format!(" WHERE {}", filter.clause));
        params.push(filter.value);
    }

    let count: i64 = db
        .connection()
        .call(move |conn| Ok(conn.query_row(&sql, params_from_iter(params), |row| row.get(0))?))
        .await
        .map_err(map_tr_err)?;
    Ok(count.max(0) as u64)
}

/// Write status and reunion fields of a lost or found report.
///
/// Returns the number of rows matched.
pub async fn update_report_status(
    db: &Database,
    kind: ReportKind,
    id: Uuid,
    update: &ReportStatusUpdate,
) -> Result<usize, PawhavenError> {
    let sql = format!(
        "UPDATE {} SET status = ?1, reunite_story = ?2, reunite_date = ?3 WHERE id = ?4",
        kind.collection()
    );
    let status = update.status.to_string();
    let story = update.reunite_story.clone();
    let date = update.reunite_date.map(format_ts);
    let rows = db
        .connection()
        .call(move |conn| Ok(conn.execute(&sql, params![status, story, date, id.to_string()])?))
        .await
        .map_err(map_tr_err)?;
    debug!(%kind, %id, status = %update.status, rows, "report status written");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_sql_without_filter_orders_newest_first() {
        let (sql, params) =
            list_sql("SELECT id FROM lost_pets", Collection::LostPets, None, &ListQuery::all())
                .unwrap();
        assert_eq!(
            sql,
            "SELECT id FROM lost_pets ORDER BY created_at DESC, rowid DESC"
        );
        assert!(params.is_empty());
    }

    #[test]
    fn list_sql_with_status_limit_and_alias() {
        let query = ListQuery {
            status: Some("pending".to_string()),
            order: SortOrder::Ascending,
            limit: Some(2),
        };
        let (sql, params) = list_sql(
            "SELECT a.id FROM adoption_applications a",
            Collection::AdoptionApplications,
            Some("a"),
            &query,
        )
        .unwrap();
        assert!(sql.contains("WHERE a.status = ?1"));
        assert!(sql.ends_with("ORDER BY a.created_at ASC, a.rowid ASC LIMIT 2"));
        assert_eq!(params, vec!["pending".to_string()]);
    }

    #[test]
    fn contact_filter_maps_to_read_flag() {
        let filter = status_filter(Collection::ContactMessages, "unread").unwrap();
        assert_eq!(filter.clause, "read = ?1");
        assert_eq!(filter.value, "0");
        assert!(status_filter(Collection::ContactMessages, "archived").is_err());
    }
}
