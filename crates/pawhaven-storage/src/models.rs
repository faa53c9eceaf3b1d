// SPDX-FileCopyrightText: 2026 Pawhaven Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Column encoding for typed records.
//!
//! Ids are stored as hyphenated UUID text, timestamps as ISO-8601 UTC with
//! millisecond precision (lexicographic order matches time order), dates as
//! `YYYY-MM-DD`, and statuses as their lowercase wire form.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::Row;
use rusqlite::types::Type;
use uuid::Uuid;

pub use pawhaven_core::types::{
    AdoptionApplication, AdoptionPet, Compensation, ContactMessage, FoundPetReport,
    LostPetReport,
};

pub fn format_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn conversion_err<E>(idx: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

/// Typed column getters for the encodings above.
pub trait RowExt {
    fn get_uuid(&self, idx: usize) -> rusqlite::Result<Uuid>;
    fn get_ts(&self, idx: usize) -> rusqlite::Result<DateTime<Utc>>;
    fn get_opt_ts(&self, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>>;
    fn get_date(&self, idx: usize) -> rusqlite::Result<NaiveDate>;
    fn get_enum<T>(&self, idx: usize) -> rusqlite::Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static;
}

impl RowExt for Row<'_> {
    fn get_uuid(&self, idx: usize) -> rusqlite::Result<Uuid> {
        let raw: String = self.get(idx)?;
        Uuid::parse_str(&raw).map_err(|e| conversion_err(idx, e))
    }

    fn get_ts(&self, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
        let raw: String = self.get(idx)?;
        parse_ts(&raw).map_err(|e| conversion_err(idx, e))
    }

    fn get_opt_ts(&self, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
        let raw: Option<String> = self.get(idx)?;
        raw.map(|s| parse_ts(&s).map_err(|e| conversion_err(idx, e)))
            .transpose()
    }

    fn get_date(&self, idx: usize) -> rusqlite::Result<NaiveDate> {
        let raw: String = self.get(idx)?;
        NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|e| conversion_err(idx, e))
    }

    fn get_enum<T>(&self, idx: usize) -> rusqlite::Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        let raw: String = self.get(idx)?;
        raw.parse().map_err(|e| conversion_err(idx, e))
    }
}

fn parse_ts(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw).map(|ts| ts.with_timezone(&Utc))
}

/// Blank strings become NULL.
pub fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
