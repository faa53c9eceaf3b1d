// SPDX-FileCopyrightText: 2026 Pawhaven Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Form checks run before any store call.
//!
//! A [`FormCheck`] collects every problem with a submission so the caller sees
//! all missing fields at once instead of one per round trip.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use pawhaven_core::PawhavenError;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Whether `value` looks like an email address.
pub fn is_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value.trim())
}

/// Trimmed value, or `None` when blank.
pub fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Accumulates field errors for one form submission.
#[derive(Debug, Default)]
pub struct FormCheck {
    errors: Vec<String>,
}

impl FormCheck {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error if `value` is blank; returns the trimmed value.
    pub fn required(&mut self, field: &str, value: &str) -> String {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.errors.push(format!("{field} is required"));
        }
        trimmed.to_string()
    }

    /// Required and shaped like an email address.
    pub fn email(&mut self, field: &str, value: &str) -> String {
        let before = self.errors.len();
        let value = self.required(field, value);
        if self.errors.len() == before && !is_email(&value) {
            self.errors.push(format!("{field} must be a valid email address"));
        }
        value
    }

    /// Blank is accepted; anything else must be shaped like an email address.
    pub fn optional_email(&mut self, field: &str, value: &str) -> Option<String> {
        let value = optional(value)?;
        if !is_email(&value) {
            self.errors.push(format!("{field} must be a valid email address"));
        }
        Some(value)
    }

    /// Required `YYYY-MM-DD` date.
    ///
    /// The returned value is meaningless once an error has been recorded.
    pub fn date(&mut self, field: &str, value: &str) -> NaiveDate {
        let before = self.errors.len();
        let value = self.required(field, value);
        if self.errors.len() != before {
            return NaiveDate::default();
        }
        match NaiveDate::parse_from_str(&value, "%Y-%m-%d") {
            Ok(date) => date,
            Err(_) => {
                self.errors
                    .push(format!("{field} must be a date in YYYY-MM-DD format"));
                NaiveDate::default()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// `Validation` with every recorded problem, or `Ok` if there were none.
    pub fn finish(self) -> Result<(), PawhavenError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(PawhavenError::Validation(self.errors.join("; ")))
        }
    }
}
