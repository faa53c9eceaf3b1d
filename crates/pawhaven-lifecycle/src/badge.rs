// SPDX-FileCopyrightText: 2026 Pawhaven Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Status badges for raw status strings.

use serde::Serialize;

/// Visual tone of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Success,
    Warning,
    Danger,
    Info,
    Neutral,
}

/// A capitalized label and its tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub label: &'static str,
    pub tone: Tone,
}

/// Badge for a status string from any collection, or `None` if unrecognized.
pub fn badge(raw: &str) -> Option<Badge> {
    let (label, tone) = match raw.trim().to_ascii_lowercase().as_str() {
        "approved" => ("Approved", Tone::Success),
        "pending" => ("Pending", Tone::Warning),
        "rejected" => ("Rejected", Tone::Danger),
        "reunited" => ("Reunited", Tone::Info),
        "available" => ("Available", Tone::Success),
        "unavailable" => ("Unavailable", Tone::Neutral),
        "read" => ("Read", Tone::Neutral),
        "unread" => ("Unread", Tone::Info),
        _ => return None,
    };
    Some(Badge { label, tone })
}

pub fn status_label(raw: &str) -> Option<&'static str> {
    badge(raw).map(|b| b.label)
}
