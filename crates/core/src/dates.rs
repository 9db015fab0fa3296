// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Date and timestamp formatting shared across the control plane.
//!
//! All persisted timestamps are local ISO-8601 with seconds precision;
//! dates are `YYYY-MM-DD`.

use chrono::{Local, NaiveDate};

/// Today's date as `YYYY-MM-DD`.
pub fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Today's date as `YYYYMMDD` (used in dated identifiers).
pub fn compact_today() -> String {
    Local::now().format("%Y%m%d").to_string()
}

/// Current local time as ISO-8601 with seconds precision.
pub fn now_iso() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Parse a `YYYY-MM-DD` string, returning `None` for anything else.
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Append a dated note line to an existing notes blob.
pub fn append_dated_note(existing: &str, note: &str) -> String {
    let line = format!("[{}] {}", today(), note);
    let prefix = existing.trim();
    if prefix.is_empty() {
        line
    } else {
        format!("{prefix}\n{line}")
    }
}

#[cfg(test)]
#[path = "dates_tests.rs"]
mod tests;
