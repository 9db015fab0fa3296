// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[test]
fn today_is_iso_date() {
    let value = today();
    assert!(parse_iso_date(&value).is_some(), "not a date: {value}");
}

#[test]
fn now_iso_has_seconds_precision() {
    let value = now_iso();
    // YYYY-MM-DDTHH:MM:SS
    assert_eq!(value.len(), 19);
    assert_eq!(&value[10..11], "T");
}

#[parameterized(
    valid = { "2026-03-01", true },
    padded = { "  2026-03-01  ", true },
    empty = { "", false },
    garbage = { "soon", false },
    wrong_format = { "01/03/2026", false },
)]
fn parse_iso_date_cases(raw: &str, ok: bool) {
    assert_eq!(parse_iso_date(raw).is_some(), ok);
}

#[test]
fn append_dated_note_starts_fresh() {
    let out = append_dated_note("", "hello");
    assert!(out.starts_with('['));
    assert!(out.ends_with("] hello"));
    assert!(!out.contains('\n'));
}

#[test]
fn append_dated_note_preserves_existing_lines() {
    let out = append_dated_note("[2026-01-01] old", "new");
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "[2026-01-01] old");
    assert!(lines[1].ends_with("] new"));
}
