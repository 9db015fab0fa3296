// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only NDJSON event log.
//!
//! Each entry is a single line of JSON: the typed event flattened together
//! with a `ts` stamp and, when a cycle is active, the `cycle_id`. Lines are
//! never rewritten; the log only grows.

use crate::json_io;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use thiserror::Error;
use tracing::warn;
use wdib_core::Event;

#[derive(Debug, Error)]
pub enum EventLogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serialization helper for writing log lines without cloning the event.
#[derive(Serialize)]
struct EventRecordRef<'a> {
    ts: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    cycle_id: Option<&'a str>,
    #[serde(flatten)]
    event: &'a Event,
}

/// One parsed line of the event log.
#[derive(Debug, Clone, Deserialize)]
pub struct EventRecord {
    pub ts: String,
    #[serde(default)]
    pub cycle_id: Option<String>,
    #[serde(flatten)]
    pub event: Event,
}

/// Append one event line. `cycle_id` is stamped when a cycle is active.
pub fn append_event(
    path: &Path,
    cycle_id: Option<&str>,
    event: &Event,
) -> Result<(), EventLogError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let ts = wdib_core::now_iso();
    let record = EventRecordRef {
        ts: &ts,
        cycle_id,
        event,
    };
    let line = json_io::to_json_line(&record)?;

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(line.as_bytes())?;
    file.write_all(b"\n")?;
    Ok(())
}

/// Read every parseable event line. Unparseable lines are skipped with a
/// warning; they never abort the read.
pub fn read_events(path: &Path) -> Result<Vec<EventRecord>, EventLogError> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let reader = BufReader::new(std::fs::File::open(path)?);
    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match serde_json::from_str::<EventRecord>(trimmed) {
            Ok(record) => records.push(record),
            Err(error) => {
                warn!(line = index + 1, %error, "skipping unparseable event line");
            }
        }
    }
    Ok(records)
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
