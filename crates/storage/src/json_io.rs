// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON file helpers.
//!
//! All on-disk JSON is written 2-space indented with sorted keys and a
//! trailing newline. Sorting falls out of `serde_json::Value` using a
//! BTreeMap for objects, so every payload is converted to a `Value` before
//! writing.

use serde::Serialize;
use serde_json::Value;
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JsonIoError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("JSON error at {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

fn io_err(path: &Path, source: io::Error) -> JsonIoError {
    JsonIoError::Io {
        path: path.display().to_string(),
        source,
    }
}

fn json_err(path: &Path, source: serde_json::Error) -> JsonIoError {
    JsonIoError::Json {
        path: path.display().to_string(),
        source,
    }
}

/// Read and parse a JSON file.
pub fn load_json(path: &Path) -> Result<Value, JsonIoError> {
    let raw = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    serde_json::from_str(&raw).map_err(|e| json_err(path, e))
}

/// Write a payload as canonical JSON (sorted keys, 2-space indent, newline).
pub fn dump_json<T: Serialize>(path: &Path, payload: &T) -> Result<(), JsonIoError> {
    let value = serde_json::to_value(payload).map_err(|e| json_err(path, e))?;
    let mut rendered = serde_json::to_string_pretty(&value).map_err(|e| json_err(path, e))?;
    rendered.push('\n');

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(path, e))?;
    }
    std::fs::write(path, rendered).map_err(|e| io_err(path, e))
}

/// Render a payload as a single sorted-key JSON line (no trailing newline).
pub fn to_json_line<T: Serialize>(payload: &T) -> Result<String, serde_json::Error> {
    let value = serde_json::to_value(payload)?;
    serde_json::to_string(&value)
}

#[cfg(test)]
#[path = "json_io_tests.rs"]
mod tests;
