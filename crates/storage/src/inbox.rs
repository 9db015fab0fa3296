// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Human instruction inbox.
//!
//! Operators drop one pending message per device; the next tick consumes
//! and deletes it. The file format is `ts=<iso>` on the first line followed
//! by the message body.

use crate::paths::DevicePaths;
use std::io;

/// Write a pending human message for the next runtime tick.
pub fn enqueue_human_message(paths: &DevicePaths, text: &str) -> io::Result<std::path::PathBuf> {
    let cleaned = text.trim();
    if cleaned.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "human message text cannot be empty",
        ));
    }
    paths.ensure_layout()?;
    let payload = format!("ts={}\n{cleaned}\n", wdib_core::now_iso());
    std::fs::write(&paths.human_message, payload)?;
    Ok(paths.human_message.clone())
}

/// Return pending message text and remove it from the inbox.
pub fn load_and_clear_human_message(paths: &DevicePaths) -> io::Result<String> {
    if !paths.human_message.exists() {
        return Ok(String::new());
    }
    let raw = std::fs::read_to_string(&paths.human_message)?;
    std::fs::remove_file(&paths.human_message)?;

    let mut lines: Vec<&str> = raw.lines().collect();
    if lines.first().is_some_and(|line| line.starts_with("ts=")) {
        lines.remove(0);
    }
    Ok(lines.join("\n").trim().to_string())
}

#[cfg(test)]
#[path = "inbox_tests.rs"]
mod tests;
