// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mission file loader.
//!
//! The mission is a human-curated text file. A missing or empty file means
//! the mission is unknown and the discovery/becoming policy applies.

use std::path::Path;

/// Read the mission text; missing or unreadable files read as empty.
pub fn load_mission_text(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_default()
}

/// A mission is known when its text has any non-whitespace content.
pub fn mission_known(mission_text: &str) -> bool {
    !mission_text.trim().is_empty()
}
