// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! State migration for legacy field spellings.
//!
//! Migrations run on raw JSON before schema validation, so legacy files
//! keep loading. Each applied change is described so the repository can
//! record a `STATE_MIGRATED` event.

use serde_json::Value;

/// Migrate a raw state payload in place, returning change descriptions.
pub fn migrate_legacy_state(state: &mut Value) -> Vec<String> {
    let mut changes = Vec::new();

    // purpose.spirit_path -> purpose.mission_path
    if let Some(purpose) = state.get_mut("purpose").and_then(Value::as_object_mut) {
        if !purpose.contains_key("mission_path") {
            if let Some(spirit_path) = purpose.remove("spirit_path") {
                purpose.insert("mission_path".to_string(), spirit_path);
                changes.push("purpose.spirit_path -> purpose.mission_path".to_string());
            }
        } else if purpose.remove("spirit_path").is_some() {
            changes.push("dropped redundant purpose.spirit_path".to_string());
        }
    }

    changes
}

#[cfg(test)]
#[path = "migration_tests.rs"]
mod tests;
