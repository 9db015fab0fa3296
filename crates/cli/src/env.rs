// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI crate.
//!
//! Also owns device identity resolution: the device UUID comes from the
//! process env, then the project `.env`, then the persisted `.device_id`
//! file; failing all three a fresh v4 UUID is generated and persisted.

use std::path::{Path, PathBuf};
use uuid::Uuid;
use wdib_storage::ProjectPaths;

/// Project root: `WDIB_HOME` if set, else the current directory.
pub fn project_root() -> PathBuf {
    if let Ok(home) = std::env::var("WDIB_HOME") {
        let trimmed = home.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Load `.env` into the process env without overwriting existing vars.
pub fn load_dotenv(env_file: &Path) {
    if env_file.exists() {
        // dotenvy never overrides variables that are already set.
        let _ = dotenvy::from_path(env_file);
    }
}

fn normalize_uuid(raw: &str) -> Option<String> {
    Uuid::parse_str(raw.trim()).ok().map(|id| id.to_string())
}

fn uuid_from_env_file(env_file: &Path) -> Option<String> {
    let iter = dotenvy::from_path_iter(env_file).ok()?;
    for item in iter {
        let (key, value) = item.ok()?;
        if key == "WDIB_DEVICE_ID" {
            return normalize_uuid(&value);
        }
    }
    None
}

/// Resolve (or lazily create) the device UUID.
pub fn resolve_device_id(paths: &ProjectPaths) -> std::io::Result<String> {
    if let Some(id) = std::env::var("WDIB_DEVICE_ID")
        .ok()
        .as_deref()
        .and_then(normalize_uuid)
    {
        return Ok(id);
    }

    if paths.env_file.exists() {
        if let Some(id) = uuid_from_env_file(&paths.env_file) {
            std::env::set_var("WDIB_DEVICE_ID", &id);
            return Ok(id);
        }
    }

    if paths.device_id_file.exists() {
        let raw = std::fs::read_to_string(&paths.device_id_file)?;
        if let Some(id) = normalize_uuid(&raw) {
            std::env::set_var("WDIB_DEVICE_ID", &id);
            return Ok(id);
        }
    }

    let generated = Uuid::new_v4().to_string();
    if let Some(parent) = paths.device_id_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&paths.device_id_file, &generated)?;
    std::env::set_var("WDIB_DEVICE_ID", &generated);
    Ok(generated)
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
