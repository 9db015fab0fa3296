// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persistence for per-device state and cycle artifacts.
//!
//! State writes are schema-validated on both read and write; reads migrate
//! legacy fields first. Work orders and worker results are persisted before
//! the reducer consumes them, so any cycle can be reconstructed post-mortem.

use crate::events::{self, EventLogError};
use crate::json_io::{self, JsonIoError};
use crate::migration::migrate_legacy_state;
use crate::paths::DevicePaths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;
use wdib_core::{
    validate_state, validate_work_order, validate_worker_result, ContractValidationError,
    DeviceState, Event, PublicStatus, StateStatus, WorkOrder, WorkerResult,
};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    JsonIo(#[from] JsonIoError),
    #[error(transparent)]
    EventLog(#[from] EventLogError),
    #[error(transparent)]
    Contract(#[from] ContractValidationError),
}

/// Immutable record of one completed cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub date: String,
    pub cycle_id: String,
    pub day: u32,
    pub status: StateStatus,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_order_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_result_path: Option<String>,
    pub worker_status: String,
}

/// Owns the on-disk layout for one device.
pub struct Repository {
    device_id: String,
    paths: DevicePaths,
}

impl Repository {
    /// Open (and lazily create) the device directory tree.
    pub fn open(devices_dir: &Path, device_id: &str) -> Result<Self, StorageError> {
        let paths = DevicePaths::new(devices_dir, device_id);
        paths.ensure_layout()?;
        Ok(Self {
            device_id: device_id.to_string(),
            paths,
        })
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn paths(&self) -> &DevicePaths {
        &self.paths
    }

    /// Load the device state, creating the default template on first tick.
    ///
    /// Legacy fields are migrated before validation; a migration emits a
    /// `STATE_MIGRATED` event and persists the rewritten file.
    pub fn load_state(&self, mission_path: &str) -> Result<DeviceState, StorageError> {
        if !self.paths.state.exists() {
            let state = DeviceState::new(&self.device_id, mission_path);
            self.save_state(&state)?;
            self.append_event(
                None,
                &Event::StateInitialized {
                    message: "Created new device state file.".to_string(),
                },
            )?;
            info!(device_id = %self.device_id, "initialized device state");
            return Ok(state);
        }

        let mut raw = json_io::load_json(&self.paths.state)?;
        let changes = migrate_legacy_state(&mut raw);
        validate_state(&raw)?;
        let state: DeviceState = serde_json::from_value(raw)?;

        if !changes.is_empty() {
            self.save_state(&state)?;
            self.append_event(None, &Event::StateMigrated { changes })?;
        }

        Ok(state)
    }

    /// Validate and persist the device state.
    pub fn save_state(&self, state: &DeviceState) -> Result<(), StorageError> {
        let value = serde_json::to_value(state)?;
        validate_state(&value)?;
        self.paths.ensure_layout()?;
        json_io::dump_json(&self.paths.state, &value)?;
        Ok(())
    }

    /// Append one event to the NDJSON log.
    pub fn append_event(&self, cycle_id: Option<&str>, event: &Event) -> Result<(), StorageError> {
        events::append_event(&self.paths.events, cycle_id, event)?;
        Ok(())
    }

    pub fn work_order_path(&self, cycle_id: &str) -> PathBuf {
        self.paths.work_order_file(cycle_id)
    }

    pub fn worker_result_path(&self, cycle_id: &str) -> PathBuf {
        self.paths.worker_result_file(cycle_id)
    }

    /// Validate and persist a work order.
    pub fn save_work_order(&self, order: &WorkOrder) -> Result<PathBuf, StorageError> {
        let value = serde_json::to_value(order)?;
        validate_work_order(&value)?;
        let path = self.work_order_path(&order.cycle_id);
        json_io::dump_json(&path, &value)?;
        Ok(path)
    }

    /// Validate and persist a normalized worker result.
    pub fn save_worker_result(&self, result: &WorkerResult) -> Result<PathBuf, StorageError> {
        let value = serde_json::to_value(result)?;
        validate_worker_result(&value)?;
        let path = self.worker_result_path(&result.cycle_id);
        json_io::dump_json(&path, &value)?;
        Ok(path)
    }

    /// Persist the immutable per-cycle session record.
    pub fn save_session_record(&self, record: &SessionRecord) -> Result<PathBuf, StorageError> {
        let path = self.paths.session_file(record.day, &record.date);
        json_io::dump_json(&path, record)?;
        Ok(path)
    }

    /// Overwrite the public status snapshot.
    pub fn save_public_status(&self, status: &PublicStatus) -> Result<PathBuf, StorageError> {
        json_io::dump_json(&self.paths.public_status, status)?;
        Ok(self.paths.public_status.clone())
    }

    /// Write the per-day public markdown.
    pub fn save_public_daily_summary(
        &self,
        day: u32,
        run_date: &str,
        markdown: &str,
    ) -> Result<PathBuf, StorageError> {
        let path = self.paths.public_daily_file(day, run_date);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, markdown)?;
        Ok(path)
    }
}

#[cfg(test)]
#[path = "repository_tests.rs"]
mod tests;
