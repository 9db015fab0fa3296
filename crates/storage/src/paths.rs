// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Filesystem layout for the control plane and its per-device subtrees.
//!
//! ```text
//! <root>/
//!   MISSION.md
//!   .env
//!   .device_id
//!   devices/<uuid>/
//!     state.json
//!     events.ndjson
//!     sessions/day_NNN_YYYY-MM-DD.json
//!     runtime/
//!       human_message.txt
//!       work_orders/<cycle_id>.json
//!       worker_results/<cycle_id>.json
//!     public/
//!       status.json
//!       daily/day_NNN_YYYY-MM-DD.md
//! ```

use std::io;
use std::path::{Path, PathBuf};

pub const STATE_FILE_NAME: &str = "state.json";
pub const EVENTS_FILE_NAME: &str = "events.ndjson";
pub const SESSIONS_DIR_NAME: &str = "sessions";
pub const RUNTIME_DIR_NAME: &str = "runtime";
pub const WORK_ORDERS_DIR_NAME: &str = "work_orders";
pub const WORKER_RESULTS_DIR_NAME: &str = "worker_results";
pub const HUMAN_MESSAGE_FILE_NAME: &str = "human_message.txt";
pub const PUBLIC_DIR_NAME: &str = "public";
pub const PUBLIC_DAILY_DIR_NAME: &str = "daily";
pub const PUBLIC_STATUS_FILE_NAME: &str = "status.json";

pub const DEVICES_DIR_NAME: &str = "devices";
pub const MISSION_FILE_NAME: &str = "MISSION.md";
pub const ENV_FILE_NAME: &str = ".env";
pub const DEVICE_ID_FILE_NAME: &str = ".device_id";

/// Project-level paths, resolved once at CLI entry and threaded through.
#[derive(Debug, Clone)]
pub struct ProjectPaths {
    pub project_root: PathBuf,
    pub devices_dir: PathBuf,
    pub mission_file: PathBuf,
    pub env_file: PathBuf,
    pub device_id_file: PathBuf,
}

impl ProjectPaths {
    pub fn resolve(project_root: impl Into<PathBuf>) -> Self {
        let project_root = project_root.into();
        Self {
            devices_dir: project_root.join(DEVICES_DIR_NAME),
            mission_file: project_root.join(MISSION_FILE_NAME),
            env_file: project_root.join(ENV_FILE_NAME),
            device_id_file: project_root.join(DEVICE_ID_FILE_NAME),
            project_root,
        }
    }
}

/// All paths under one device's directory.
#[derive(Debug, Clone)]
pub struct DevicePaths {
    pub device_dir: PathBuf,
    pub state: PathBuf,
    pub events: PathBuf,
    pub sessions: PathBuf,
    pub runtime: PathBuf,
    pub work_orders: PathBuf,
    pub worker_results: PathBuf,
    pub human_message: PathBuf,
    pub public_dir: PathBuf,
    pub public_daily: PathBuf,
    pub public_status: PathBuf,
}

impl DevicePaths {
    pub fn new(devices_dir: &Path, device_id: &str) -> Self {
        let device_dir = devices_dir.join(device_id);
        let runtime = device_dir.join(RUNTIME_DIR_NAME);
        let public_dir = device_dir.join(PUBLIC_DIR_NAME);
        Self {
            state: device_dir.join(STATE_FILE_NAME),
            events: device_dir.join(EVENTS_FILE_NAME),
            sessions: device_dir.join(SESSIONS_DIR_NAME),
            work_orders: runtime.join(WORK_ORDERS_DIR_NAME),
            worker_results: runtime.join(WORKER_RESULTS_DIR_NAME),
            human_message: runtime.join(HUMAN_MESSAGE_FILE_NAME),
            public_daily: public_dir.join(PUBLIC_DAILY_DIR_NAME),
            public_status: public_dir.join(PUBLIC_STATUS_FILE_NAME),
            runtime,
            public_dir,
            device_dir,
        }
    }

    /// Create every directory in the layout. Safe to call on every tick.
    pub fn ensure_layout(&self) -> io::Result<()> {
        std::fs::create_dir_all(&self.device_dir)?;
        std::fs::create_dir_all(&self.sessions)?;
        std::fs::create_dir_all(&self.work_orders)?;
        std::fs::create_dir_all(&self.worker_results)?;
        std::fs::create_dir_all(&self.public_daily)?;
        Ok(())
    }

    pub fn work_order_file(&self, cycle_id: &str) -> PathBuf {
        self.work_orders.join(format!("{cycle_id}.json"))
    }

    pub fn worker_result_file(&self, cycle_id: &str) -> PathBuf {
        self.worker_results.join(format!("{cycle_id}.json"))
    }

    pub fn session_file(&self, day: u32, run_date: &str) -> PathBuf {
        self.sessions.join(format!("day_{day:03}_{run_date}.json"))
    }

    pub fn public_daily_file(&self, day: u32, run_date: &str) -> PathBuf {
        self.public_daily.join(format!("day_{day:03}_{run_date}.md"))
    }
}

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;
