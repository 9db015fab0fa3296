// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Canonical per-device state.
//!
//! The state file is the single source of truth for one device. It is
//! created on first tick, mutated only by the planner, hardware
//! reconciler, reducer, and failure handler, and never destroyed.

use crate::hardware::HardwareRequest;
use crate::incident::Incident;
use crate::task::Task;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Overall device status derived at the end of each cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StateStatus {
    Active,
    BlockedHardware,
    Error,
    /// Absorbing: the device produces no further cycles until a new
    /// human message arrives.
    Terminated,
}

impl fmt::Display for StateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateStatus::Active => write!(f, "ACTIVE"),
            StateStatus::BlockedHardware => write!(f, "BLOCKED_HARDWARE"),
            StateStatus::Error => write!(f, "ERROR"),
            StateStatus::Terminated => write!(f, "TERMINATED"),
        }
    }
}

/// Aspirational direction plus the mission file backing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purpose {
    #[serde(default)]
    pub becoming: String,
    pub mission_path: String,
}

/// A produced artifact worth remembering across cycles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub path: String,
    pub description: String,
    pub created_on: String,
}

/// Canonical device state, schema-validated on every read and write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceState {
    pub schema_version: String,
    pub device_id: String,
    pub awoke_on: String,
    /// Monotonic cycle counter.
    pub day: u32,
    pub purpose: Purpose,
    pub status: StateStatus,
    pub tasks: Vec<Task>,
    pub hardware_requests: Vec<HardwareRequest>,
    pub incidents: Vec<Incident>,
    pub artifacts: Vec<Artifact>,
    #[serde(default)]
    pub last_summary: String,
}

impl DeviceState {
    /// The default template written on a device's first tick.
    pub fn new(device_id: impl Into<String>, mission_path: impl Into<String>) -> Self {
        Self {
            schema_version: crate::SCHEMA_VERSION.to_string(),
            device_id: device_id.into(),
            awoke_on: crate::dates::today(),
            day: 0,
            purpose: Purpose {
                becoming: String::new(),
                mission_path: mission_path.into(),
            },
            status: StateStatus::Active,
            tasks: Vec::new(),
            hardware_requests: Vec::new(),
            incidents: Vec::new(),
            artifacts: Vec::new(),
            last_summary: String::new(),
        }
    }

    /// True when any hardware request still awaits detection/verification.
    pub fn has_unresolved_hardware(&self) -> bool {
        self.hardware_requests
            .iter()
            .any(|request| request.status.is_unresolved())
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
